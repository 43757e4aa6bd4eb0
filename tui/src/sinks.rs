//! Delivery of queued exports: system clipboard and printable report files.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::bail;
use chrono::{DateTime, Local};

use mcq_engine::{App, COPIED_MESSAGE, ExportRequest};

/// The system clipboard handle.
///
/// On X11 and Wayland the copied text is only served while the handle lives,
/// so one handle is opened on first use and kept until the sinks are dropped.
enum ClipboardSlot {
    Idle,
    Open(arboard::Clipboard),
    Disabled,
}

/// Where exports go once the app queues them.
pub struct ExportSinks {
    print_dir: Option<PathBuf>,
    clipboard: ClipboardSlot,
}

impl fmt::Debug for ExportSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clipboard = match self.clipboard {
            ClipboardSlot::Idle => "idle",
            ClipboardSlot::Open(_) => "open",
            ClipboardSlot::Disabled => "disabled",
        };
        f.debug_struct("ExportSinks")
            .field("print_dir", &self.print_dir)
            .field("clipboard", &clipboard)
            .finish()
    }
}

impl Default for ExportSinks {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ExportSinks {
    #[must_use]
    pub fn new(print_dir: Option<PathBuf>) -> Self {
        Self {
            print_dir,
            clipboard: ClipboardSlot::Idle,
        }
    }

    /// Reports go to `~/.mcq/prints`.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(mcq_engine::data_dir().map(|dir| dir.join("prints")))
    }

    /// Never touch the system clipboard; copies report it as unavailable.
    #[must_use]
    pub fn without_clipboard(mut self) -> Self {
        self.clipboard = ClipboardSlot::Disabled;
        self
    }

    #[must_use]
    pub fn print_dir(&self) -> Option<&Path> {
        self.print_dir.as_deref()
    }

    #[must_use]
    pub fn has_open_clipboard(&self) -> bool {
        matches!(self.clipboard, ClipboardSlot::Open(_))
    }

    /// Deliver the pending export, if any, and report the outcome on the status line.
    pub fn process(&mut self, app: &mut App) {
        let Some(request) = app.take_export() else {
            return;
        };

        match request {
            ExportRequest::Clipboard { text } => match self.copy_to_clipboard(&text) {
                Ok(()) => app.set_status(COPIED_MESSAGE),
                Err(err) => {
                    tracing::warn!("Clipboard copy failed: {err}");
                    app.set_status(format!("Could not copy to clipboard: {err}"));
                }
            },
            ExportRequest::Print { topic, report } => {
                let Some(dir) = self.print_dir() else {
                    app.set_status("No home directory to print into");
                    return;
                };
                match write_report(dir, &topic, &report, Local::now()) {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "Printed results");
                        app.set_status(format!("Printed to {}", path.display()));
                    }
                    Err(err) => {
                        tracing::error!("Failed to print results: {err}");
                        app.set_status(format!("Print failed: {err}"));
                    }
                }
            }
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        match self.clipboard {
            ClipboardSlot::Disabled => bail!("clipboard is unavailable"),
            ClipboardSlot::Idle => {
                self.clipboard = ClipboardSlot::Open(arboard::Clipboard::new()?);
            }
            ClipboardSlot::Open(_) => {}
        }
        let ClipboardSlot::Open(clipboard) = &mut self.clipboard else {
            bail!("clipboard is unavailable");
        };
        if let Err(err) = clipboard.set_text(text.to_owned()) {
            // Reopen on the next copy in case the display connection went away.
            self.clipboard = ClipboardSlot::Idle;
            return Err(err.into());
        }
        Ok(())
    }
}

/// Write a report as `results-<topic>-<timestamp>.txt` under `dir`.
pub fn write_report(
    dir: &Path,
    topic: &str,
    report: &str,
    now: DateTime<Local>,
) -> io::Result<PathBuf> {
    let file_name = format!(
        "results-{}-{}.txt",
        topic_slug(topic),
        now.format("%Y%m%d-%H%M%S")
    );
    let path = dir.join(file_name);
    let contents = format!("Printed {}\n\n{report}", now.format("%Y-%m-%d %H:%M:%S"));
    mcq_utils::atomic_write(&path, contents.as_bytes())?;
    Ok(path)
}

fn topic_slug(topic: &str) -> String {
    let mut slug = String::new();
    for c in topic.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.chars().count() >= 40 {
            break;
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "quiz".to_string()
    } else {
        slug.to_string()
    }
}
