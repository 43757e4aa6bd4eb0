//! Keyboard input: a blocking crossterm reader feeding the frame loop.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use mcq_engine::{App, OptionKey, View};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// Lines moved per `PageUp`/`PageDown` in the results view.
const RESULTS_PAGE: u16 = 10;

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if the caller exits early; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued terminal events into the app. Returns `true` once the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

pub(crate) fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('c' | 'q') => {
                        app.request_quit();
                        return true;
                    }
                    KeyCode::Char('t') => {
                        app.toggle_dark_mode();
                        return app.should_quit();
                    }
                    _ => {}
                }
            }

            match app.view() {
                View::Landing => handle_landing(app, key),
                View::Quiz => handle_quiz(app, key),
                View::Results => handle_results(app, key),
            }
        }
        Event::Paste(text) => {
            if app.view() == View::Landing {
                app.topic_insert_text(&text);
            }
        }
        _ => {}
    }
    app.should_quit()
}

fn handle_landing(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            // The button is disabled while a request is outstanding.
            if !app.is_generating()
                && let Err(err) = app.generate()
            {
                tracing::debug!("Generate rejected: {err}");
            }
        }
        KeyCode::Esc => app.request_quit(),
        KeyCode::Char('w') if ctrl => app.topic_delete_word(),
        KeyCode::Char('u') if ctrl => app.topic_clear(),
        KeyCode::Char(c) if !ctrl => app.topic_insert_char(c),
        KeyCode::Backspace => app.topic_backspace(),
        KeyCode::Delete => app.topic_delete(),
        KeyCode::Left => app.topic_cursor_left(),
        KeyCode::Right => app.topic_cursor_right(),
        KeyCode::Home => app.topic_cursor_home(),
        KeyCode::End => app.topic_cursor_end(),
        _ => {}
    }
}

fn handle_quiz(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.focus_next_question(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.focus_prev_question(),
        KeyCode::Char('y') => app.copy_questions(),
        KeyCode::Enter => {
            app.finish();
        }
        KeyCode::Esc => app.reset(),
        KeyCode::Char(c) => {
            if let Some(option) = option_for_char(c)
                && let Err(err) = app.select_focused(option)
            {
                tracing::warn!("Ignoring answer key: {err}");
            }
        }
        _ => {}
    }
}

fn handle_results(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_results_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_results_up(1),
        KeyCode::PageDown => app.scroll_results_down(RESULTS_PAGE),
        KeyCode::PageUp => app.scroll_results_up(RESULTS_PAGE),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_results_to_top(),
        KeyCode::Char('p') => app.print_results(),
        KeyCode::Char('y') => app.copy_questions(),
        KeyCode::Char('n') | KeyCode::Enter | KeyCode::Esc => app.reset(),
        _ => {}
    }
}

/// Answer keys: letters a-d (either case) or digits 1-4.
fn option_for_char(c: char) -> Option<OptionKey> {
    match c {
        '1'..='4' => c
            .to_digit(10)
            .and_then(|d| OptionKey::from_index(d as usize - 1)),
        'a'..='d' | 'A'..='D' => OptionKey::parse(c.encode_utf8(&mut [0; 4])).ok(),
        _ => None,
    }
}
