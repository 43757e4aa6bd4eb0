//! Color themes and glyphs.
//!
//! Dark mode uses the Kanagawa Wave palette; light mode uses Kanagawa Lotus.

use ratatui::style::{Color, Modifier, Style};

use mcq_engine::{StatusTier, UiOptions};

/// Kanagawa Wave (dark) colors.
mod wave {
    use super::Color;

    pub const BG: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const ACCENT: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const KEY: Color = Color::Rgb(255, 160, 102); // surimiOrange

    pub const SUCCESS: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const WARNING: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ERROR: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Kanagawa Lotus (light) colors.
mod lotus {
    use super::Color;

    pub const BG: Color = Color::Rgb(242, 236, 188); // lotusWhite3
    pub const BG_PANEL: Color = Color::Rgb(231, 219, 160); // lotusWhite4
    pub const BG_HIGHLIGHT: Color = Color::Rgb(220, 212, 172); // lotusWhite5
    pub const BORDER: Color = Color::Rgb(160, 151, 111); // lotusGray2

    pub const TEXT_PRIMARY: Color = Color::Rgb(84, 84, 100); // lotusInk1
    pub const TEXT_SECONDARY: Color = Color::Rgb(67, 67, 108); // lotusInk2
    pub const TEXT_MUTED: Color = Color::Rgb(138, 137, 128); // lotusGray3

    pub const PRIMARY: Color = Color::Rgb(98, 76, 131); // lotusViolet4
    pub const ACCENT: Color = Color::Rgb(77, 105, 155); // lotusBlue4
    pub const KEY: Color = Color::Rgb(204, 109, 0); // lotusOrange

    pub const SUCCESS: Color = Color::Rgb(111, 137, 78); // lotusGreen
    pub const WARNING: Color = Color::Rgb(119, 113, 63); // lotusYellow
    pub const ERROR: Color = Color::Rgb(200, 64, 83); // lotusRed
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub key: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            bg: wave::BG,
            bg_panel: wave::BG_PANEL,
            bg_highlight: wave::BG_HIGHLIGHT,
            border: wave::BORDER,
            text_primary: wave::TEXT_PRIMARY,
            text_secondary: wave::TEXT_SECONDARY,
            text_muted: wave::TEXT_MUTED,
            primary: wave::PRIMARY,
            accent: wave::ACCENT,
            key: wave::KEY,
            success: wave::SUCCESS,
            warning: wave::WARNING,
            error: wave::ERROR,
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            bg: lotus::BG,
            bg_panel: lotus::BG_PANEL,
            bg_highlight: lotus::BG_HIGHLIGHT,
            border: lotus::BORDER,
            text_primary: lotus::TEXT_PRIMARY,
            text_secondary: lotus::TEXT_SECONDARY,
            text_muted: lotus::TEXT_MUTED,
            primary: lotus::PRIMARY,
            accent: lotus::ACCENT,
            key: lotus::KEY,
            success: lotus::SUCCESS,
            warning: lotus::WARNING,
            error: lotus::ERROR,
        }
    }

    /// Color for a score tier: green, amber, red.
    #[must_use]
    pub fn tier(&self, tier: StatusTier) -> Color {
        match tier {
            StatusTier::High => self.success,
            StatusTier::Mid => self.warning,
            StatusTier::Low => self.error,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.dark_mode {
        Palette::dark()
    } else {
        Palette::light()
    }
}

/// ASCII/Unicode glyphs for markers and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub logo: &'static str,
    pub prompt: &'static str,
    pub focused: &'static str,
    pub radio_on: &'static str,
    pub radio_off: &'static str,
    pub answered: &'static str,
    pub unanswered: &'static str,
    pub correct: &'static str,
    pub wrong: &'static str,
    pub warning: &'static str,
    pub separator: &'static str,
    pub dark_mode: &'static str,
    pub light_mode: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            logo: "[?]",
            prompt: ">",
            focused: ">",
            radio_on: "(*)",
            radio_off: "( )",
            answered: "#",
            unanswered: ".",
            correct: "+",
            wrong: "x",
            warning: "!",
            separator: "|",
            dark_mode: "dark",
            light_mode: "light",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            logo: "◆",
            prompt: "❯",
            focused: "▸",
            radio_on: "◉",
            radio_off: "○",
            answered: "●",
            unanswered: "○",
            correct: "✓",
            wrong: "✗",
            warning: "⚠",
            separator: "│",
            dark_mode: "☾",
            light_mode: "☀",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn view_badge(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border(palette: &Palette) -> Style {
        Style::default().fg(palette.border)
    }

    #[must_use]
    pub fn focused_border(palette: &Palette) -> Style {
        Style::default().fg(palette.accent)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.key)
            .add_modifier(Modifier::BOLD)
    }
}
