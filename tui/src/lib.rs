//! TUI rendering for the MCQ generator using ratatui.

mod input;
mod sinks;
mod theme;

#[cfg(test)]
mod test_support;

pub use input::{InputPump, handle_events};
pub use sinks::{ExportSinks, write_report};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use mcq_engine::{App, OptionKey, Question, View};

const TOPIC_PLACEHOLDER: &str = "Enter a topic (e.g. Photosynthesis, Ancient Rome...)";
const MAX_CONTENT_WIDTH: u16 = 96;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg).fg(palette.text_primary));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // View body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette, &glyphs);
    let body = centered_column(chunks[1], MAX_CONTENT_WIDTH);
    match app.view() {
        View::Landing => draw_landing(frame, app, body, &palette, &glyphs),
        View::Quiz => draw_quiz(frame, app, body, &palette, &glyphs),
        View::Results => {
            let max_scroll = draw_results(frame, app, body, &palette, &glyphs);
            app.update_results_scroll_max(max_scroll);
        }
    }
    draw_status_bar(frame, app, chunks[2], &palette, &glyphs);
}

fn centered_column(area: Rect, max_width: u16) -> Rect {
    if area.width <= max_width {
        return area;
    }
    let offset = (area.width - max_width) / 2;
    Rect {
        x: area.x + offset,
        width: max_width,
        ..area
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let left = Line::from(vec![
        Span::styled(format!(" {} ", glyphs.logo), styles::title(palette)),
        Span::styled("MCQs Generator", styles::title(palette)),
        Span::styled(
            format!(" {} ", glyphs.separator),
            Style::default().fg(palette.text_muted),
        ),
        Span::styled(
            format!(" {} ", app.view().as_str().to_uppercase()),
            styles::view_badge(palette),
        ),
    ]);
    frame.render_widget(Paragraph::new(left), area);

    let theme_glyph = if app.dark_mode() {
        glyphs.light_mode
    } else {
        glyphs.dark_mode
    };
    let right = Line::from(vec![
        Span::styled(theme_glyph, Style::default().fg(palette.warning)),
        Span::styled(" Ctrl+T ", styles::key_hint(palette)),
    ]);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
}

// ----------------------------------------------------------------------
// Landing
// ----------------------------------------------------------------------

fn draw_landing(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Hero
            Constraint::Length(3), // Topic input
            Constraint::Length(2), // Error
            Constraint::Min(0),    // Features
        ])
        .split(area);

    let hero = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Powered by Gemini AI",
            Style::default().fg(palette.accent),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Master Any Subject with ",
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("AI Quizzes", styles::title(palette)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Instantly generate multiple choice questions on any topic.",
            Style::default().fg(palette.text_secondary),
        )),
    ];
    frame.render_widget(
        Paragraph::new(hero)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    draw_topic_input(frame, app, chunks[1], palette, glyphs);

    if let Some(error) = app.session().error() {
        let error_line = Line::from(vec![
            Span::styled(
                format!("{} ", glyphs.warning),
                Style::default().fg(palette.error),
            ),
            Span::styled(
                error.to_string(),
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(vec![Line::from(""), error_line]).alignment(Alignment::Center),
            chunks[2],
        );
    }

    let feature = |title: &'static str, body: &'static str| {
        Line::from(vec![
            Span::styled(
                format!("  {} ", glyphs.answered),
                Style::default().fg(palette.success),
            ),
            Span::styled(
                title,
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {body}"), Style::default().fg(palette.text_muted)),
        ])
    };
    let features = vec![
        Line::from(""),
        feature(
            "Instant Generation",
            "Get 5 unique MCQs in seconds using Gemini.",
        ),
        feature(
            "Detailed Explanations",
            "Learn why answers are correct with structured feedback.",
        ),
        feature(
            "Copy and Print",
            "Take the questions or your results with you.",
        ),
    ];
    let features_block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::border(palette));
    frame.render_widget(
        Paragraph::new(features).block(features_block),
        chunks[3],
    );
}

fn draw_topic_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let generating = app.is_generating();
    let (action, action_style) = if generating {
        let spinner = spinner_frame(app.tick_count(), app.ui_options());
        (
            format!(" {spinner} Generating... "),
            Style::default().fg(palette.text_muted),
        )
    } else {
        (
            " Enter: Generate ".to_string(),
            styles::key_highlight(palette),
        )
    };

    let border_style = if generating {
        styles::border(palette)
    } else {
        styles::focused_border(palette)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(" Topic ", styles::title(palette)))
        .title(Line::from(Span::styled(action, action_style)).right_aligned());

    let prefix = format!(" {} ", glyphs.prompt);
    let text = app.topic_input().text();
    let content = if text.is_empty() {
        Span::styled(TOPIC_PLACEHOLDER, Style::default().fg(palette.text_muted))
    } else {
        Span::styled(text.to_string(), Style::default().fg(palette.text_primary))
    };
    let line = Line::from(vec![
        Span::styled(prefix.clone(), Style::default().fg(palette.accent)),
        content,
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if app.can_edit_topic() {
        let before = app.topic_input().text_before_cursor();
        let column = prefix.width() + before.width();
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1).saturating_add(u16::try_from(column).unwrap_or(u16::MAX));
        frame.set_cursor_position((x.min(max_x), area.y + 1));
    }
}

// ----------------------------------------------------------------------
// Quiz
// ----------------------------------------------------------------------

fn draw_quiz(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Topic header
            Constraint::Length(2), // Progress
            Constraint::Min(6),    // Question card
            Constraint::Length(2), // Finish hint
        ])
        .split(area);

    let session = app.session();
    let header = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Topic: {}", session.topic().trim()),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Select the best answer for each question below.",
            Style::default().fg(palette.text_muted),
        )),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let total = session.questions().len();
    let focused = app.focused_question();
    let mut progress = vec![Span::styled(
        format!("Question {} of {total}  ", focused + 1),
        Style::default().fg(palette.text_secondary),
    )];
    for (index, question) in session.questions().iter().enumerate() {
        let answered = session.answer_for(question.id()).is_some();
        let glyph = if answered {
            glyphs.answered
        } else {
            glyphs.unanswered
        };
        let mut style = Style::default().fg(if answered {
            palette.accent
        } else {
            palette.text_muted
        });
        if index == focused {
            style = style.bg(palette.bg_highlight).add_modifier(Modifier::BOLD);
        }
        progress.push(Span::styled(format!(" {glyph} "), style));
    }
    progress.push(Span::styled(
        format!("  Answered {}/{total}", session.answered_count()),
        Style::default().fg(palette.text_muted),
    ));
    frame.render_widget(Paragraph::new(Line::from(progress)), chunks[1]);

    if let Some(question) = app.focused() {
        let selected = session.answer_for(question.id());
        let card = question_card(question, focused, selected, false, palette, glyphs);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::focused_border(palette))
            .title(Span::styled(
                format!(" Question {} ", focused + 1),
                styles::title(palette),
            ))
            .padding(Padding::horizontal(1));
        frame.render_widget(
            Paragraph::new(card)
                .block(block)
                .wrap(Wrap { trim: false }),
            chunks[2],
        );
    }

    let hint = if session.all_answered() {
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(
                " Finish Quiz & See Results",
                Style::default().fg(palette.success),
            ),
        ])
    } else {
        Line::from(Span::styled(
            format!(
                "{} {}",
                glyphs.warning,
                mcq_engine::INCOMPLETE_QUIZ_HINT
            ),
            Style::default().fg(palette.warning),
        ))
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), hint]).alignment(Alignment::Center),
        chunks[3],
    );
}

/// Prompt plus four options. With `show_feedback`, the correct option and a
/// wrong selection are marked.
fn question_card(
    question: &Question,
    index: usize,
    selected: Option<OptionKey>,
    show_feedback: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}. {}", index + 1, question.prompt()),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (key, text) in question.options().iter() {
        let is_selected = selected == Some(key);
        let is_correct = question.correct_answer().matches(key);
        let (marker, style) = match (show_feedback, is_selected) {
            (true, _) if is_correct => (
                glyphs.correct,
                Style::default()
                    .fg(palette.success)
                    .add_modifier(Modifier::BOLD),
            ),
            (true, true) => (
                glyphs.wrong,
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
            (true, false) => (" ", Style::default().fg(palette.text_muted)),
            (false, true) => (
                glyphs.radio_on,
                Style::default()
                    .fg(palette.accent)
                    .bg(palette.bg_highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            (false, false) => (glyphs.radio_off, Style::default().fg(palette.text_secondary)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{key}) {text}"), style),
        ]));
    }
    lines
}

// ----------------------------------------------------------------------
// Results
// ----------------------------------------------------------------------

/// Returns the bottom scroll offset for the review at this size.
fn draw_results(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Summary
            Constraint::Min(3),    // Detailed review
        ])
        .split(area);

    let session = app.session();
    let score = session.score();
    let percentage = score.percentage().unwrap_or(0);
    let tier_color = session
        .status_tier()
        .map_or(palette.text_muted, |tier| palette.tier(tier));
    let message = session.status_tier().map_or("", |tier| tier.message());

    let summary = vec![
        Line::from(Span::styled(
            format!("Topic: \"{}\"", session.topic().trim()),
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{percentage}%"),
                Style::default().fg(tier_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   Correct: {} / {}", score.correct, score.total),
                Style::default().fg(palette.text_primary),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(tier_color))),
    ];
    let summary_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(tier_color))
        .title(Span::styled(" Quiz Complete! ", styles::title(palette)))
        .padding(Padding::horizontal(1));
    frame.render_widget(
        Paragraph::new(summary)
            .block(summary_block)
            .alignment(Alignment::Center),
        chunks[0],
    );

    let mut review: Vec<Line> = Vec::new();
    for (index, question) in session.questions().iter().enumerate() {
        if index > 0 {
            review.push(Line::from(""));
        }
        let selected = session.answer_for(question.id());
        review.extend(question_card(
            question,
            index,
            selected,
            true,
            palette,
            glyphs,
        ));
        review.push(Line::from(vec![
            Span::styled(
                "   Explanation: ",
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                question.explanation().to_string(),
                Style::default().fg(palette.text_secondary),
            ),
        ]));
    }

    let review_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette))
        .title(Span::styled(" Detailed Review ", styles::title(palette)))
        .padding(Padding::horizontal(1));
    let inner = review_block.inner(chunks[1]);
    let content_height = wrapped_line_count(&review, inner.width);
    let max_scroll = content_height.saturating_sub(inner.height);
    let scroll = app.results_scroll().min(max_scroll);

    frame.render_widget(
        Paragraph::new(review)
            .block(review_block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        chunks[1],
    );

    if max_scroll > 0 {
        let mut scrollbar_state =
            ScrollbarState::new(usize::from(max_scroll)).position(usize::from(scroll));
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .style(Style::default().fg(palette.text_muted)),
            chunks[1].inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
    max_scroll
}

fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut total: u16 = 0;

    for line in lines {
        let line_width = line.width();
        let rows = if line_width == 0 {
            1
        } else {
            ((line_width - 1) / width) + 1
        };
        total = total.saturating_add(u16::try_from(rows).unwrap_or(u16::MAX));
    }

    total
}

// ----------------------------------------------------------------------
// Status bar
// ----------------------------------------------------------------------

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let hints: &[(&str, &str)] = match app.view() {
        View::Landing => &[("Enter", "generate"), ("Esc", "quit")],
        View::Quiz => &[
            ("j/k", "move"),
            ("a-d", "answer"),
            ("y", "copy"),
            ("Enter", "finish"),
            ("Esc", "home"),
        ],
        View::Results => &[
            ("j/k", "scroll"),
            ("p", "print"),
            ("y", "copy"),
            ("n", "new quiz"),
        ],
    };

    let mut spans = vec![Span::raw(" ")];
    if let Some(msg) = app.status_message() {
        spans.push(Span::styled(
            msg.to_string(),
            Style::default().fg(palette.accent),
        ));
    } else if app.is_generating() {
        let spinner = spinner_frame(app.tick_count(), app.ui_options());
        spans.push(Span::styled(
            format!("{spinner} Generating questions with {}...", app.source_name()),
            Style::default().fg(palette.primary),
        ));
    } else {
        for (key, label) in hints {
            spans.push(Span::styled(*key, styles::key_highlight(palette)));
            spans.push(Span::styled(format!(" {label}  "), styles::key_hint(palette)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let right = Line::from(Span::styled(
        format!("{} {} ", glyphs.separator, app.source_name()),
        styles::key_hint(palette),
    ));
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use mcq_engine::{App, OptionKey};

    use super::draw;
    use crate::test_support::{landing_app, quiz_app};

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn landing_shows_placeholder_and_hints() {
        let mut app = landing_app();
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Master Any Subject with AI Quizzes"));
        assert!(screen.contains("Enter a topic (e.g. Photosynthesis"));
        assert!(screen.contains("Enter: Generate"));
        assert!(screen.contains("LANDING"));
    }

    #[test]
    fn landing_shows_empty_topic_error() {
        let mut app = landing_app();
        let _ = app.generate();
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Please enter a topic first."));
    }

    #[tokio::test]
    async fn landing_shows_spinner_while_generating() {
        let mut app = landing_app();
        app.topic_insert_text("Photosynthesis");
        app.generate().unwrap();
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Generating..."));
        assert!(screen.contains("Photosynthesis"));
    }

    #[tokio::test]
    async fn quiz_shows_focused_question_and_hint() {
        let mut app = quiz_app().await;
        app.select_focused(OptionKey::B).unwrap();
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Topic: Photosynthesis"));
        assert!(screen.contains("Question 2 of 5"));
        assert!(screen.contains("Answered 1/5"));
        assert!(screen.contains("2. Which pigment drives step 2?"));
        assert!(screen.contains("C) Xanthophyll 2"));
        assert!(screen.contains("Please answer all questions to see results"));
    }

    #[tokio::test]
    async fn quiz_offers_finish_once_complete() {
        let mut app = quiz_app().await;
        for _ in 0..5 {
            app.select_focused(OptionKey::A).unwrap();
        }
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Finish Quiz & See Results"));
        assert!(!screen.contains("Please answer all questions"));
    }

    #[tokio::test]
    async fn results_show_score_and_review() {
        let mut app = quiz_app().await;
        // Correct: B, A, D, C, B. Three right, two wrong.
        for key in [
            OptionKey::B,
            OptionKey::A,
            OptionKey::D,
            OptionKey::A,
            OptionKey::A,
        ] {
            app.select_focused(key).unwrap();
        }
        assert!(app.finish());
        let screen = render(&mut app, 100, 40);
        assert!(screen.contains("Quiz Complete!"));
        assert!(screen.contains("60%"));
        assert!(screen.contains("Correct: 3 / 5"));
        assert!(screen.contains("Good job! You have a solid understanding."));
        assert!(screen.contains("Detailed Review"));
        assert!(screen.contains("Explanation: Step 1 absorbs red and blue light."));
    }

    #[tokio::test]
    async fn results_scroll_reveals_later_questions() {
        let mut app = quiz_app().await;
        for _ in 0..5 {
            app.select_focused(OptionKey::B).unwrap();
        }
        app.finish();
        let top = render(&mut app, 100, 24);
        assert!(!top.contains("5. Which pigment"));

        app.scroll_results_down(200);
        let bottom = render(&mut app, 100, 24);
        assert!(bottom.contains("5. Which pigment drives step 5?"));
        assert!(!bottom.contains("1. Which pigment"));

        // Drawing pins the offset to the last line, so one step up moves the view.
        let max = app.results_scroll();
        assert!(max < 200);
        app.scroll_results_down(10);
        assert_eq!(app.results_scroll(), max);
        app.scroll_results_up(1);
        assert_eq!(app.results_scroll(), max - 1);
        let nudged = render(&mut app, 100, 24);
        assert_ne!(nudged, bottom);
    }

    #[test]
    fn ascii_mode_renders_without_unicode_markers() {
        let mut app = App::new(
            std::sync::Arc::new(crate::test_support::FixedSource),
            None,
            mcq_engine::AppOptions {
                ascii_only: true,
                ..mcq_engine::AppOptions::default()
            },
        );
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("[?] MCQs Generator"));
        assert!(!screen.contains('◆'));
    }
}
