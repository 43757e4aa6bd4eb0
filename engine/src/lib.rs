//! Core engine for the quiz generator - state machine and orchestration.
//!
//! This crate contains the [`App`] shell without TUI dependencies. The shell owns
//! exactly one [`QuizSession`], the [`QuestionSource`] it generates from, the
//! persisted theme preference, and at most one in-flight generation task.
//!
//! The renderer reads state through accessors and forwards user intents through
//! the mutating methods; it never touches the session directly.

use std::sync::Arc;

use tokio::sync::oneshot;

pub use mcq_providers::{self, GeminiConfig, GeminiSource, GenerationError, QuestionSource};
pub use mcq_types::{
    self, Answers, CorrectAnswer, NonEmptyString, OptionKey, Question, QuestionDraft, QuestionId,
    Score, StatusTier, Topic, UiOptions, View,
};

mod config;
mod draft;
mod preferences;
mod session;

pub use config::{AppConfig, ConfigError, McqConfig, config_path, data_dir, expand_env_vars};
pub use draft::DraftInput;
pub use preferences::{PreferenceStore, Preferences, PreferencesError};
pub use session::{GENERATION_FAILED_MESSAGE, QuizError, QuizSession};

/// Hint shown when finishing is attempted before every question is answered.
pub const INCOMPLETE_QUIZ_HINT: &str = "Please answer all questions to see results";
/// Confirmation shown after the transcript reaches the clipboard.
pub const COPIED_MESSAGE: &str = "Copied all questions to clipboard!";

/// Status messages disappear after this many ticks.
const STATUS_TTL_TICKS: usize = 400;

type GenerationOutcome = Result<Vec<QuestionDraft>, GenerationError>;

// ============================================================================
// PendingGeneration - question request in flight
// ============================================================================

/// A generation task that has not reported back yet.
/// Existence proves a request is outstanding; dropping it discards the result.
#[derive(Debug)]
struct PendingGeneration {
    topic: Topic,
    receiver: oneshot::Receiver<GenerationOutcome>,
}

/// Text handed to an external sink by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    Clipboard { text: String },
    Print { topic: String, report: String },
}

/// Display flags that come from config rather than from the user at runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    pub ascii_only: bool,
    pub reduced_motion: bool,
    /// Used only when no preference has been saved.
    pub dark_mode_default: bool,
}

impl AppOptions {
    #[must_use]
    pub fn from_config(config: Option<&McqConfig>) -> Self {
        config
            .and_then(McqConfig::app)
            .map(|app| Self {
                ascii_only: app.ascii_only,
                reduced_motion: app.reduced_motion,
                dark_mode_default: app.dark_mode_default,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct StatusMessage {
    text: String,
    set_at: usize,
}

pub struct App {
    source: Arc<dyn QuestionSource>,
    session: QuizSession,
    topic_input: DraftInput,
    pending: Option<PendingGeneration>,
    next_question_id: u64,
    focused_question: usize,
    results_scroll: u16,
    /// Last bottom offset reported by the renderer; `None` until the results are drawn.
    results_scroll_max: Option<u16>,
    status: Option<StatusMessage>,
    export: Option<ExportRequest>,
    preference_store: Option<PreferenceStore>,
    preferences: Preferences,
    options: AppOptions,
    should_quit: bool,
    tick: usize,
}

impl App {
    /// Build the shell. Saved preferences are read from `preference_store` when given.
    pub fn new(
        source: Arc<dyn QuestionSource>,
        preference_store: Option<PreferenceStore>,
        options: AppOptions,
    ) -> Self {
        let saved = preference_store.as_ref().and_then(|store| match store.load() {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!("Ignoring unreadable preferences: {err}");
                None
            }
        });
        let preferences = saved.unwrap_or(Preferences {
            dark_mode: options.dark_mode_default,
        });

        Self {
            source,
            session: QuizSession::new(),
            topic_input: DraftInput::default(),
            pending: None,
            next_question_id: 0,
            focused_question: 0,
            results_scroll: 0,
            results_scroll_max: None,
            status: None,
            export: None,
            preference_store,
            preferences,
            options,
            should_quit: false,
            tick: 0,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.session.view()
    }

    #[must_use]
    pub fn topic_input(&self) -> &DraftInput {
        &self.topic_input
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.session.is_generating()
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    #[must_use]
    pub fn focused_question(&self) -> usize {
        self.focused_question
    }

    #[must_use]
    pub fn results_scroll(&self) -> u16 {
        self.results_scroll
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            ascii_only: self.options.ascii_only,
            dark_mode: self.preferences.dark_mode,
            reduced_motion: self.options.reduced_motion,
        }
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode
    }

    // ------------------------------------------------------------------
    // Topic editing (landing view, idle only)
    // ------------------------------------------------------------------

    #[must_use]
    pub fn can_edit_topic(&self) -> bool {
        self.view() == View::Landing && !self.is_generating()
    }

    fn edit_topic(&mut self, edit: impl FnOnce(&mut DraftInput)) {
        if !self.can_edit_topic() {
            return;
        }
        edit(&mut self.topic_input);
        if let Err(err) = self.session.set_topic(self.topic_input.text()) {
            tracing::debug!("Topic edit rejected: {err}");
        }
    }

    pub fn topic_insert_char(&mut self, c: char) {
        self.edit_topic(|draft| draft.enter_char(c));
    }

    pub fn topic_insert_text(&mut self, text: &str) {
        self.edit_topic(|draft| draft.enter_text(text));
    }

    pub fn topic_backspace(&mut self) {
        self.edit_topic(DraftInput::delete_char);
    }

    pub fn topic_delete(&mut self) {
        self.edit_topic(DraftInput::delete_char_forward);
    }

    pub fn topic_delete_word(&mut self) {
        self.edit_topic(DraftInput::delete_word_backwards);
    }

    pub fn topic_clear(&mut self) {
        self.edit_topic(DraftInput::clear);
    }

    pub fn topic_cursor_left(&mut self) {
        self.topic_input.move_cursor_left();
    }

    pub fn topic_cursor_right(&mut self) {
        self.topic_input.move_cursor_right();
    }

    pub fn topic_cursor_home(&mut self) {
        self.topic_input.move_cursor_home();
    }

    pub fn topic_cursor_end(&mut self) {
        self.topic_input.move_cursor_end();
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    /// Validate the topic and start a generation task.
    ///
    /// Must be called from within a tokio runtime. A second call while a
    /// request is outstanding is rejected before it reaches the source.
    pub fn generate(&mut self) -> Result<(), QuizError> {
        if self.pending.is_some() {
            self.set_status(QuizError::GenerationInProgress.to_string());
            return Err(QuizError::GenerationInProgress);
        }

        let topic = match self.session.begin_generation() {
            Ok(topic) => topic,
            // Shown by the landing view from the session's error field.
            Err(err @ QuizError::EmptyTopic) => return Err(err),
            Err(err) => {
                self.set_status(err.to_string());
                return Err(err);
            }
        };

        tracing::info!(source = self.source.name(), "Starting question generation");
        let (tx, rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let task_topic = topic.clone();
        tokio::spawn(async move {
            let outcome = source.generate(&task_topic).await;
            // Receiver is gone when the session was reset mid-flight.
            let _ = tx.send(outcome);
        });

        self.clear_status();
        self.pending = Some(PendingGeneration {
            topic,
            receiver: rx,
        });
        Ok(())
    }

    /// Apply a finished generation, if one has reported back.
    pub fn poll_generation(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let outcome = match pending.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(GenerationError::Aborted),
        };
        let Some(pending) = self.pending.take() else {
            return;
        };

        let outcome: Result<Vec<Question>, GenerationError> = outcome.map(|drafts| {
            drafts
                .into_iter()
                .map(|draft| Question::from_draft(self.allocate_question_id(), draft))
                .collect()
        });

        match self.session.complete_generation(outcome) {
            Ok(()) => {
                tracing::info!(topic = %pending.topic, "Quiz ready");
                self.focused_question = 0;
                self.reset_results_scroll();
            }
            Err(QuizError::GenerationFailed(_)) => {}
            Err(err) => tracing::warn!("Discarding generation result: {err}"),
        }
    }

    fn allocate_question_id(&mut self) -> QuestionId {
        let id = QuestionId::new(format!("q-{}", self.next_question_id));
        self.next_question_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Quiz view
    // ------------------------------------------------------------------

    pub fn focus_next_question(&mut self) {
        let count = self.session.questions().len();
        if count > 0 {
            self.focused_question = (self.focused_question + 1).min(count - 1);
        }
    }

    pub fn focus_prev_question(&mut self) {
        self.focused_question = self.focused_question.saturating_sub(1);
    }

    #[must_use]
    pub fn focused(&self) -> Option<&Question> {
        self.session.questions().get(self.focused_question)
    }

    pub fn select(&mut self, id: &QuestionId, key: OptionKey) -> Result<(), QuizError> {
        self.session.select_option(id, key)
    }

    /// Answer the focused question and advance focus to the next one.
    pub fn select_focused(&mut self, key: OptionKey) -> Result<(), QuizError> {
        let Some(id) = self.focused().map(|q| q.id().clone()) else {
            return Err(QuizError::WrongView {
                expected: View::Quiz,
                actual: self.view(),
            });
        };
        self.session.select_option(&id, key)?;
        self.focus_next_question();
        Ok(())
    }

    /// Finish the quiz when every question is answered.
    ///
    /// Returns whether the view changed. An incomplete quiz sets the hint as status.
    pub fn finish(&mut self) -> bool {
        if self.view() != View::Quiz {
            return false;
        }
        if !self.session.all_answered() {
            self.set_status(INCOMPLETE_QUIZ_HINT);
            return false;
        }
        match self.session.finish() {
            Ok(()) => {
                self.reset_results_scroll();
                self.clear_status();
                true
            }
            Err(err) => {
                self.set_status(err.to_string());
                false
            }
        }
    }

    /// Return to the initial landing state. An in-flight result is discarded.
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            tracing::info!("Discarding in-flight question generation");
        }
        self.session.reset();
        self.topic_input.clear();
        self.focused_question = 0;
        self.reset_results_scroll();
        self.clear_status();
    }

    // ------------------------------------------------------------------
    // Results view
    // ------------------------------------------------------------------

    pub fn scroll_results_down(&mut self, lines: u16) {
        let scroll = self.results_scroll.saturating_add(lines);
        self.results_scroll = match self.results_scroll_max {
            Some(max) => scroll.min(max),
            None => scroll,
        };
    }

    pub fn scroll_results_up(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_sub(lines);
    }

    pub fn scroll_results_to_top(&mut self) {
        self.results_scroll = 0;
    }

    /// Record how far the results can scroll at the current size, pulling the
    /// offset back if the content shrank or the terminal grew.
    pub fn update_results_scroll_max(&mut self, max: u16) {
        self.results_scroll_max = Some(max);
        self.results_scroll = self.results_scroll.min(max);
    }

    fn reset_results_scroll(&mut self) {
        self.results_scroll = 0;
        self.results_scroll_max = None;
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Queue the transcript for the clipboard sink.
    pub fn copy_questions(&mut self) {
        if self.session.questions().is_empty() {
            self.set_status("No questions to copy");
            return;
        }
        self.export = Some(ExportRequest::Clipboard {
            text: mcq_types::transcript(self.session.questions()),
        });
    }

    /// Queue the results report for the print sink.
    pub fn print_results(&mut self) {
        if self.view() != View::Results {
            self.set_status("Results can be printed once the quiz is finished");
            return;
        }
        let report = mcq_types::results_report(
            self.session.topic().trim(),
            self.session.questions(),
            self.session.answers(),
        );
        self.export = Some(ExportRequest::Print {
            topic: self.session.topic().trim().to_string(),
            report,
        });
    }

    /// Check if an export was requested and clear it.
    pub fn take_export(&mut self) -> Option<ExportRequest> {
        self.export.take()
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    /// Flip dark mode and persist the new value.
    pub fn toggle_dark_mode(&mut self) {
        self.preferences.dark_mode = !self.preferences.dark_mode;
        if let Some(store) = &self.preference_store
            && let Err(err) = store.save(&self.preferences)
        {
            tracing::warn!("Failed to save preferences: {err}");
            self.set_status("Could not save theme preference");
        }
    }

    // ------------------------------------------------------------------
    // Status + lifecycle
    // ------------------------------------------------------------------

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: message.into(),
            set_at: self.tick,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Advance one frame: apply finished work and age the status line.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.poll_generation();
        if let Some(status) = &self.status
            && self.tick.wrapping_sub(status.set_at) > STATUS_TTL_TICKS
        {
            self.status = None;
        }
    }
}
