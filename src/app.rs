//! Application controller.
//!
//! Routes keyboard input according to the session phase, owns the two
//! outstanding-request slots (question generation and follow-up), and
//! discards AI results that arrive for an abandoned session.

use std::sync::Arc;

use crossterm::event::KeyCode;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::ai::{FollowUpClient, GenerationError};
use crate::models::{QuestionKind, QuestionRecord};
use crate::session::{
    Advanced, DifficultyFilter, KindFilter, Phase, QuizSession, QuizSettings,
};
use crate::source::{GenerationContext, QuestionSource};

/// Completion of a spawned AI call. Tagged with the session (and, for
/// follow-ups, the question) it was issued for; mismatching tags mean the
/// user restarted or moved on while the request was in flight, and the
/// result is dropped.
pub enum AppEvent {
    QuestionReady {
        session: Uuid,
        result: Result<QuestionRecord, GenerationError>,
    },
    FollowUpReady {
        session: Uuid,
        question_id: u64,
        result: Result<String, GenerationError>,
    },
}

/// Where keystrokes go on the question screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a follow-up question.
    FollowUp,
}

pub struct App {
    pub session: QuizSession,
    source: Arc<dyn QuestionSource>,
    followup: Option<Arc<FollowUpClient>>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Identity of the current session; regenerated on restart so stale
    /// responses can be recognized.
    session_id: Uuid,
    loading: bool,
    // Setup form state (generated variant only).
    pub setup_row: usize,
    pub setup_difficulty: usize,
    pub setup_kind: usize,
    // Question view state.
    pub selected_option: usize,
    pub selected_letter: Option<String>,
    pub input_mode: InputMode,
    pub followup_input: String,
    pub followup_answer: Option<String>,
    pub followup_error: Option<String>,
    pub followup_loading: bool,
}

impl App {
    /// App for the generated variant: setup screen first, follow-ups on.
    pub fn generated(source: Arc<dyn QuestionSource>, followup: FollowUpClient) -> Self {
        let session = QuizSession::with_setup(source.total_questions());
        Self::new(session, source, Some(Arc::new(followup)))
    }

    /// App for the static variant: starts on question 1, no follow-ups.
    pub fn static_bank(source: Arc<dyn QuestionSource>) -> Self {
        let session = QuizSession::active(source.total_questions());
        Self::new(session, source, None)
    }

    fn new(
        session: QuizSession,
        source: Arc<dyn QuestionSource>,
        followup: Option<Arc<FollowUpClient>>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session,
            source,
            followup,
            events_tx,
            events_rx,
            session_id: Uuid::new_v4(),
            loading: false,
            setup_row: 0,
            setup_difficulty: 0,
            setup_kind: 0,
            selected_option: 0,
            selected_letter: None,
            input_mode: InputMode::Normal,
            followup_input: String::new(),
            followup_answer: None,
            followup_error: None,
            followup_loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn followups_available(&self) -> bool {
        self.followup.is_some()
    }

    /// Kick off the first question if the session starts in `Active`
    /// (static variant). Called once before the event loop.
    pub fn bootstrap(&mut self) {
        if self.session.phase == Phase::Active
            && self.session.current_question.is_none()
            && !self.loading
        {
            self.request_next_question();
        }
    }

    /// Drain completed AI calls without blocking the draw loop.
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::QuestionReady { session, result } => {
                if session != self.session_id {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(question) => {
                        self.reset_question_view();
                        self.session.set_question(question);
                    }
                    Err(error) => self.session.set_error(error.to_string()),
                }
            }
            AppEvent::FollowUpReady {
                session,
                question_id,
                result,
            } => {
                if session != self.session_id {
                    return;
                }
                let current = self.session.current_question.as_ref().map(|q| q.id);
                if current != Some(question_id) {
                    return;
                }
                self.followup_loading = false;
                match result {
                    Ok(answer) => self.followup_answer = Some(answer),
                    Err(error) => self.followup_error = Some(error.to_string()),
                }
            }
        }
    }

    /// Returns true if the app should exit.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        if self.input_mode == InputMode::FollowUp {
            self.handle_followup_input(key);
            return false;
        }
        match self.session.phase {
            Phase::Setup => self.handle_setup_input(key),
            Phase::Active => self.handle_active_input(key),
            Phase::Finished => self.handle_result_input(key),
        }
    }

    fn handle_setup_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.setup_row = self.setup_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.setup_row = (self.setup_row + 1).min(1);
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_setup_value(true),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_setup_value(false),
            KeyCode::Enter => {
                let settings = QuizSettings {
                    difficulty: DifficultyFilter::ALL[self.setup_difficulty],
                    kind: KindFilter::ALL[self.setup_kind],
                };
                self.session.start(settings);
                self.request_next_question();
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            _ => {}
        }
        false
    }

    fn cycle_setup_value(&mut self, backwards: bool) {
        let (index, len) = match self.setup_row {
            0 => (&mut self.setup_difficulty, DifficultyFilter::ALL.len()),
            _ => (&mut self.setup_kind, KindFilter::ALL.len()),
        };
        *index = if backwards {
            (*index + len - 1) % len
        } else {
            (*index + 1) % len
        };
    }

    fn handle_active_input(&mut self, key: KeyCode) -> bool {
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
            return true;
        }
        if self.loading {
            return false;
        }
        if self.session.error.is_some() {
            if matches!(key, KeyCode::Char('r') | KeyCode::Char('R')) {
                self.request_next_question();
            }
            return false;
        }
        let Some(question) = self.session.current_question.clone() else {
            return false;
        };

        if self.session.is_answered() {
            match key {
                KeyCode::Enter | KeyCode::Char('n') => self.advance_question(),
                KeyCode::Char('f') if self.followup.is_some() => {
                    self.input_mode = InputMode::FollowUp;
                }
                _ => {}
            }
            return false;
        }

        match question.kind {
            QuestionKind::MultipleChoice => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    let len = question.options.len().max(1);
                    self.selected_option = (self.selected_option + len - 1) % len;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let len = question.options.len().max(1);
                    self.selected_option = (self.selected_option + 1) % len;
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if let Some(option) = question.options.get(self.selected_option) {
                        self.selected_letter =
                            crate::models::option_letter(option).map(|l| l.to_string());
                        self.session.record_answer(question.is_correct_option(option));
                    }
                }
                _ => {}
            },
            QuestionKind::OpenEnded => {
                if matches!(key, KeyCode::Enter | KeyCode::Char('s')) {
                    self.session.reveal();
                }
            }
        }
        false
    }

    fn handle_result_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.restart();
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        }
    }

    fn handle_followup_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.followup_input.clear();
            }
            KeyCode::Char(c) => self.followup_input.push(c),
            KeyCode::Backspace => {
                self.followup_input.pop();
            }
            KeyCode::Enter => {
                if !self.followup_loading && !self.followup_input.trim().is_empty() {
                    self.ask_followup();
                }
            }
            _ => {}
        }
    }

    fn advance_question(&mut self) {
        self.reset_question_view();
        if let Advanced::NeedNext = self.session.advance() {
            self.request_next_question();
        }
    }

    /// Fresh session, fresh identity. In-flight requests keep running but
    /// their results no longer match `session_id` and are dropped.
    fn restart(&mut self) {
        self.session_id = Uuid::new_v4();
        self.loading = false;
        self.reset_question_view();
        self.session.restart();
        self.bootstrap();
    }

    /// Request the next question from the source. At most one generation
    /// request is in flight per session; a retry after an error re-sends
    /// the same context, since the failed question never joined `history`.
    fn request_next_question(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.session.error = None;
        let ctx = GenerationContext {
            position: self.session.answered_count(),
            settings: self.session.settings,
            history: self.session.history().to_vec(),
        };
        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        let session = self.session_id;
        tokio::spawn(async move {
            let result = source.produce_next(&ctx).await;
            let _ = tx.send(AppEvent::QuestionReady { session, result });
        });
    }

    fn ask_followup(&mut self) {
        let Some(followup) = self.followup.as_ref().map(Arc::clone) else {
            return;
        };
        let Some(question) = self.session.current_question.clone() else {
            return;
        };
        let user_text = std::mem::take(&mut self.followup_input);
        self.input_mode = InputMode::Normal;
        self.followup_loading = true;
        self.followup_answer = None;
        self.followup_error = None;

        let tx = self.events_tx.clone();
        let session = self.session_id;
        let question_id = question.id;
        tokio::spawn(async move {
            let result = followup.ask(&question, user_text.trim()).await;
            let _ = tx.send(AppEvent::FollowUpReady {
                session,
                question_id,
                result,
            });
        });
    }

    fn reset_question_view(&mut self) {
        self.selected_option = 0;
        self.selected_letter = None;
        self.input_mode = InputMode::Normal;
        self.followup_input.clear();
        self.followup_answer = None;
        self.followup_error = None;
        self.followup_loading = false;
    }

    #[cfg(test)]
    fn current_session_id(&self) -> Uuid {
        self.session_id
    }

    #[cfg(test)]
    async fn wait_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::source::StaticSource;

    fn mc_question(id: u64) -> QuestionRecord {
        QuestionRecord {
            id,
            kind: QuestionKind::MultipleChoice,
            difficulty: Difficulty::Easy,
            prompt: format!("q{}", id),
            options: vec![
                "A) a".to_string(),
                "B) b".to_string(),
                "C) c".to_string(),
                "D) d".to_string(),
            ],
            correct_answer: "A".to_string(),
            explanation: "e".to_string(),
            extension: "x".to_string(),
        }
    }

    fn static_app(count: u64) -> App {
        let questions = (1..=count).map(mc_question).collect();
        App::static_bank(Arc::new(StaticSource::new(questions)))
    }

    #[test]
    fn test_stale_question_response_is_dropped() {
        let mut app = static_app(2);
        app.handle_event(AppEvent::QuestionReady {
            session: Uuid::new_v4(),
            result: Ok(mc_question(1)),
        });
        assert!(app.session.current_question.is_none());
    }

    #[test]
    fn test_matching_question_response_is_installed() {
        let mut app = static_app(2);
        let session = app.current_session_id();
        app.handle_event(AppEvent::QuestionReady {
            session,
            result: Ok(mc_question(1)),
        });
        assert!(app.session.current_question.is_some());
        assert!(app.session.error.is_none());
    }

    #[test]
    fn test_error_response_leaves_question_absent() {
        let mut app = static_app(2);
        let session = app.current_session_id();
        app.handle_event(AppEvent::QuestionReady {
            session,
            result: Err(GenerationError::Transport("refused".to_string())),
        });
        assert!(app.session.current_question.is_none());
        assert!(app.session.error.is_some());
        assert!(app.session.history().is_empty());
    }

    #[test]
    fn test_followup_for_previous_question_is_dropped() {
        let mut app = static_app(2);
        let session = app.current_session_id();
        app.handle_event(AppEvent::QuestionReady {
            session,
            result: Ok(mc_question(2)),
        });
        app.handle_event(AppEvent::FollowUpReady {
            session,
            question_id: 1,
            result: Ok("late answer".to_string()),
        });
        assert!(app.followup_answer.is_none());
    }

    #[tokio::test]
    async fn test_static_walkthrough_scores_and_finishes() {
        let mut app = static_app(2);
        app.bootstrap();
        app.wait_event().await;

        // First question: answer correctly (correct letter is A, cursor
        // starts there).
        app.handle_input(KeyCode::Enter);
        assert_eq!(app.session.score(), 1);
        app.handle_input(KeyCode::Enter);
        app.wait_event().await;

        // Second question: pick B, which is wrong.
        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Enter);
        assert_eq!(app.session.score(), 1);
        app.handle_input(KeyCode::Enter);

        assert_eq!(app.session.phase, Phase::Finished);
        assert_eq!(app.session.percentage(), 50);
    }

    #[tokio::test]
    async fn test_restart_invalidates_previous_session() {
        let mut app = static_app(2);
        app.bootstrap();
        app.wait_event().await;
        let old_session = app.current_session_id();

        app.handle_input(KeyCode::Enter);
        app.handle_input(KeyCode::Enter);
        app.wait_event().await;
        app.handle_input(KeyCode::Enter);
        app.handle_input(KeyCode::Enter);
        assert_eq!(app.session.phase, Phase::Finished);

        app.handle_input(KeyCode::Char('r'));
        assert_ne!(app.current_session_id(), old_session);
        assert_eq!(app.session.score(), 0);
        assert_eq!(app.session.answered_count(), 0);

        // A response from the pre-restart session must not land.
        app.handle_event(AppEvent::QuestionReady {
            session: old_session,
            result: Ok(mc_question(9)),
        });
        assert!(
            app.session
                .current_question
                .as_ref()
                .is_none_or(|q| q.id != 9)
        );
    }
}
