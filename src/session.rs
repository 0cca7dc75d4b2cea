//! Quiz session state machine.
//!
//! A [`QuizSession`] owns all progression state for one run of the quiz:
//! phase, score, answered counter, the current question, and the history of
//! prompts fed back to the generator. It is mutated only by the app layer in
//! response to user actions and question-source results, and replaced by a
//! fresh instance on restart.

use crate::models::{Difficulty, QuestionKind, QuestionRecord};

/// Number of questions in a generated session.
pub const GENERATED_QUESTION_TOTAL: usize = 10;

/// Current phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Choosing difficulty/type filters (generated variant only).
    Setup,
    /// Answering questions.
    Active,
    /// Viewing results.
    Finished,
}

/// Difficulty filter chosen on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    Any,
    Fixed(Difficulty),
}

impl DifficultyFilter {
    pub const ALL: [DifficultyFilter; 4] = [
        DifficultyFilter::Any,
        DifficultyFilter::Fixed(Difficulty::Easy),
        DifficultyFilter::Fixed(Difficulty::Medium),
        DifficultyFilter::Fixed(Difficulty::Hard),
    ];

    /// Value sent to the generator ("any" is the wildcard).
    pub fn request_value(&self) -> &'static str {
        match self {
            DifficultyFilter::Any => "any",
            DifficultyFilter::Fixed(d) => d.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyFilter::Any => "任意",
            DifficultyFilter::Fixed(d) => d.label(),
        }
    }
}

/// Question-type filter chosen on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    Any,
    Fixed(QuestionKind),
}

impl KindFilter {
    pub const ALL: [KindFilter; 3] = [
        KindFilter::Any,
        KindFilter::Fixed(QuestionKind::MultipleChoice),
        KindFilter::Fixed(QuestionKind::OpenEnded),
    ];

    pub fn request_value(&self) -> &'static str {
        match self {
            KindFilter::Any => "any",
            KindFilter::Fixed(k) => k.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::Any => "任意",
            KindFilter::Fixed(k) => k.label(),
        }
    }
}

/// Filters fixed at the Setup -> Active transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizSettings {
    pub difficulty: DifficultyFilter,
    pub kind: KindFilter,
}

/// Outcome of [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    /// More questions remain; the app must request the next one.
    NeedNext,
    /// The session reached its total and is now `Finished`.
    Finished,
}

/// Progression state for one quiz run.
pub struct QuizSession {
    pub phase: Phase,
    pub settings: QuizSettings,
    total: usize,
    initial_phase: Phase,
    answered_count: usize,
    score: usize,
    pub current_question: Option<QuestionRecord>,
    answered: bool,
    history: Vec<String>,
    /// Generation failure shown inline, distinct from `phase`.
    pub error: Option<String>,
}

impl QuizSession {
    /// Session for the generated variant: starts on the setup screen.
    pub fn with_setup(total: usize) -> Self {
        Self::new(total, Phase::Setup)
    }

    /// Session for the static variant: no setup screen, starts active.
    pub fn active(total: usize) -> Self {
        Self::new(total, Phase::Active)
    }

    fn new(total: usize, initial_phase: Phase) -> Self {
        Self {
            phase: initial_phase,
            settings: QuizSettings::default(),
            total,
            initial_phase,
            answered_count: 0,
            score: 0,
            current_question: None,
            answered: false,
            history: Vec::new(),
            error: None,
        }
    }

    pub fn total_questions(&self) -> usize {
        self.total
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// 1-based number of the question currently on screen.
    pub fn current_number(&self) -> usize {
        (self.answered_count + 1).min(self.total)
    }

    /// Transition Setup -> Active with the chosen filters. No-op outside
    /// Setup.
    pub fn start(&mut self, settings: QuizSettings) {
        if self.phase != Phase::Setup {
            return;
        }
        self.settings = settings;
        self.answered_count = 0;
        self.score = 0;
        self.history.clear();
        self.error = None;
        self.phase = Phase::Active;
    }

    /// Install the next question delivered by the question source.
    pub fn set_question(&mut self, question: QuestionRecord) {
        self.current_question = Some(question);
        self.answered = false;
        self.error = None;
    }

    /// Record a generation failure; `current_question` stays absent.
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Score the current question. Idempotent: only the first call per
    /// question counts.
    pub fn record_answer(&mut self, is_correct: bool) {
        if self.phase != Phase::Active || self.answered || self.current_question.is_none() {
            return;
        }
        self.answered = true;
        if is_correct {
            self.score += 1;
        }
    }

    /// Mark an open-ended question answered without a correctness signal.
    pub fn reveal(&mut self) {
        if self.phase != Phase::Active || self.answered || self.current_question.is_none() {
            return;
        }
        self.answered = true;
    }

    /// Move past the current (answered) question. Its prompt joins `history`
    /// so the generator can avoid repeats.
    pub fn advance(&mut self) -> Advanced {
        if self.phase != Phase::Active || !self.answered {
            return Advanced::NeedNext;
        }
        if let Some(question) = self.current_question.take() {
            self.history.push(question.prompt);
        }
        self.answered = false;
        self.answered_count += 1;
        if self.answered_count >= self.total {
            self.phase = Phase::Finished;
            Advanced::Finished
        } else {
            Advanced::NeedNext
        }
    }

    /// Discard all progression state and return to the initial phase.
    pub fn restart(&mut self) {
        self.phase = self.initial_phase;
        self.settings = QuizSettings::default();
        self.answered_count = 0;
        self.score = 0;
        self.current_question = None;
        self.answered = false;
        self.history.clear();
        self.error = None;
    }

    /// Final score as a rounded percentage.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.score as f64 / self.total as f64) * 100.0).round() as u32
    }
}
