//! # flink-quiz
//!
//! A terminal quiz for practicing Apache Flink interview questions.
//!
//! Questions come from one of two sources: a fixed JSON bank (offline), or
//! the Gemini generation service, which produces one question at a time
//! under user-chosen difficulty/type filters and also answers free-text
//! follow-ups about the question on screen.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flink_quiz::{Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Offline: walk a fixed question bank.
//!     let quiz = Quiz::from_json("questions.json")?;
//!     quiz.run().await?;
//!     Ok(())
//! }
//! ```

mod ai;
mod app;
mod data;
mod models;
mod session;
mod source;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};

pub use ai::{FollowUpClient, GeminiClient, GenerationError, GenerativeClient};
pub use app::{App, AppEvent};
pub use data::{LoadError, load_questions_from_json};
pub use models::{Difficulty, QuestionKind, QuestionRecord};
pub use session::{
    DifficultyFilter, GENERATED_QUESTION_TOTAL, KindFilter, Phase, QuizSession, QuizSettings,
};
pub use source::{GeneratedSource, GenerationContext, QuestionSource, StaticSource};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading the question bank.
    Load(LoadError),
    /// IO error during quiz execution.
    Io(io::Error),
    /// Missing or unusable configuration.
    Config(String),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load questions: {}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
            QuizError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Io(e) => Some(e),
            QuizError::Config(_) => None,
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Offline quiz over a fixed question bank loaded from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        let source = Arc::new(StaticSource::new(questions));
        Ok(Self {
            app: App::static_bank(source),
        })
    }

    /// AI-generated quiz: 10 questions produced on demand by the Gemini
    /// service, with follow-up Q&A enabled.
    pub fn generated(api_key: String, model: String, locale: String) -> Self {
        let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(api_key, model));
        let source = Arc::new(GeneratedSource::new(Arc::clone(&client), locale.clone()));
        let followup = FollowUpClient::new(client, locale);
        Self {
            app: App::generated(source, followup),
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal, displays the quiz UI, and returns when the
    /// user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut terminal = terminal::init()?;
        let result = run_event_loop(&mut terminal, &mut self.app).await;
        terminal::restore()?;
        result
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
) -> Result<(), QuizError> {
    app.bootstrap();

    loop {
        app.poll_events();
        terminal.draw(|frame| ui::render(frame, app))?;

        // Short poll so AI results arriving over the channel repaint the
        // screen without a keypress.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_input(key.code) {
                    break;
                }
            }
        }
    }

    Ok(())
}
