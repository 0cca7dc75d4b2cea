//! Question sources: a fixed bank or the AI generator behind one contract.

mod generated;
mod static_bank;

pub use generated::GeneratedSource;
pub use static_bank::StaticSource;

use async_trait::async_trait;

use crate::ai::GenerationError;
use crate::models::QuestionRecord;
use crate::session::QuizSettings;

/// Everything a source may need to produce the next question. The static
/// source indexes by `position`; the generator uses `settings` and
/// `history`.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// 0-based index of the question slot being filled.
    pub position: usize,
    pub settings: QuizSettings,
    /// Prompts already shown this session, to steer away from repeats.
    pub history: Vec<String>,
}

/// Polymorphic supplier of the next question.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fixed total for a session drawn from this source.
    fn total_questions(&self) -> usize;

    async fn produce_next(
        &self,
        ctx: &GenerationContext,
    ) -> Result<QuestionRecord, GenerationError>;
}
