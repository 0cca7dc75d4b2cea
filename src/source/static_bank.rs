//! Fixed in-memory question bank walked by position.

use async_trait::async_trait;

use super::{GenerationContext, QuestionSource};
use crate::ai::GenerationError;
use crate::models::QuestionRecord;

pub struct StaticSource {
    questions: Vec<QuestionRecord>,
}

impl StaticSource {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    fn total_questions(&self) -> usize {
        self.questions.len()
    }

    async fn produce_next(
        &self,
        ctx: &GenerationContext,
    ) -> Result<QuestionRecord, GenerationError> {
        // The controller never asks past the bank's length.
        self.questions
            .get(ctx.position)
            .cloned()
            .ok_or_else(|| {
                GenerationError::Invalid(format!("no question at position {}", ctx.position))
            })
    }
}
