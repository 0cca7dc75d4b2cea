//! Follow-up Q&A about the question on screen.

use std::sync::Arc;

use super::{GenerationError, GenerativeClient, prompt};
use crate::models::QuestionRecord;

/// Asks the generation service free-text follow-up questions. Stateless:
/// each call embeds the question context in the prompt and nothing else.
pub struct FollowUpClient {
    client: Arc<dyn GenerativeClient>,
    locale: String,
}

impl FollowUpClient {
    pub fn new(client: Arc<dyn GenerativeClient>, locale: String) -> Self {
        Self { client, locale }
    }

    pub async fn ask(
        &self,
        question: &QuestionRecord,
        user_text: &str,
    ) -> Result<String, GenerationError> {
        let instruction = prompt::build_followup_instruction(question, user_text, &self.locale);
        let answer = self.client.generate(&instruction, None).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(GenerationError::Parse("empty follow-up answer".to_string()));
        }
        Ok(answer.to_string())
    }
}
