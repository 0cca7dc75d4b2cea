//! Question source backed by the generation service.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use super::{GenerationContext, QuestionSource};
use crate::ai::{GenerationError, GenerativeClient, prompt};
use crate::models::{QuestionKind, QuestionRecord};
use crate::session::GENERATED_QUESTION_TOTAL;

/// Requests one new question at a time from the generation service,
/// validating each response before it reaches the session.
pub struct GeneratedSource {
    client: Arc<dyn GenerativeClient>,
    locale: String,
}

impl GeneratedSource {
    pub fn new(client: Arc<dyn GenerativeClient>, locale: String) -> Self {
        Self { client, locale }
    }
}

#[async_trait]
impl QuestionSource for GeneratedSource {
    fn total_questions(&self) -> usize {
        GENERATED_QUESTION_TOTAL
    }

    async fn produce_next(
        &self,
        ctx: &GenerationContext,
    ) -> Result<QuestionRecord, GenerationError> {
        let instruction =
            prompt::build_question_instruction(&ctx.settings, &ctx.history, &self.locale);
        let schema = prompt::question_schema();
        let text = self.client.generate(&instruction, Some(&schema)).await?;

        let mut question: QuestionRecord =
            serde_json::from_str(&text).map_err(|e| GenerationError::Parse(e.to_string()))?;
        question.id = fresh_id();
        validate(&mut question)?;
        Ok(question)
    }
}

/// Timestamp-derived id, unique enough for one in-memory session.
fn fresh_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Enforce the content rules on a freshly parsed record. Stray options on an
/// open-ended question are cleared; everything else is a hard failure.
fn validate(question: &mut QuestionRecord) -> Result<(), GenerationError> {
    if question.prompt.trim().is_empty() {
        return Err(GenerationError::Invalid("empty question text".to_string()));
    }
    if question.correct_answer.trim().is_empty() {
        return Err(GenerationError::Invalid("empty correct answer".to_string()));
    }
    match question.kind {
        QuestionKind::MultipleChoice => {
            if question.options.len() != 4 {
                return Err(GenerationError::Invalid(format!(
                    "expected 4 options, got {}",
                    question.options.len()
                )));
            }
            if !question.has_unique_correct_option() {
                return Err(GenerationError::Invalid(format!(
                    "correct answer '{}' does not match exactly one option",
                    question.correct_answer
                )));
            }
        }
        QuestionKind::OpenEnded => {
            question.options.clear();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::QuizSettings;
    use serde_json::Value;

    /// Deterministic stand-in for the hosted service. Records the last
    /// instruction so tests can inspect what was sent.
    struct CannedClient {
        reply: Result<String, GenerationError>,
        last_instruction: std::sync::Mutex<Option<String>>,
    }

    impl CannedClient {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last_instruction: std::sync::Mutex::new(None),
            }
        }

        fn err(error: GenerationError) -> Self {
            Self {
                reply: Err(error),
                last_instruction: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl GenerativeClient for CannedClient {
        async fn generate(
            &self,
            instruction: &str,
            schema: Option<&Value>,
        ) -> Result<String, GenerationError> {
            assert!(schema.is_some());
            *self.last_instruction.lock().unwrap() = Some(instruction.to_string());
            self.reply.clone()
        }
    }

    fn ctx_with_history(history: &[&str]) -> GenerationContext {
        GenerationContext {
            position: 0,
            settings: QuizSettings::default(),
            history: history.iter().map(|s| s.to_string()).collect(),
        }
    }

    const VALID_MC: &str = r#"{
        "type": "multiple-choice",
        "level": "medium",
        "question": "Flink 检查点的作用是什么？",
        "options": ["A) 压缩状态", "B) 容错快照", "C) 负载均衡", "D) 指标上报"],
        "correct_answer": "B",
        "explanation": "检查点为状态做一致性快照。",
        "extension": "对比 savepoint 与 checkpoint。"
    }"#;

    #[tokio::test]
    async fn test_valid_response_gets_fresh_id() {
        let client = Arc::new(CannedClient::ok(VALID_MC));
        let source = GeneratedSource::new(client, "Chinese".to_string());
        let question = source.produce_next(&ctx_with_history(&[])).await.unwrap();
        assert!(question.id > 0);
        assert_eq!(question.kind, QuestionKind::MultipleChoice);
        assert!(question.has_unique_correct_option());
    }

    #[tokio::test]
    async fn test_history_reaches_the_service() {
        let client = Arc::new(CannedClient::ok(VALID_MC));
        let source = GeneratedSource::new(client.clone(), "Chinese".to_string());
        let ctx = ctx_with_history(&["第一题", "第二题"]);
        source.produce_next(&ctx).await.unwrap();

        let sent = client.last_instruction.lock().unwrap().clone().unwrap();
        assert!(sent.contains("第一题"));
        assert!(sent.contains("第二题"));
    }

    #[tokio::test]
    async fn test_missing_correct_answer_is_generation_error() {
        let payload = r#"{
            "type": "qa",
            "level": "easy",
            "question": "什么是水位线？",
            "options": [],
            "explanation": "e",
            "extension": "x"
        }"#;
        let source =
            GeneratedSource::new(Arc::new(CannedClient::ok(payload)), "Chinese".to_string());
        let result = source.produce_next(&ctx_with_history(&[])).await;
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let payload = r#"{
            "type": "qa",
            "level": "easy",
            "question": "   ",
            "options": [],
            "correct_answer": "a",
            "explanation": "e",
            "extension": "x"
        }"#;
        let source =
            GeneratedSource::new(Arc::new(CannedClient::ok(payload)), "Chinese".to_string());
        let result = source.produce_next(&ctx_with_history(&[])).await;
        assert!(matches!(result, Err(GenerationError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_unmatched_correct_letter_is_rejected() {
        let payload = r#"{
            "type": "multiple-choice",
            "level": "hard",
            "question": "q",
            "options": ["A) a", "B) b", "C) c", "D) d"],
            "correct_answer": "E",
            "explanation": "e",
            "extension": "x"
        }"#;
        let source =
            GeneratedSource::new(Arc::new(CannedClient::ok(payload)), "Chinese".to_string());
        let result = source.produce_next(&ctx_with_history(&[])).await;
        assert!(matches!(result, Err(GenerationError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_open_ended_options_are_cleared() {
        let payload = r#"{
            "type": "qa",
            "level": "easy",
            "question": "q",
            "options": ["A) stray"],
            "correct_answer": "reference answer",
            "explanation": "e",
            "extension": "x"
        }"#;
        let source =
            GeneratedSource::new(Arc::new(CannedClient::ok(payload)), "Chinese".to_string());
        let question = source.produce_next(&ctx_with_history(&[])).await.unwrap();
        assert!(question.options.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_passes_through_as_generation_error() {
        let source = GeneratedSource::new(
            Arc::new(CannedClient::err(GenerationError::Transport(
                "connection refused".to_string(),
            ))),
            "Chinese".to_string(),
        );
        let result = source.produce_next(&ctx_with_history(&[])).await;
        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }
}
