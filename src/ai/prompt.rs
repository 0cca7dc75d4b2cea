//! Instruction and schema construction for the generation service.

use serde_json::Value;

use crate::models::QuestionRecord;
use crate::session::QuizSettings;

/// Structured-output schema for one generated question. Mirrors
/// [`QuestionRecord`]'s wire fields; `id` is assigned locally and excluded.
pub fn question_schema() -> Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING", "enum": ["multiple-choice", "qa"] },
            "level": { "type": "STRING", "enum": ["easy", "medium", "hard"] },
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "correct_answer": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "extension": { "type": "STRING" }
        },
        "required": [
            "type", "level", "question", "options",
            "correct_answer", "explanation", "extension"
        ]
    })
}

/// Instruction for generating one question under the session's filters,
/// steering the service away from every prompt already asked.
pub fn build_question_instruction(
    settings: &QuizSettings,
    history: &[String],
    locale: &str,
) -> String {
    let mut instruction = format!(
        "You are an Apache Flink interviewer. Generate exactly one interview \
         question as a JSON object with these fields:\n\
         - \"type\": \"multiple-choice\" or \"qa\"\n\
         - \"level\": \"easy\", \"medium\" or \"hard\"\n\
         - \"question\": the question body\n\
         - \"options\": for \"multiple-choice\", exactly 4 strings prefixed \
         \"A) \", \"B) \", \"C) \", \"D) \"; for \"qa\", an empty array\n\
         - \"correct_answer\": for \"multiple-choice\", the single letter of \
         the correct option (e.g. \"B\"); for \"qa\", a complete reference \
         answer\n\
         - \"explanation\": why the answer is correct\n\
         - \"extension\": a follow-up prompt for deeper study\n\
         Requested difficulty: {}. Requested type: {}. \
         All natural-language text must be written in {}.",
        settings.difficulty.request_value(),
        settings.kind.request_value(),
        locale,
    );

    if !history.is_empty() {
        instruction.push_str(
            "\nDo not repeat or closely paraphrase any of these already-asked questions:\n",
        );
        for prompt in history {
            instruction.push_str("- ");
            instruction.push_str(prompt);
            instruction.push('\n');
        }
    }

    instruction
}

/// Instruction for a free-text follow-up about the question on screen. The
/// original prompt, reference answer, and explanation travel along as
/// context; there is no conversation memory beyond them.
pub fn build_followup_instruction(
    question: &QuestionRecord,
    user_text: &str,
    locale: &str,
) -> String {
    format!(
        "You are an Apache Flink tutor. A learner is studying this interview \
         question:\n\
         Question: {}\n\
         Reference answer: {}\n\
         Explanation: {}\n\n\
         The learner asks: {}\n\n\
         Answer the learner's question concisely in {}. Reply with plain \
         text only.",
        question.prompt, question.correct_answer, question.explanation, user_text, locale,
    )
}
