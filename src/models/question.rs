//! Question records shared by the static bank and the AI generator.
//!
//! The serde field names match the original JSON dataset (`type`, `level`,
//! `question`, ...), so bank files and generated payloads parse with the
//! same struct.

use serde::{Deserialize, Serialize};

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Four letter-prefixed options, one correct letter.
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    /// Free-form question with a reference answer; never auto-scored.
    #[serde(rename = "qa")]
    OpenEnded,
}

impl QuestionKind {
    /// Wire value used in prompts and JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple-choice",
            QuestionKind::OpenEnded => "qa",
        }
    }

    /// Label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "选择题",
            QuestionKind::OpenEnded => "问答题",
        }
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

/// A single quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Unique per record. Author-assigned in bank files, timestamp-derived
    /// for generated questions (the generated payload carries no id).
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "level")]
    pub difficulty: Difficulty,
    #[serde(rename = "question")]
    pub prompt: String,
    /// Exactly 4 entries ("A) ..." through "D) ...") for multiple choice,
    /// empty for open-ended.
    #[serde(default)]
    pub options: Vec<String>,
    /// Single letter for multiple choice, full reference answer for
    /// open-ended.
    pub correct_answer: String,
    pub explanation: String,
    pub extension: String,
}

impl QuestionRecord {
    /// Whether the given option text is the correct one, by comparing its
    /// letter prefix to `correct_answer` (case-sensitive).
    pub fn is_correct_option(&self, option: &str) -> bool {
        option_letter(option) == Some(self.correct_answer.as_str())
    }

    /// For multiple choice, `correct_answer` must match the letter prefix of
    /// exactly one option. Always true for open-ended.
    pub fn has_unique_correct_option(&self) -> bool {
        if self.kind != QuestionKind::MultipleChoice {
            return true;
        }
        self.options
            .iter()
            .filter(|o| self.is_correct_option(o))
            .count()
            == 1
    }
}

/// Extract the letter tag of an option ("A) Flink is ..." -> "A").
pub fn option_letter(option: &str) -> Option<&str> {
    let letter = option.split(')').next()?.trim();
    if letter.is_empty() { None } else { Some(letter) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mc() -> QuestionRecord {
        QuestionRecord {
            id: 1,
            kind: QuestionKind::MultipleChoice,
            difficulty: Difficulty::Easy,
            prompt: "Apache Flink 的主要功能是什么？".to_string(),
            options: vec![
                "A) 分布式文件系统。".to_string(),
                "B) 批处理引擎。".to_string(),
                "C) 有状态流处理框架。".to_string(),
                "D) SQL-on-Hadoop 工具。".to_string(),
            ],
            correct_answer: "C".to_string(),
            explanation: "Flink 是流优先的处理引擎。".to_string(),
            extension: "批处理如何作为流处理的特例？".to_string(),
        }
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter("A) first"), Some("A"));
        assert_eq!(option_letter("D) fourth) with paren"), Some("D"));
        assert_eq!(option_letter(") empty"), None);
    }

    #[test]
    fn test_correct_option_matching() {
        let q = sample_mc();
        assert!(q.is_correct_option("C) 有状态流处理框架。"));
        assert!(!q.is_correct_option("B) 批处理引擎。"));
        // Comparison is case-sensitive.
        assert!(!q.is_correct_option("c) lowercase"));
    }

    #[test]
    fn test_unique_correct_option_invariant() {
        let mut q = sample_mc();
        assert!(q.has_unique_correct_option());

        q.correct_answer = "E".to_string();
        assert!(!q.has_unique_correct_option());

        q.correct_answer = "A".to_string();
        q.options[1] = "A) duplicate letter".to_string();
        assert!(!q.has_unique_correct_option());
    }

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "id": 2,
            "type": "multiple-choice",
            "level": "medium",
            "question": "哪两种时间语义是基础？",
            "options": ["A) a", "B) b", "C) c", "D) d"],
            "correct_answer": "C",
            "explanation": "事件时间与处理时间。",
            "extension": "摄入时间的用例是什么？"
        }"#;
        let q: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.options.len(), 4);
    }

    #[test]
    fn test_deserialize_open_ended_defaults() {
        // Generated payloads carry no id; open-ended may omit options.
        let json = r#"{
            "type": "qa",
            "level": "easy",
            "question": "JobManager 的角色是什么？",
            "correct_answer": "负责协调作业执行。",
            "explanation": "它调度任务并协调检查点。",
            "extension": "高可用模式下有何不同？"
        }"#;
        let q: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, 0);
        assert_eq!(q.kind, QuestionKind::OpenEnded);
        assert!(q.options.is_empty());
        assert!(q.has_unique_correct_option());
    }
}
