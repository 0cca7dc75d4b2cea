//! Loading the static question bank from a JSON file.

use std::fs;
use std::io;
use std::path::Path;

use crate::models::QuestionRecord;

/// Error loading or validating a question bank.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(serde_json::Error),
    Empty,
    /// A multiple-choice record whose correct letter does not match exactly
    /// one option.
    Invalid { id: u64 },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "could not read file: {}", e),
            LoadError::Parse(e) => write!(f, "could not parse questions: {}", e),
            LoadError::Empty => write!(f, "question bank is empty"),
            LoadError::Invalid { id } => {
                write!(f, "question {} has no uniquely matching correct option", id)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<QuestionRecord>, LoadError> {
    let content = fs::read_to_string(path)?;
    parse_questions(&content)
}

fn parse_questions(content: &str) -> Result<Vec<QuestionRecord>, LoadError> {
    let questions: Vec<QuestionRecord> =
        serde_json::from_str(content).map_err(LoadError::Parse)?;
    if questions.is_empty() {
        return Err(LoadError::Empty);
    }
    for question in &questions {
        if !question.has_unique_correct_option() {
            return Err(LoadError::Invalid { id: question.id });
        }
    }
    Ok(questions)
}
