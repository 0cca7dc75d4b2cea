mod question;

pub use question::{Difficulty, QuestionKind, QuestionRecord, option_letter};
