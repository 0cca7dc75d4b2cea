use std::path::PathBuf;

use clap::Parser;
use flink_quiz::{Quiz, QuizError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON question bank to walk offline instead of generating questions
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Language for generated questions and follow-up answers
    #[arg(long, default_value = "Chinese")]
    locale: String,

    /// Gemini model used for generation
    #[arg(long, default_value = "gemini-2.5-flash")]
    model: String,
}

#[tokio::main]
async fn main() {
    // Optional .env for GEMINI_API_KEY.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let quiz = match args.questions {
        Some(path) => Quiz::from_json(path),
        None => std::env::var("GEMINI_API_KEY")
            .map(|key| Quiz::generated(key, args.model, args.locale))
            .map_err(|_| {
                QuizError::Config(
                    "GEMINI_API_KEY is not set (or pass --questions for the offline bank)"
                        .to_string(),
                )
            }),
    };

    let quiz = match quiz {
        Ok(quiz) => quiz,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = quiz.run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
