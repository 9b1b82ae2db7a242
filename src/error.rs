use std::path::PathBuf;

/// Error type shared by the whole crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Invalid quiz: {0}")]
    InvalidQuiz(String),

    #[error("Question {index} does not exist (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("The quiz session is already completed")]
    AlreadyCompleted,

    #[error("Failed to read config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Question {index} has no option {option:?}")]
    UnknownOption { index: usize, option: String },
}

pub type Result<T> = std::result::Result<T, Error>;
