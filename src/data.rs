// src/data.rs

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::model::Quiz;

/// Sample quiz bundled with the binary
pub fn sample_quiz() -> Result<Quiz> {
    load_quiz_str(include_str!("data/sample_quiz.yaml"))
}

pub fn load_quiz_file(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)?;
    let quiz = load_quiz_str(&content)?;
    debug!("loaded quiz {} from {}", quiz.id, path.display());
    Ok(quiz)
}

/// Parses a quiz from YAML and checks that it can be played
pub fn load_quiz_str(content: &str) -> Result<Quiz> {
    let quiz: Quiz = serde_yaml::from_str(content)?;
    validate_quiz(&quiz)?;
    Ok(quiz)
}

pub fn validate_quiz(quiz: &Quiz) -> Result<()> {
    if quiz.id.trim().is_empty() {
        return Err(Error::InvalidQuiz("quiz id is empty".into()));
    }
    if quiz.questions.is_empty() {
        return Err(Error::InvalidQuiz(format!("quiz {} has no questions", quiz.id)));
    }

    for (i, q) in quiz.questions.iter().enumerate() {
        let n = i + 1;
        if q.options.len() < 2 {
            return Err(Error::InvalidQuiz(format!(
                "question {n} needs at least two options"
            )));
        }
        if let Some(dup) = first_duplicate(&q.options) {
            return Err(Error::InvalidQuiz(format!(
                "question {n} lists option {dup:?} twice"
            )));
        }
        let correct = q.correct_answer.as_slice();
        if let Some(dup) = first_duplicate(correct) {
            return Err(Error::InvalidQuiz(format!(
                "question {n} lists correct answer {dup:?} twice"
            )));
        }
        if correct.is_empty() {
            return Err(Error::InvalidQuiz(format!("question {n} has no correct answer")));
        }
        if !q.is_multi_answer() && correct.len() != 1 {
            return Err(Error::InvalidQuiz(format!(
                "question {n} is single-answer but lists {} correct answers",
                correct.len()
            )));
        }
        if let Some(missing) = correct.iter().find(|c| !q.options.contains(c)) {
            return Err(Error::InvalidQuiz(format!(
                "question {n}: correct answer {missing:?} is not one of the options"
            )));
        }
    }
    Ok(())
}

fn first_duplicate(values: &[String]) -> Option<&String> {
    let mut seen = HashSet::new();
    values.iter().find(|v| !seen.insert(v.as_str()))
}
