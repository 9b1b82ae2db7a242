use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Factor applied to the base XP of a completed quiz
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Expected answer: a single option or a set of options
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl CorrectAnswer {
    pub fn as_slice(&self) -> &[String] {
        match self {
            CorrectAnswer::Single(s) => std::slice::from_ref(s),
            CorrectAnswer::Multiple(v) => v,
        }
    }
}

/// What the user picked for one question
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Answer::Single(s) => std::slice::from_ref(s),
            Answer::Multiple(v) => v,
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        self.as_slice().iter().any(|a| a == option)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    #[serde(default)]
    pub id: Option<String>,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: CorrectAnswer,
    #[serde(default)]
    pub multiple_answers: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn is_multi_answer(&self) -> bool {
        self.multiple_answers || matches!(self.correct_answer, CorrectAnswer::Multiple(_))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

/// Timing and correctness of one answered question. Never mutated once recorded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionAttempt {
    pub question_index: usize,
    pub time_spent_secs: u64,
    pub is_correct: bool,
}

/// Final record of a completed session, as sent to the results service
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuizResult {
    pub completion_id: Uuid,
    pub quiz_id: String,
    pub quiz_title: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub score: usize,
    pub total_questions: usize,
    pub percentage: f64,
    pub xp_earned: u32,
    pub total_time_secs: u64,
    pub attempts: Vec<QuestionAttempt>,
    pub answers: Vec<Option<Answer>>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn is_perfect(&self) -> bool {
        self.total_questions > 0 && self.score == self.total_questions
    }

    /// Average seconds spent per recorded attempt
    pub fn average_time_secs(&self) -> Option<f64> {
        if self.attempts.is_empty() {
            return None;
        }
        Some(self.total_time_secs as f64 / self.attempts.len() as f64)
    }
}

/// XP for a finished quiz: `round((100 + (score/total) * 50) * multiplier)`
pub fn experience_for(score: usize, total: usize, difficulty: Difficulty) -> u32 {
    let ratio = if total == 0 {
        0.0
    } else {
        score as f64 / total as f64
    };
    ((100.0 + ratio * 50.0) * difficulty.multiplier()).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_follows_formula() {
        assert_eq!(experience_for(0, 4, Difficulty::Easy), 100);
        assert_eq!(experience_for(4, 4, Difficulty::Easy), 150);
        assert_eq!(experience_for(2, 4, Difficulty::Medium), 188); // 125 * 1.5 = 187.5
        assert_eq!(experience_for(3, 3, Difficulty::Hard), 300);
        assert_eq!(experience_for(0, 0, Difficulty::Medium), 150);
    }

    #[test]
    fn correct_answer_accepts_string_or_list() {
        let single: CorrectAnswer = serde_yaml::from_str("Paris").unwrap();
        assert_eq!(single, CorrectAnswer::Single("Paris".into()));

        let multi: CorrectAnswer = serde_yaml::from_str("[a, b]").unwrap();
        assert_eq!(multi.as_slice(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn list_answer_makes_question_multi() {
        let q = Question {
            id: None,
            prompt: "pick".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: CorrectAnswer::Multiple(vec!["a".into()]),
            multiple_answers: false,
            image: None,
            explanation: None,
        };
        assert!(q.is_multi_answer());
    }
}
