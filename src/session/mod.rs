//! Quiz session controller.
//!
//! Owns the question cursor, the answers given so far and the attempt log,
//! mirrors them to a [`SessionStorage`] and hands finished results to a
//! [`GamificationService`].

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Answer, QuestionAttempt, Quiz, QuizResult};
use crate::rewards::GamificationService;
use crate::storage::{SessionStorage, StorageSlot};

// Submodules
pub mod actions;
pub mod completion;
pub mod navigation;
pub mod progress;
pub mod queries;
pub mod resets;

pub use completion::QuizOutcome;

/// What `handle_next` did
#[derive(Debug)]
pub enum Step {
    Advanced(usize),
    Completed(Box<QuizOutcome>),
}

/// Cursor and attempt log, stored under the `current` slot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionCursor {
    pub current_question: usize,
    #[serde(default)]
    pub attempts: Vec<QuestionAttempt>,
}

pub struct QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    quiz: Quiz,
    user_id: Option<String>,
    current_question: usize,
    selected_answers: Vec<Option<Answer>>,
    attempts: Vec<QuestionAttempt>,
    question_started_at: DateTime<Utc>,
    result: Option<QuizResult>,
    storage: S,
    rewards: G,
}

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    /// Starts a session, resuming whatever `storage` holds for this quiz
    pub fn new(quiz: Quiz, storage: S, rewards: G) -> Self {
        let question_count = quiz.questions.len();
        let mut session = Self {
            quiz,
            user_id: None,
            current_question: 0,
            selected_answers: vec![None; question_count],
            attempts: Vec::new(),
            question_started_at: Utc::now(),
            result: None,
            storage,
            rewards,
        };

        if session.restore_progress() {
            info!(
                "resumed quiz {} at question {}",
                session.quiz.id,
                session.current_question + 1
            );
        } else {
            debug!("new session for quiz {}", session.quiz.id);
        }
        session
    }

    /// Player whose rewards are dispatched on completion
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn selected_answers(&self) -> &[Option<Answer>] {
        &self.selected_answers
    }

    pub fn attempts(&self) -> &[QuestionAttempt] {
        &self.attempts
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn rewards(&self) -> &G {
        &self.rewards
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.is_completed() {
            return Err(Error::AlreadyCompleted);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.quiz.questions.len();
        if index >= len {
            return Err(Error::QuestionOutOfRange { index, len });
        }
        Ok(())
    }

    /// Best-effort write of one storage slot
    fn store<T: Serialize>(&mut self, slot: StorageSlot, value: &T) {
        let key = slot.key(&self.quiz.id);
        let outcome = serde_json::to_string(value)
            .map_err(Error::from)
            .and_then(|json| self.storage.set(&key, &json));
        if let Err(err) = outcome {
            warn!("could not store {key}: {err}");
        }
    }
}
