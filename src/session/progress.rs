use super::*;
use serde::de::DeserializeOwned;

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    pub(crate) fn save_cursor(&mut self) {
        let cursor = SessionCursor {
            current_question: self.current_question,
            attempts: self.attempts.clone(),
        };
        self.store(StorageSlot::Current, &cursor);
    }

    /// Loads a saved session for this quiz. Returns false (and leaves the
    /// session fresh) when nothing usable is stored.
    pub(crate) fn restore_progress(&mut self) -> bool {
        let len = self.quiz.questions.len();

        let cursor: Option<SessionCursor> = self.load(StorageSlot::Current);
        let answers: Option<Vec<Option<Answer>>> = self.load(StorageSlot::Answers);
        let result: Option<QuizResult> = self.load(StorageSlot::Results);

        if cursor.is_none() && answers.is_none() && result.is_none() {
            return false;
        }

        if let Some(answers) = &answers {
            if answers.len() != len {
                warn!(
                    "stored answers for quiz {} do not match its {} questions, starting over",
                    self.quiz.id, len
                );
                return false;
            }
        }
        if let Some(cursor) = &cursor {
            let bad_attempt = cursor.attempts.iter().any(|a| a.question_index >= len);
            if cursor.current_question >= len || bad_attempt {
                warn!("stored position for quiz {} is out of range, starting over", self.quiz.id);
                return false;
            }
        }

        if let Some(cursor) = cursor {
            self.current_question = cursor.current_question;
            self.attempts = cursor.attempts;
        }
        if let Some(answers) = answers {
            self.selected_answers = answers;
        }
        self.result = result.filter(|r| r.quiz_id == self.quiz.id);
        true
    }

    fn load<T: DeserializeOwned>(&self, slot: StorageSlot) -> Option<T> {
        let key = slot.key(&self.quiz.id);
        match self.storage.get(&key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("ignoring unreadable {key}: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("could not read {key}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::local::LocalGamification;
    use crate::session::tests::test_quiz;
    use crate::storage::{FileStorage, MemoryStorage};

    #[test]
    fn session_resumes_from_storage() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::new(dir.path()).unwrap();
            let mut s = QuizSession::new(test_quiz(), storage, LocalGamification::new());
            s.handle_answer(0, "Paris").unwrap();
            s.handle_next().unwrap();
            s.handle_answer(1, "Peru").unwrap();
        }

        let storage = FileStorage::new(dir.path()).unwrap();
        let s = QuizSession::new(test_quiz(), storage, LocalGamification::new());
        assert_eq!(s.current_question(), 1);
        assert_eq!(s.attempts().len(), 1);
        assert_eq!(s.selected_answers()[0], Some(Answer::Single("Paris".into())));
        assert_eq!(
            s.selected_answers()[1],
            Some(Answer::Multiple(vec!["Peru".into()]))
        );
        assert!(!s.is_completed());
    }

    #[test]
    fn completed_session_resumes_completed() {
        let mut storage = MemoryStorage::new();
        {
            let mut s = QuizSession::new(test_quiz(), storage.clone(), LocalGamification::new());
            s.handle_answer(0, "Paris").unwrap();
            s.calculate_results().unwrap();
            storage = s.storage().clone();
        }
        let s = QuizSession::new(test_quiz(), storage, LocalGamification::new());
        assert!(s.is_completed());
        assert_eq!(s.result().map(|r| r.score), Some(1));
    }

    #[test]
    fn mismatched_storage_is_ignored() {
        let mut storage = MemoryStorage::new();
        storage
            .set(&StorageSlot::Answers.key("geo"), r#"["Paris"]"#)
            .unwrap();
        storage
            .set(
                &StorageSlot::Current.key("geo"),
                r#"{"current_question":1,"attempts":[]}"#,
            )
            .unwrap();

        let s = QuizSession::new(test_quiz(), storage, LocalGamification::new());
        assert_eq!(s.current_question(), 0);
        assert!(s.selected_answers().iter().all(Option::is_none));
    }

    #[test]
    fn corrupt_values_are_ignored() {
        let mut storage = MemoryStorage::new();
        storage
            .set(&StorageSlot::Current.key("geo"), "{not json")
            .unwrap();
        let s = QuizSession::new(test_quiz(), storage, LocalGamification::new());
        assert_eq!(s.current_question(), 0);
    }
}
