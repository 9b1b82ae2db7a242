use super::*;

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    /// Starts the quiz over and forgets everything stored for it
    pub fn reset(&mut self) -> Result<()> {
        self.current_question = 0;
        self.selected_answers = vec![None; self.quiz.questions.len()];
        self.attempts.clear();
        self.result = None;
        self.question_started_at = Utc::now();

        self.storage.clear_quiz(&self.quiz.id)?;
        info!("quiz {} reset", self.quiz.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::session::tests::session;
    use crate::storage::{SessionStorage, StorageSlot};

    #[test]
    fn reset_clears_state_and_all_storage_keys() {
        let mut s = session();
        s.handle_answer(0, "Paris").unwrap();
        s.handle_next().unwrap();
        s.calculate_results().unwrap();
        for slot in StorageSlot::ALL {
            assert!(s.storage().contains(&slot.key("geo")), "{slot:?} not stored");
        }

        s.reset().unwrap();

        for slot in StorageSlot::ALL {
            assert_eq!(s.storage().get(&slot.key("geo")).unwrap(), None);
        }
        assert!(s.storage().is_empty());
        assert_eq!(s.current_question(), 0);
        assert!(s.attempts().is_empty());
        assert!(s.selected_answers().iter().all(Option::is_none));
        assert!(!s.is_completed());
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn reset_allows_playing_again() {
        let mut s = session();
        s.calculate_results().unwrap();
        s.reset().unwrap();
        s.handle_answer(0, "Paris").unwrap();
        assert_eq!(s.score(), 1);
    }
}
