use super::*;

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    /// Leaves the current question: logs its attempt, then moves on or
    /// completes the quiz when it was the last one.
    pub fn handle_next(&mut self) -> Result<Step> {
        self.handle_next_at(Utc::now())
    }

    pub fn handle_next_at(&mut self, now: DateTime<Utc>) -> Result<Step> {
        self.ensure_in_progress()?;
        self.record_attempt(now);

        let next = self.current_question + 1;
        if next < self.quiz.questions.len() {
            self.enter_question(next, now);
            return Ok(Step::Advanced(next));
        }

        let outcome = self.calculate_results_at(now)?;
        Ok(Step::Completed(Box::new(outcome)))
    }

    /// Steps back one question. Does nothing on the first question.
    pub fn handle_previous(&mut self) -> Result<usize> {
        self.ensure_in_progress()?;
        if self.current_question > 0 {
            self.enter_question(self.current_question - 1, Utc::now());
        }
        Ok(self.current_question)
    }

    /// Jumps straight to question `index` without logging an attempt
    pub fn go_to(&mut self, index: usize) -> Result<()> {
        self.ensure_in_progress()?;
        self.check_index(index)?;
        self.enter_question(index, Utc::now());
        Ok(())
    }

    fn enter_question(&mut self, index: usize, now: DateTime<Utc>) {
        self.current_question = index;
        self.question_started_at = now;
        self.save_cursor();
    }

    /// Logs the current question's attempt, only the first time it is left
    fn record_attempt(&mut self, now: DateTime<Utc>) {
        let index = self.current_question;
        if self.attempts.iter().any(|a| a.question_index == index) {
            debug!("attempt for question {} already recorded", index + 1);
            return;
        }

        let time_spent_secs = (now - self.question_started_at).num_seconds().max(0) as u64;
        let attempt = QuestionAttempt {
            question_index: index,
            time_spent_secs,
            is_correct: self.is_answer_correct(index),
        };
        debug!(
            "question {} answered in {}s (correct: {})",
            index + 1,
            time_spent_secs,
            attempt.is_correct
        );
        self.attempts.push(attempt);
        self.save_cursor();
    }
}
