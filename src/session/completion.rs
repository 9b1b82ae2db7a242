use super::*;
use crate::model::experience_for;
use crate::rewards::{RewardSummary, dispatch_rewards};
use uuid::Uuid;

/// A finished session: the stored result and the rewards it earned
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub result: QuizResult,
    pub rewards: RewardSummary,
    pub celebrate: bool,
}

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    /// Scores the session, marks it completed and runs the reward cascade
    pub fn calculate_results(&mut self) -> Result<QuizOutcome> {
        self.calculate_results_at(Utc::now())
    }

    pub(crate) fn calculate_results_at(&mut self, now: DateTime<Utc>) -> Result<QuizOutcome> {
        self.ensure_in_progress()?;

        let result = self.build_result(now);
        info!(
            "quiz {} finished: {}/{} ({:.0}%), {} XP",
            result.quiz_id, result.score, result.total_questions, result.percentage, result.xp_earned
        );

        self.result = Some(result.clone());
        self.store(StorageSlot::Results, &result);
        self.store(StorageSlot::Score, &result.score);

        let rewards = dispatch_rewards(&self.rewards, &result);
        if !rewards.failures.is_empty() {
            warn!(
                "{} of the reward steps failed for quiz {}",
                rewards.failures.len(),
                result.quiz_id
            );
        }
        let celebrate = rewards.should_celebrate(&result);

        Ok(QuizOutcome {
            result,
            rewards,
            celebrate,
        })
    }

    fn build_result(&self, now: DateTime<Utc>) -> QuizResult {
        let total = self.quiz.questions.len();
        let score = self.score();
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 * 100.0 / total as f64
        };

        QuizResult {
            completion_id: Uuid::new_v4(),
            quiz_id: self.quiz.id.clone(),
            quiz_title: self.quiz.title.clone(),
            user_id: self.user_id.clone(),
            category: self.quiz.category.clone(),
            difficulty: self.quiz.difficulty,
            score,
            total_questions: total,
            percentage,
            xp_earned: experience_for(score, total, self.quiz.difficulty),
            total_time_secs: self.attempts.iter().map(|a| a.time_spent_secs).sum(),
            attempts: self.attempts.clone(),
            answers: self.selected_answers.clone(),
            completed_at: now,
        }
    }
}
