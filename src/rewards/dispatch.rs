use log::{debug, warn};

use super::{Achievement, Badge, ExperienceUpdate, GamificationService, QuestProgress, StreakUpdate};
use crate::error::Result;
use crate::model::QuizResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardStep {
    SaveResult,
    Experience,
    Streak,
    Achievements,
    Badges,
    Quests,
}

impl RewardStep {
    pub fn as_str(self) -> &'static str {
        match self {
            RewardStep::SaveResult => "save result",
            RewardStep::Experience => "experience",
            RewardStep::Streak => "streak",
            RewardStep::Achievements => "achievements",
            RewardStep::Badges => "badges",
            RewardStep::Quests => "quest progress",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RewardFailure {
    pub step: RewardStep,
    pub message: String,
}

/// Whatever the reward cascade managed to collect
#[derive(Debug, Clone, Default)]
pub struct RewardSummary {
    pub result_saved: bool,
    pub experience: Option<ExperienceUpdate>,
    pub streak: Option<StreakUpdate>,
    pub achievements: Vec<Achievement>,
    pub badges: Vec<Badge>,
    pub quests: Vec<QuestProgress>,
    pub failures: Vec<RewardFailure>,
}

impl RewardSummary {
    pub fn leveled_up(&self) -> bool {
        self.experience.as_ref().is_some_and(|e| e.leveled_up())
    }

    pub fn completed_quests(&self) -> impl Iterator<Item = &QuestProgress> {
        self.quests.iter().filter(|q| q.newly_completed)
    }

    /// Confetti: perfect score, level up, or anything newly unlocked
    pub fn should_celebrate(&self, result: &QuizResult) -> bool {
        result.is_perfect()
            || self.leveled_up()
            || !self.achievements.is_empty()
            || !self.badges.is_empty()
            || self.completed_quests().next().is_some()
    }

    /// Records a step's outcome, keeping the value on success
    fn take<T>(&mut self, step: RewardStep, outcome: Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("reward step '{}' failed: {err}", step.as_str());
                self.failures.push(RewardFailure {
                    step,
                    message: err.to_string(),
                });
                None
            }
        }
    }
}

/// Runs the reward cascade for a finished quiz.
///
/// Every step is attempted once, in order, and a failing step never
/// prevents the following ones.
pub fn dispatch_rewards<G>(service: &G, result: &QuizResult) -> RewardSummary
where
    G: GamificationService + ?Sized,
{
    let mut summary = RewardSummary::default();

    let saved = service.save_result(result);
    summary.result_saved = summary.take(RewardStep::SaveResult, saved).is_some();

    let Some(user_id) = result.user_id.as_deref() else {
        debug!("anonymous result for {}, skipping gamification", result.quiz_id);
        return summary;
    };

    let reason = format!("completed quiz {}", result.quiz_id);
    let experience = service.add_experience(user_id, result.xp_earned, &reason);
    summary.experience = summary.take(RewardStep::Experience, experience);

    let streak = service.update_streak(user_id);
    summary.streak = summary.take(RewardStep::Streak, streak);

    let achievements = service.check_achievements(user_id, result);
    summary.achievements = summary
        .take(RewardStep::Achievements, achievements)
        .unwrap_or_default();

    let badges = service.check_badges(user_id, result);
    summary.badges = summary.take(RewardStep::Badges, badges).unwrap_or_default();

    let quests = service.update_quest_progress(user_id, result);
    summary.quests = summary.take(RewardStep::Quests, quests).unwrap_or_default();

    summary
}
