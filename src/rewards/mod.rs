//! Rewards layer: results persistence, XP, levels, streaks, achievements,
//! badges and quest progression.
//!
//! [`GamificationService`] is the seam between a quiz session and whoever
//! keeps score. [`http::HttpGamification`] talks to remote services,
//! [`local::LocalGamification`] keeps everything in-process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::QuizResult;

pub mod achievements;
pub mod badges;
mod dispatch;
pub mod http;
pub mod levels;
pub mod local;
pub mod quests;
pub mod streaks;

pub use dispatch::{RewardFailure, RewardStep, RewardSummary, dispatch_rewards};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExperienceUpdate {
    pub gained: u32,
    pub total_xp: u32,
    pub previous_level: u32,
    pub level: u32,
    pub title: String,
    #[serde(default)]
    pub next_level_xp: Option<u32>,
}

impl ExperienceUpdate {
    pub fn leveled_up(&self) -> bool {
        self.level > self.previous_level
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current: u32,
    pub best: u32,
    /// True when this activity grew the streak
    pub extended: bool,
}

/// An achievement unlocked by a quiz result
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestProgress {
    pub quest_id: String,
    pub title: String,
    pub progress: u32,
    pub target: u32,
    pub completed: bool,
    /// Completed by the result that produced this report
    #[serde(default)]
    pub newly_completed: bool,
}

pub trait GamificationService {
    fn save_result(&self, result: &QuizResult) -> Result<()>;

    fn add_experience(&self, user_id: &str, amount: u32, reason: &str)
    -> Result<ExperienceUpdate>;

    fn update_streak(&self, user_id: &str) -> Result<StreakUpdate>;

    fn check_achievements(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Achievement>>;

    fn check_badges(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Badge>>;

    fn update_quest_progress(
        &self,
        user_id: &str,
        result: &QuizResult,
    ) -> Result<Vec<QuestProgress>>;
}

macro_rules! forward_gamification {
    ($($ty:ty),*) => {$(
        impl<T: GamificationService + ?Sized> GamificationService for $ty {
            fn save_result(&self, result: &QuizResult) -> Result<()> {
                (**self).save_result(result)
            }

            fn add_experience(
                &self,
                user_id: &str,
                amount: u32,
                reason: &str,
            ) -> Result<ExperienceUpdate> {
                (**self).add_experience(user_id, amount, reason)
            }

            fn update_streak(&self, user_id: &str) -> Result<StreakUpdate> {
                (**self).update_streak(user_id)
            }

            fn check_achievements(
                &self,
                user_id: &str,
                result: &QuizResult,
            ) -> Result<Vec<Achievement>> {
                (**self).check_achievements(user_id, result)
            }

            fn check_badges(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Badge>> {
                (**self).check_badges(user_id, result)
            }

            fn update_quest_progress(
                &self,
                user_id: &str,
                result: &QuizResult,
            ) -> Result<Vec<QuestProgress>> {
                (**self).update_quest_progress(user_id, result)
            }
        }
    )*};
}

forward_gamification!(&T, Box<T>, Arc<T>);
