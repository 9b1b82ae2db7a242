//! In-process gamification engine.
//!
//! Keeps one [`PlayerProfile`] per user plus the stored quiz results,
//! optionally persisted as a JSON file after every change.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::levels::PlayerStats;
use super::quests::QuestProgressManager;
use super::streaks::{self, StreakInfo};
use super::{
    Achievement, Badge, ExperienceUpdate, GamificationService, QuestProgress, StreakUpdate,
    achievements, badges,
};
use crate::error::Result;
use crate::model::QuizResult;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PlayerProfile {
    pub total_xp: u32,
    #[serde(default)]
    pub streak: StreakInfo,
    pub quizzes_completed: u32,
    pub perfect_scores: u32,
    #[serde(default)]
    pub category_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub completion_ids: BTreeSet<Uuid>,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    #[serde(default)]
    pub badges: BTreeSet<String>,
    #[serde(default)]
    pub completed_quests: BTreeSet<String>,
}

impl PlayerProfile {
    /// Counts a result towards the profile statistics, once per completion id.
    /// Returns false if it was already counted.
    pub fn record_result(&mut self, result: &QuizResult) -> bool {
        if !self.completion_ids.insert(result.completion_id) {
            return false;
        }
        self.quizzes_completed += 1;
        if result.is_perfect() {
            self.perfect_scores += 1;
        }
        if let Some(category) = &result.category {
            *self.category_counts.entry(category.clone()).or_insert(0) += 1;
        }
        true
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats::new(self.total_xp)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct ProfileStore {
    #[serde(default)]
    users: BTreeMap<String, PlayerProfile>,
    #[serde(default)]
    results: Vec<QuizResult>,
}

pub struct LocalGamification {
    store: Mutex<ProfileStore>,
    path: Option<PathBuf>,
    quests: QuestProgressManager,
    today: fn() -> NaiveDate,
}

impl Default for LocalGamification {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalGamification {
    /// Engine that lives only in memory
    pub fn new() -> Self {
        Self {
            store: Mutex::new(ProfileStore::default()),
            path: None,
            quests: QuestProgressManager::default(),
            today: streaks::today,
        }
    }

    /// Engine backed by a JSON file, loaded now if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            ProfileStore::default()
        };
        info!("gamification profiles at {}", path.display());

        Ok(Self {
            store: Mutex::new(store),
            path: Some(path),
            ..Self::new()
        })
    }

    pub fn with_quests(mut self, quests: QuestProgressManager) -> Self {
        self.quests = quests;
        self
    }

    /// Overrides the calendar used for streaks
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn profile(&self, user_id: &str) -> Option<PlayerProfile> {
        self.lock().users.get(user_id).cloned()
    }

    pub fn stored_results(&self) -> usize {
        self.lock().results.len()
    }

    fn lock(&self) -> MutexGuard<'_, ProfileStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` on a copy of the user's profile. The copy replaces the
    /// stored profile only once it has been persisted.
    fn with_profile<T>(&self, user_id: &str, f: impl FnOnce(&mut PlayerProfile) -> T) -> Result<T> {
        let mut store = self.lock();
        let mut updated = store.clone();
        let value = f(updated.users.entry(user_id.to_string()).or_default());
        self.persist(&updated)?;
        *store = updated;
        Ok(value)
    }

    fn persist(&self, store: &ProfileStore) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(store)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }
}

impl GamificationService for LocalGamification {
    fn save_result(&self, result: &QuizResult) -> Result<()> {
        let mut store = self.lock();
        if store
            .results
            .iter()
            .any(|r| r.completion_id == result.completion_id)
        {
            debug!("result {} already stored", result.completion_id);
            return Ok(());
        }
        let mut updated = store.clone();
        updated.results.push(result.clone());
        if let Some(user_id) = &result.user_id {
            updated
                .users
                .entry(user_id.clone())
                .or_default()
                .record_result(result);
        }
        self.persist(&updated)?;
        *store = updated;
        Ok(())
    }

    fn add_experience(
        &self,
        user_id: &str,
        amount: u32,
        reason: &str,
    ) -> Result<ExperienceUpdate> {
        self.with_profile(user_id, |profile| {
            let previous = profile.stats();
            profile.total_xp = profile.total_xp.saturating_add(amount);
            let stats = profile.stats();
            debug!("{user_id} +{amount} XP ({reason}), total {}", stats.total_xp);
            if stats.level > previous.level {
                info!("{user_id} reached level {} ({})", stats.level, stats.title);
            }
            ExperienceUpdate {
                gained: amount,
                total_xp: stats.total_xp,
                previous_level: previous.level,
                level: stats.level,
                title: stats.title,
                next_level_xp: stats.next_level_xp,
            }
        })
    }

    fn update_streak(&self, user_id: &str) -> Result<StreakUpdate> {
        let today = (self.today)();
        self.with_profile(user_id, |profile| {
            let extended = profile.streak.record_activity(today);
            StreakUpdate {
                current: profile.streak.current,
                best: profile.streak.best,
                extended,
            }
        })
    }

    fn check_achievements(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Achievement>> {
        self.with_profile(user_id, |profile| {
            profile.record_result(result);
            achievements::unlock_new(profile, result)
        })
    }

    fn check_badges(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Badge>> {
        self.with_profile(user_id, |profile| {
            profile.record_result(result);
            badges::award_new(profile)
        })
    }

    fn update_quest_progress(
        &self,
        user_id: &str,
        result: &QuizResult,
    ) -> Result<Vec<QuestProgress>> {
        self.with_profile(user_id, |profile| {
            profile.record_result(result);
            self.quests.update(profile)
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionAttempt, experience_for};
    use chrono::Utc;

    /// Result of a quiz where the first `score` of `total` questions were right
    pub(crate) fn result_with(
        score: usize,
        total: usize,
        difficulty: Difficulty,
        total_time_secs: u64,
    ) -> QuizResult {
        let per_question = total_time_secs / total.max(1) as u64;
        QuizResult {
            completion_id: Uuid::new_v4(),
            quiz_id: "quiz".into(),
            quiz_title: "Quiz".into(),
            user_id: Some("ada".into()),
            category: Some("programming".into()),
            difficulty,
            score,
            total_questions: total,
            percentage: score as f64 * 100.0 / total.max(1) as f64,
            xp_earned: experience_for(score, total, difficulty),
            total_time_secs,
            attempts: (0..total)
                .map(|i| QuestionAttempt {
                    question_index: i,
                    time_spent_secs: per_question,
                    is_correct: i < score,
                })
                .collect(),
            answers: vec![None; total],
            completed_at: Utc::now(),
        }
    }

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    #[test]
    fn save_result_is_idempotent_per_completion() {
        let engine = LocalGamification::new();
        let result = result_with(2, 4, Difficulty::Easy, 40);

        engine.save_result(&result).unwrap();
        engine.save_result(&result).unwrap();

        assert_eq!(engine.stored_results(), 1);
        assert_eq!(engine.profile("ada").unwrap().quizzes_completed, 1);
    }

    #[test]
    fn checks_count_the_result_even_without_save() {
        let engine = LocalGamification::new();
        let result = result_with(4, 4, Difficulty::Medium, 200);

        let unlocked = engine.check_achievements("ada", &result).unwrap();
        assert!(unlocked.iter().any(|a| a.id == "first_quiz"));

        engine.save_result(&result).unwrap();
        let profile = engine.profile("ada").unwrap();
        assert_eq!(profile.quizzes_completed, 1);
        assert_eq!(profile.perfect_scores, 1);
    }

    #[test]
    fn experience_reports_level_up() {
        let engine = LocalGamification::new();
        let first = engine.add_experience("ada", 100, "quiz").unwrap();
        assert!(!first.leveled_up());
        let second = engine.add_experience("ada", 100, "quiz").unwrap();
        assert!(second.leveled_up());
        assert_eq!(second.total_xp, 200);
        assert_eq!(second.level, 2);
    }

    #[test]
    fn streak_counts_once_per_day() {
        let engine = LocalGamification::new().with_clock(fixed_day);
        assert!(engine.update_streak("ada").unwrap().extended);
        let again = engine.update_streak("ada").unwrap();
        assert!(!again.extended);
        assert_eq!(again.current, 1);
    }

    #[test]
    fn failed_write_leaves_profile_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let engine = LocalGamification::open(&path).unwrap();
        engine.add_experience("ada", 100, "quiz").unwrap();

        // A directory in place of the file makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = result_with(1, 1, Difficulty::Easy, 5);
        assert!(engine.add_experience("ada", 100, "quiz").is_err());
        assert!(engine.check_achievements("ada", &result).is_err());
        assert!(engine.save_result(&result).is_err());

        let profile = engine.profile("ada").unwrap();
        assert_eq!(profile.total_xp, 100);
        assert_eq!(profile.quizzes_completed, 0);
        assert_eq!(engine.stored_results(), 0);

        // Once writable again a retry counts exactly once
        std::fs::remove_dir(&path).unwrap();
        engine.save_result(&result).unwrap();
        engine.check_achievements("ada", &result).unwrap();
        assert_eq!(engine.profile("ada").unwrap().quizzes_completed, 1);
    }

    #[test]
    fn profiles_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        {
            let engine = LocalGamification::open(&path).unwrap();
            engine.add_experience("ada", 450, "quiz").unwrap();
            engine
                .update_quest_progress("ada", &result_with(1, 1, Difficulty::Easy, 5))
                .unwrap();
        }

        let engine = LocalGamification::open(&path).unwrap();
        let profile = engine.profile("ada").unwrap();
        assert_eq!(profile.total_xp, 450);
        assert!(profile.completed_quests.contains("first-steps"));
    }
}
