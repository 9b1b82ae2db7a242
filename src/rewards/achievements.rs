//! Achievement catalogue and unlock conditions

use super::Achievement;
use super::local::PlayerProfile;
use crate::model::{Difficulty, QuizResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    FirstQuiz,
    TenQuizzes,
    FiftyQuizzes,
    PerfectScore,
    FivePerfect,
    SpeedRunner,
    HardModeHero,
    Streak3,
    Streak7,
    Streak30,
}

pub struct AchievementDef {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
}

pub static ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: AchievementId::FirstQuiz,
        title: "First Steps",
        description: "Complete your first quiz",
    },
    AchievementDef {
        id: AchievementId::TenQuizzes,
        title: "Regular",
        description: "Complete 10 quizzes",
    },
    AchievementDef {
        id: AchievementId::FiftyQuizzes,
        title: "Devotee",
        description: "Complete 50 quizzes",
    },
    AchievementDef {
        id: AchievementId::PerfectScore,
        title: "Flawless",
        description: "Answer every question of a quiz correctly",
    },
    AchievementDef {
        id: AchievementId::FivePerfect,
        title: "Perfectionist",
        description: "Get a perfect score 5 times",
    },
    AchievementDef {
        id: AchievementId::SpeedRunner,
        title: "Speed Runner",
        description: "Perfect score averaging 10 seconds or less per question",
    },
    AchievementDef {
        id: AchievementId::HardModeHero,
        title: "Hard Mode Hero",
        description: "Perfect score on a hard quiz",
    },
    AchievementDef {
        id: AchievementId::Streak3,
        title: "On a Roll",
        description: "Play 3 days in a row",
    },
    AchievementDef {
        id: AchievementId::Streak7,
        title: "Week Warrior",
        description: "Play 7 days in a row",
    },
    AchievementDef {
        id: AchievementId::Streak30,
        title: "Unstoppable",
        description: "Play 30 days in a row",
    },
];

const SPEED_RUN_SECS: f64 = 10.0;

impl AchievementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstQuiz => "first_quiz",
            Self::TenQuizzes => "ten_quizzes",
            Self::FiftyQuizzes => "fifty_quizzes",
            Self::PerfectScore => "perfect_score",
            Self::FivePerfect => "five_perfect",
            Self::SpeedRunner => "speed_runner",
            Self::HardModeHero => "hard_mode_hero",
            Self::Streak3 => "streak_3",
            Self::Streak7 => "streak_7",
            Self::Streak30 => "streak_30",
        }
    }

    /// Whether the profile (which already includes `result`) meets the condition
    fn is_met(&self, profile: &PlayerProfile, result: &QuizResult) -> bool {
        match self {
            Self::FirstQuiz => profile.quizzes_completed >= 1,
            Self::TenQuizzes => profile.quizzes_completed >= 10,
            Self::FiftyQuizzes => profile.quizzes_completed >= 50,
            Self::PerfectScore => profile.perfect_scores >= 1,
            Self::FivePerfect => profile.perfect_scores >= 5,
            Self::SpeedRunner => {
                result.is_perfect()
                    && result
                        .average_time_secs()
                        .is_some_and(|avg| avg <= SPEED_RUN_SECS)
            }
            Self::HardModeHero => result.is_perfect() && result.difficulty == Difficulty::Hard,
            Self::Streak3 => profile.streak.current >= 3,
            Self::Streak7 => profile.streak.current >= 7,
            Self::Streak30 => profile.streak.current >= 30,
        }
    }
}

impl AchievementDef {
    pub fn to_achievement(&self) -> Achievement {
        Achievement {
            id: self.id.as_str().to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Unlocks every achievement whose condition now holds and returns the new ones
pub fn unlock_new(profile: &mut PlayerProfile, result: &QuizResult) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    for def in ACHIEVEMENTS {
        if profile.achievements.contains(def.id.as_str()) {
            continue;
        }
        if def.id.is_met(profile, result) {
            profile.achievements.insert(def.id.as_str().to_string());
            unlocked.push(def.to_achievement());
        }
    }
    unlocked
}
