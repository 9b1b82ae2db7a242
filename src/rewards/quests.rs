//! Campaign of quests layered on top of quiz completions.
//!
//! Quests are played in campaign order: only the first unfinished quest
//! is active, finishing it unlocks the next one.

use log::info;

use super::QuestProgress;
use super::local::PlayerProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    CompleteQuizzes(u32),
    PerfectScores(u32),
    EarnXp(u32),
    CompleteCategory { category: String, count: u32 },
}

impl Objective {
    pub fn target(&self) -> u32 {
        match self {
            Objective::CompleteQuizzes(n)
            | Objective::PerfectScores(n)
            | Objective::EarnXp(n)
            | Objective::CompleteCategory { count: n, .. } => *n,
        }
    }

    fn measure(&self, profile: &PlayerProfile) -> u32 {
        match self {
            Objective::CompleteQuizzes(_) => profile.quizzes_completed,
            Objective::PerfectScores(_) => profile.perfect_scores,
            Objective::EarnXp(_) => profile.total_xp,
            Objective::CompleteCategory { category, .. } => {
                profile.category_counts.get(category).copied().unwrap_or(0)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub objective: Objective,
}

impl Quest {
    fn new(id: &str, title: &str, objective: Objective) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            objective,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestProgressManager {
    campaign: Vec<Quest>,
}

impl Default for QuestProgressManager {
    fn default() -> Self {
        Self::new(default_campaign())
    }
}

pub fn default_campaign() -> Vec<Quest> {
    vec![
        Quest::new("first-steps", "First Steps", Objective::CompleteQuizzes(1)),
        Quest::new("warming-up", "Warming Up", Objective::CompleteQuizzes(5)),
        Quest::new("sharpshooter", "Sharpshooter", Objective::PerfectScores(3)),
        Quest::new(
            "code-cadet",
            "Code Cadet",
            Objective::CompleteCategory {
                category: "programming".to_string(),
                count: 5,
            },
        ),
        Quest::new("scholar", "Scholar", Objective::EarnXp(3000)),
        Quest::new("marathon", "Marathon", Objective::CompleteQuizzes(25)),
    ]
}

impl QuestProgressManager {
    pub fn new(campaign: Vec<Quest>) -> Self {
        Self { campaign }
    }

    pub fn campaign(&self) -> &[Quest] {
        &self.campaign
    }

    /// Re-evaluates the campaign against the profile.
    ///
    /// Reports every quest finished by this call plus the active quest, if any.
    pub fn update(&self, profile: &mut PlayerProfile) -> Vec<QuestProgress> {
        let mut report = Vec::new();

        for quest in &self.campaign {
            if profile.completed_quests.contains(&quest.id) {
                continue;
            }

            let target = quest.objective.target();
            let progress = quest.objective.measure(profile).min(target);
            let completed = progress >= target;

            report.push(QuestProgress {
                quest_id: quest.id.clone(),
                title: quest.title.clone(),
                progress,
                target,
                completed,
                newly_completed: completed,
            });

            if !completed {
                break;
            }
            info!("quest {} completed", quest.id);
            profile.completed_quests.insert(quest.id.clone());
        }

        report
    }
}
