//! Collectible badges
//!
//! Tiered completion badges plus per-category specialist badges.

use super::Badge;
use super::local::PlayerProfile;

const TIERS: &[(&str, &str, u32)] = &[
    ("bronze_quizzer", "Bronze Quizzer", 5),
    ("silver_quizzer", "Silver Quizzer", 25),
    ("gold_quizzer", "Gold Quizzer", 100),
];

const PERFECTIONIST_SCORES: u32 = 10;
const SPECIALIST_QUIZZES: u32 = 5;

fn earned(profile: &PlayerProfile) -> Vec<Badge> {
    let mut badges = Vec::new();

    for &(id, name, needed) in TIERS {
        if profile.quizzes_completed >= needed {
            badges.push(Badge {
                id: id.to_string(),
                name: name.to_string(),
                description: format!("Complete {needed} quizzes"),
            });
        }
    }

    if profile.perfect_scores >= PERFECTIONIST_SCORES {
        badges.push(Badge {
            id: "perfectionist".to_string(),
            name: "Perfectionist".to_string(),
            description: format!("Get {PERFECTIONIST_SCORES} perfect scores"),
        });
    }

    for (category, &count) in &profile.category_counts {
        if count >= SPECIALIST_QUIZZES {
            badges.push(Badge {
                id: format!("specialist_{category}"),
                name: format!("{category} Specialist"),
                description: format!("Complete {SPECIALIST_QUIZZES} {category} quizzes"),
            });
        }
    }

    badges
}

/// Awards the badges the profile qualifies for but does not hold yet
pub fn award_new(profile: &mut PlayerProfile) -> Vec<Badge> {
    let new: Vec<Badge> = earned(profile)
        .into_iter()
        .filter(|b| !profile.badges.contains(&b.id))
        .collect();
    for badge in &new {
        profile.badges.insert(badge.id.clone());
    }
    new
}
