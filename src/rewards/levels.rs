//! XP thresholds and level titles

#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    pub xp_required: u32,
    pub title: &'static str,
}

/// Sorted by level
pub static LEVELS: &[Level] = &[
    Level {
        level: 1,
        xp_required: 0,
        title: "Newcomer",
    },
    Level {
        level: 2,
        xp_required: 150,
        title: "Curious Mind",
    },
    Level {
        level: 3,
        xp_required: 400,
        title: "Curious Mind",
    },
    Level {
        level: 4,
        xp_required: 800,
        title: "Quiz Taker",
    },
    Level {
        level: 5,
        xp_required: 1300,
        title: "Quiz Taker",
    },
    Level {
        level: 6,
        xp_required: 2000,
        title: "Scholar",
    },
    Level {
        level: 7,
        xp_required: 3000,
        title: "Scholar",
    },
    Level {
        level: 8,
        xp_required: 4200,
        title: "Sage",
    },
    Level {
        level: 9,
        xp_required: 5700,
        title: "Sage",
    },
    Level {
        level: 10,
        xp_required: 7500,
        title: "Quiz Master",
    },
    Level {
        level: 11,
        xp_required: 10000,
        title: "Quiz Master",
    },
    Level {
        level: 12,
        xp_required: 13000,
        title: "Grand Master",
    },
    Level {
        level: 13,
        xp_required: 17000,
        title: "Grand Master",
    },
    Level {
        level: 14,
        xp_required: 22000,
        title: "Legend",
    },
    Level {
        level: 15,
        xp_required: 30000,
        title: "Mythic",
    },
];

impl Level {
    pub fn for_xp(xp: u32) -> &'static Level {
        LEVELS
            .iter()
            .rev()
            .find(|l| xp >= l.xp_required)
            .unwrap_or(&LEVELS[0])
    }

    /// XP needed for the next level (None at max level)
    pub fn xp_for_next(current_level: u32) -> Option<u32> {
        LEVELS
            .iter()
            .find(|l| l.level == current_level + 1)
            .map(|l| l.xp_required)
    }

    pub fn max_level() -> u32 {
        LEVELS.last().map(|l| l.level).unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerStats {
    pub total_xp: u32,
    pub level: u32,
    pub title: String,
    pub current_level_xp: u32,
    pub next_level_xp: Option<u32>,
}

impl PlayerStats {
    pub fn new(total_xp: u32) -> Self {
        let level_info = Level::for_xp(total_xp);

        Self {
            total_xp,
            level: level_info.level,
            title: level_info.title.to_string(),
            current_level_xp: level_info.xp_required,
            next_level_xp: Level::xp_for_next(level_info.level),
        }
    }

    /// Progress to next level in 0.0 - 1.0
    pub fn progress_to_next(&self) -> f32 {
        match self.next_level_xp {
            Some(next) => {
                let xp_in_level = self.total_xp - self.current_level_xp;
                let xp_for_level = next - self.current_level_xp;
                if xp_for_level == 0 {
                    1.0
                } else {
                    xp_in_level as f32 / xp_for_level as f32
                }
            }
            None => 1.0,
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level_xp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_for_xp() {
        assert_eq!(Level::for_xp(0).level, 1);
        assert_eq!(Level::for_xp(149).level, 1);
        assert_eq!(Level::for_xp(150).level, 2);
        assert_eq!(Level::for_xp(30000).level, 15);
        assert_eq!(Level::for_xp(1_000_000).level, Level::max_level());
    }

    #[test]
    fn player_stats_progress() {
        let stats = PlayerStats::new(275); // between 150 and 400
        assert_eq!(stats.level, 2);
        assert_eq!(stats.next_level_xp, Some(400));
        assert!((stats.progress_to_next() - 0.5).abs() < 0.01);
        assert!(!stats.is_max_level());
        assert!(PlayerStats::new(40000).is_max_level());
    }
}
