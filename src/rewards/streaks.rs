//! Daily play streaks

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakInfo {
    pub current: u32,
    pub best: u32,
    #[serde(default)]
    pub last_activity_day: Option<NaiveDate>,
}

impl StreakInfo {
    /// Registers activity on `today`. Returns true if the streak grew.
    ///
    /// Same-day activity leaves the streak as is, the next day extends it,
    /// anything later starts over at 1.
    pub fn record_activity(&mut self, today: NaiveDate) -> bool {
        let extended = match self.last_activity_day {
            Some(last) if last == today => false,
            Some(last) if last > today => false,
            Some(last) if (today - last).num_days() == 1 => {
                self.current += 1;
                true
            }
            _ => {
                self.current = 1;
                true
            }
        };

        if extended {
            self.last_activity_day = Some(today);
            self.best = self.best.max(self.current);
        }
        extended
    }

    /// Active while the last activity was today or yesterday
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.last_activity_day
            .map(|last| (today - last).num_days() <= 1)
            .unwrap_or(false)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
