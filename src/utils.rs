use crate::entities::Resource;
use byte_unit::{Byte, UnitType};
use chrono::{DateTime, TimeDelta, Utc};

impl Resource {
    /// Human-readable size, empty for folders
    #[must_use]
    pub fn calculate_size(&self) -> String {
        if self.is_folder {
            return String::new();
        }
        let size = Byte::from(self.size.unwrap_or_default());
        format!("{:#.2}", size.get_appropriate_unit(UnitType::Decimal))
    }

    /// Time since last modification relative to `now`, or `"Unknown"`
    #[must_use]
    pub fn calculate_age(&self, now: DateTime<Utc>) -> String {
        match self.last_modified {
            Some(modified) => format_age(now - modified),
            None => String::from("Unknown"),
        }
    }
}

/// Two most significant units of `age`, e.g. `"2 d 3 h"`
fn format_age(age: TimeDelta) -> String {
    if age < TimeDelta::zero() {
        // modified in the future, clocks disagree
        return String::from("Unknown");
    }

    let days = age.num_days();
    let hours = age.num_hours() % 24;
    let minutes = age.num_minutes() % 60;

    if days > 0 {
        format!("{days} d {hours} h")
    } else if hours > 0 {
        format!("{hours} h {minutes} m")
    } else if minutes > 0 {
        format!("{minutes} m {} s", age.num_seconds() % 60)
    } else {
        format!("{} s", age.num_seconds())
    }
}
