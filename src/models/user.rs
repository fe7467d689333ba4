// SPDX-License-Identifier: MIT

//! User model and the aggregates derived from its driving log.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::driving_log::DrivingLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
}

/// A user record, stored one-file-per-user (or in the primary admin slot).
///
/// `required_day_hours` / `required_night_hours` are the admin-set targets
/// for drivers; they are ignored for admin accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub required_day_hours: f64,
    #[serde(default)]
    pub required_night_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub driving_log: DrivingLog,
}

impl User {
    /// Create a fresh record with a random id and current timestamps.
    pub fn new(email: &str, name: &str, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
            role,
            required_day_hours: 0.0,
            required_night_hours: 0.0,
            created_at: now,
            updated_at: now,
            driving_log: DrivingLog::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }

    pub fn total_day_hours(&self) -> f64 {
        self.driving_log.iter().map(|(_, e)| e.day_hours).sum()
    }

    pub fn total_night_hours(&self) -> f64 {
        self.driving_log.iter().map(|(_, e)| e.night_hours).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.total_day_hours() + self.total_night_hours()
    }

    /// Percentage of the day-hours target reached, capped at 100.
    pub fn day_progress(&self) -> f64 {
        progress(self.total_day_hours(), self.required_day_hours)
    }

    /// Percentage of the night-hours target reached, capped at 100.
    pub fn night_progress(&self) -> f64 {
        progress(self.total_night_hours(), self.required_night_hours)
    }

    /// Average weekly hours over the rolling 28-day window ending today.
    pub fn weekly_average(&self) -> f64 {
        self.weekly_average_at(Utc::now().date_naive())
    }

    /// As [`Self::weekly_average`], with "today" supplied by the caller.
    pub fn weekly_average_at(&self, today: NaiveDate) -> f64 {
        let cutoff = today - Duration::days(28);
        let mut total = 0.0;
        for (date_str, entry) in self.driving_log.iter() {
            let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
                continue;
            };
            if date > cutoff && date <= today {
                total += entry.day_hours + entry.night_hours;
            }
        }
        total / 4.0
    }
}

fn progress(total: f64, required: f64) -> f64 {
    if required <= 0.0 {
        return 0.0;
    }
    (total / required * 100.0).min(100.0)
}
