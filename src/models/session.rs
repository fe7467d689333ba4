// SPDX-License-Identifier: MIT

//! Session record persisted in the consolidated sessions document.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed session lifetime.
pub const SESSION_DURATION_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user_id: String) -> Self {
        let now = Utc::now();
        Self {
            token,
            user_id,
            expires_at: now + Duration::days(SESSION_DURATION_DAYS),
            created_at: now,
        }
    }

    /// A session is valid iff the current time is at or before its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
