// SPDX-License-Identifier: MIT

//! JSON-file persistence layer.
//!
//! All durable state lives under one data directory: one file per user in
//! `users/`, a single primary-admin slot, and one consolidated sessions
//! document. Every write is atomic (temp file + rename).

pub mod bootstrap;
pub mod json;

pub use bootstrap::{initialize, AdminCredentials};
pub use json::{JsonStore, StorageError};

/// On-disk layout under the data directory.
pub mod layout {
    pub const USERS_DIR: &str = "users";
    pub const ADMIN_FILE: &str = "admin.json";
    pub const SESSIONS_FILE: &str = "sessions.json";
    pub const CSRF_KEY_FILE: &str = ".csrf_key";
}
