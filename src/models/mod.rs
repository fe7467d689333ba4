// SPDX-License-Identifier: MIT

//! Domain models persisted as JSON records.

pub mod driving_log;
pub mod session;
pub mod user;

pub use driving_log::{DayEntry, DrivingLog};
pub use session::Session;
pub use user::{Role, User};
