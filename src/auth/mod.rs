// SPDX-License-Identifier: MIT

//! Authentication: password hashing and cookie-backed sessions.

pub mod password;
pub mod session;

pub use session::SessionManager;
