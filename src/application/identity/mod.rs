//! Identity module: credential verification and the user directory
//!
//! `AuthGate` turns a presented credential into a live `Identity`;
//! `UserDirectory` covers profile edits and user search.

pub mod auth_gate;
pub mod directory;

pub use auth_gate::{AuthGate, Identity};
pub use directory::UserDirectory;
