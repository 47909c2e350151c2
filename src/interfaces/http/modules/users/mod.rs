//! Users module: own profile edits, seller profiles, user search

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
