//! User aggregate
//!
//! Owned by the identity subsystem; this service reads users and lets
//! them edit their own public profile.

pub mod model;
pub mod repository;

mod dto_update_profile;

// Re-export model types
pub use model::{PublicProfile, User, UserRole, UserSummary};

// Re-export DTOs
pub use dto_update_profile::UpdateProfileDto;

// Re-export repository trait
pub use repository::UserRepositoryInterface;
