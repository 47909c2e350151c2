//! Domain layer: aggregates, invariants and persistence ports.

pub mod post;
pub mod repositories;
pub mod user;

pub use post::{
    is_well_formed_id, Comment, LikeToggle, NewPostDto, Post, PostPatchDto,
    PostRepositoryInterface,
};
pub use repositories::RepositoryProvider;
pub use user::{
    PublicProfile, UpdateProfileDto, User, UserRepositoryInterface, UserRole, UserSummary,
};

pub use crate::shared::errors::{DomainError, DomainResult};
