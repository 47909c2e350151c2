//! Post aggregate
//!
//! A post together with its like set and comment sequence. The aggregate
//! is the unit of ownership: only the owner edits or deletes it, anyone
//! authenticated likes or comments on it.

pub mod model;
pub mod repository;

mod dto;

pub use dto::{NewPostDto, PostPatchDto};
pub use model::{is_well_formed_id, Comment, LikeToggle, Post};
pub use repository::PostRepositoryInterface;

pub const CAPTION_MAX_CHARS: usize = 1000;
pub const COMMENT_MAX_CHARS: usize = 500;
