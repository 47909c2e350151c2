//! Database entities module

pub mod post;
pub mod post_comment;
pub mod post_like;
pub mod user;

pub use post::Entity as Post;
pub use post_comment::Entity as PostComment;
pub use post_like::Entity as PostLike;
pub use user::Entity as User;
