use async_trait::async_trait;

use super::{Comment, LikeToggle, Post};
use crate::shared::DomainResult;

/// Persistence port for the post aggregate.
///
/// Like and comment mutations are single atomic operations on the store,
/// never a fetch-modify-save of the whole aggregate, so concurrent
/// engagement on the same post cannot lose updates.
#[async_trait]
pub trait PostRepositoryInterface: Send + Sync {
    async fn insert_post(&self, post: &Post) -> DomainResult<()>;
    /// `None` for unknown or malformed ids.
    async fn find_post(&self, id: &str) -> DomainResult<Option<Post>>;

    async fn count_posts(&self) -> DomainResult<u64>;
    /// Newest first.
    async fn list_posts(&self, offset: u64, limit: u64) -> DomainResult<Vec<Post>>;
    /// Case-insensitive substring match on the caption, newest first.
    async fn search_posts_by_caption(&self, query: &str, limit: u64) -> DomainResult<Vec<Post>>;
    /// Newest first.
    async fn list_posts_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Post>>;

    /// Persist caption, price, media URL and `updated_at`. Returns `false`
    /// if the post no longer exists.
    async fn update_post_fields(&self, post: &Post) -> DomainResult<bool>;
    /// Remove the post with its likes and comments. Returns `false` if it
    /// did not exist.
    async fn delete_post(&self, id: &str) -> DomainResult<bool>;

    /// Atomically flip `user_id` in the like set. `None` if the post is missing.
    async fn toggle_like(&self, post_id: &str, user_id: &str) -> DomainResult<Option<LikeToggle>>;
    /// Atomically append to the comment sequence. `false` if the post is missing.
    async fn append_comment(&self, post_id: &str, comment: &Comment) -> DomainResult<bool>;
}
