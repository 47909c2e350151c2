use async_trait::async_trait;

use super::{UpdateProfileDto, User};
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Fails with `Conflict` when `user_name` or `email` is taken.
    async fn create_user(&self, user: &User) -> DomainResult<()>;

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    /// Users that exist among `ids`, in no particular order.
    async fn get_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>>;
    /// Case-insensitive substring match on first/last/user name and bio.
    async fn search_users(&self, query: &str, limit: u64) -> DomainResult<Vec<User>>;

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>>;
}
