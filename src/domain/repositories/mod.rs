//! Repository access for the domain layer

use super::post::PostRepositoryInterface;
use super::user::UserRepositoryInterface;

/// Provides access to all domain repositories.
///
/// Constructed once at process start and handed to every service, so
/// nothing reaches for a global model object:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let post = repos.posts().find_post(&post_id).await?;
///     let owner = repos.users().get_user_by_id(&post.owner_id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn posts(&self) -> &dyn PostRepositoryInterface;
    fn users(&self) -> &dyn UserRepositoryInterface;
}
