//! Post lifecycle: create, fetch, paginated feed, caption search, owner
//! edits and deletion

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    DomainError, DomainResult, NewPostDto, Post, PostPatchDto, RepositoryProvider,
};
use crate::shared::{Page, PageRequest, Pagination, DEFAULT_LIMIT};

/// Feed sizing knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub default_limit: u64,
    pub max_limit: u64,
    pub search_limit: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: 100,
            search_limit: 20,
        }
    }
}

impl FeedSettings {
    pub fn page_request(&self, page: Option<&str>, limit: Option<&str>) -> PageRequest {
        PageRequest::from_query(page, limit, self.default_limit, self.max_limit)
    }
}

pub struct PostStore {
    repos: Arc<dyn RepositoryProvider>,
    settings: FeedSettings,
}

impl PostStore {
    pub fn new(repos: Arc<dyn RepositoryProvider>, settings: FeedSettings) -> Self {
        Self { repos, settings }
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Publish a post owned by `owner_id`. The aggregate re-checks every
    /// field whatever validated the request upstream.
    pub async fn create(&self, owner_id: &str, dto: NewPostDto) -> DomainResult<Post> {
        let post = Post::new(owner_id, dto)?;
        self.repos.posts().insert_post(&post).await?;

        metrics::counter!("posts_created_total").increment(1);
        info!(post_id = %post.id, user_id = %owner_id, "Post created");
        Ok(post)
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<Post> {
        self.repos
            .posts()
            .find_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Newest-first window of the feed.
    pub async fn list(&self, request: PageRequest) -> DomainResult<Page<Post>> {
        let total = self.repos.posts().count_posts().await?;
        let items = self
            .repos
            .posts()
            .list_posts(request.start_index(), request.limit)
            .await?;

        Ok(Page {
            items,
            total,
            pagination: Pagination::compute(request, total),
        })
    }

    /// Load `id` and require `requester_id` to own it. Ownership is decided
    /// before any payload is looked at.
    async fn owned(&self, id: &str, requester_id: &str, action: &str) -> DomainResult<Post> {
        let post = self.get_by_id(id).await?;
        if !post.is_owned_by(requester_id) {
            debug!(post_id = %id, user_id = %requester_id, action, "Ownership check failed");
            return Err(DomainError::Forbidden(format!(
                "Not authorized to {} this post",
                action
            )));
        }
        Ok(post)
    }

    pub async fn update(
        &self,
        id: &str,
        requester_id: &str,
        patch: PostPatchDto,
    ) -> DomainResult<Post> {
        let mut post = self.owned(id, requester_id, "update").await?;
        post.apply_patch(patch)?;

        if !self.repos.posts().update_post_fields(&post).await? {
            return Err(DomainError::not_found("Post", id));
        }

        info!(post_id = %id, user_id = %requester_id, "Post updated");
        // Likes and comments may have landed since the ownership read.
        self.get_by_id(id).await
    }

    /// Remove the post together with its likes and comments.
    pub async fn delete(&self, id: &str, requester_id: &str) -> DomainResult<()> {
        self.owned(id, requester_id, "delete").await?;

        if !self.repos.posts().delete_post(id).await? {
            return Err(DomainError::not_found("Post", id));
        }

        info!(post_id = %id, user_id = %requester_id, "Post deleted");
        Ok(())
    }

    /// Case-insensitive caption substring match, newest first.
    pub async fn search_by_caption(&self, query: &str) -> DomainResult<Vec<Post>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::BadRequest("Search query is required".into()));
        }
        self.repos
            .posts()
            .search_posts_by_caption(query, self.settings.search_limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::application::posts::test_support::seeded;
    use crate::domain::{
        Comment, LikeToggle, PostRepositoryInterface, UserRepositoryInterface,
    };
    use crate::infrastructure::{InMemoryPostRepository, InMemoryUserRepository};

    /// Records a like from `c` whenever a field update is written, standing
    /// in for engagement that arrives between the read and the write.
    #[derive(Default)]
    struct LikeDuringUpdate {
        inner: InMemoryPostRepository,
    }

    #[async_trait::async_trait]
    impl PostRepositoryInterface for LikeDuringUpdate {
        async fn insert_post(&self, post: &Post) -> DomainResult<()> {
            self.inner.insert_post(post).await
        }
        async fn find_post(&self, id: &str) -> DomainResult<Option<Post>> {
            self.inner.find_post(id).await
        }
        async fn count_posts(&self) -> DomainResult<u64> {
            self.inner.count_posts().await
        }
        async fn list_posts(&self, offset: u64, limit: u64) -> DomainResult<Vec<Post>> {
            self.inner.list_posts(offset, limit).await
        }
        async fn search_posts_by_caption(&self, q: &str, limit: u64) -> DomainResult<Vec<Post>> {
            self.inner.search_posts_by_caption(q, limit).await
        }
        async fn list_posts_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Post>> {
            self.inner.list_posts_by_owner(owner_id).await
        }
        async fn update_post_fields(&self, post: &Post) -> DomainResult<bool> {
            self.inner.toggle_like(&post.id, "c").await?;
            self.inner.update_post_fields(post).await
        }
        async fn delete_post(&self, id: &str) -> DomainResult<bool> {
            self.inner.delete_post(id).await
        }
        async fn toggle_like(&self, id: &str, user_id: &str) -> DomainResult<Option<LikeToggle>> {
            self.inner.toggle_like(id, user_id).await
        }
        async fn append_comment(&self, id: &str, comment: &Comment) -> DomainResult<bool> {
            self.inner.append_comment(id, comment).await
        }
    }

    #[derive(Default)]
    struct RacingProvider {
        posts: LikeDuringUpdate,
        users: InMemoryUserRepository,
    }

    impl RepositoryProvider for RacingProvider {
        fn posts(&self) -> &dyn PostRepositoryInterface {
            &self.posts
        }
        fn users(&self) -> &dyn UserRepositoryInterface {
            &self.users
        }
    }

    fn dto(caption: &str, price: f64) -> NewPostDto {
        NewPostDto {
            media_url: Some("https://cdn.example/item.jpg".into()),
            caption: Some(caption.into()),
            price: Some(price),
        }
    }

    async fn store() -> (PostStore, Arc<dyn RepositoryProvider>) {
        let (repos, _) = seeded().await;
        (PostStore::new(repos.clone(), FeedSettings::default()), repos)
    }

    #[tokio::test]
    async fn create_starts_with_no_engagement() {
        let (store, _) = store().await;
        let post = store.create("a", dto("Vintage lamp", 25.0)).await.unwrap();
        let stored = store.get_by_id(&post.id).await.unwrap();
        assert_eq!(stored.owner_id, "a");
        assert!(stored.likes().is_empty());
        assert!(stored.comments().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let (store, _) = store().await;
        let err = store.create("a", NewPostDto::default()).await.unwrap_err();
        match err {
            DomainError::ValidationFailed(msgs) => assert_eq!(msgs.len(), 3),
            other => panic!("unexpected: {:?}", other),
        }
        let negative = store.create("a", dto("x", -1.0)).await.unwrap_err();
        assert!(matches!(negative, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn get_by_id_not_found_for_missing_or_malformed() {
        let (store, _) = store().await;
        for id in ["nope", "00000000-0000-0000-0000-000000000000"] {
            assert!(matches!(
                store.get_by_id(id).await.unwrap_err(),
                DomainError::NotFound { .. }
            ));
        }
    }

    #[tokio::test]
    async fn feed_pages_through_45_posts() {
        let (store, repos) = store().await;
        let base = Utc::now();
        for i in 0..45 {
            let mut post = Post::new("a", dto(&format!("item {}", i), 1.0)).unwrap();
            post.created_at = base + Duration::seconds(i);
            repos.posts().insert_post(&post).await.unwrap();
        }

        let first = store.list(PageRequest::new(1, 20)).await.unwrap();
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.total, 45);
        assert_eq!(first.items[0].caption, "item 44");
        assert!(first.pagination.has_next());
        assert!(!first.pagination.has_prev());

        let last = store.list(PageRequest::new(3, 20)).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[4].caption, "item 0");
        assert!(!last.pagination.has_next());
        assert!(last.pagination.has_prev());
    }

    #[tokio::test]
    async fn page_request_defaults_and_caps() {
        let settings = FeedSettings::default();
        assert_eq!(settings.page_request(None, None), PageRequest::new(1, 20));
        assert_eq!(
            settings.page_request(Some("abc"), Some("-3")),
            PageRequest::new(1, 20)
        );
        assert_eq!(
            settings.page_request(Some("2"), Some("5000")),
            PageRequest::new(2, 100)
        );
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_even_with_invalid_payload() {
        let (store, _) = store().await;
        let post = store.create("a", dto("Vintage lamp", 25.0)).await.unwrap();

        let bad_patch = PostPatchDto {
            price: Some(-10.0),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&post.id, "b", bad_patch).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert!(matches!(
            store.delete(&post.id, "b").await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert!(store.get_by_id(&post.id).await.is_ok());
    }

    #[tokio::test]
    async fn owner_update_and_delete() {
        let (store, _) = store().await;
        let post = store.create("a", dto("Vintage lamp", 25.0)).await.unwrap();

        let updated = store
            .update(
                &post.id,
                "a",
                PostPatchDto {
                    caption: Some("Vintage brass lamp".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.caption, "Vintage brass lamp");
        assert_eq!(updated.price, 25.0);

        let invalid = store
            .update(
                &post.id,
                "a",
                PostPatchDto {
                    price: Some(-1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(invalid, DomainError::ValidationFailed(_)));

        store.delete(&post.id, "a").await.unwrap();
        assert!(matches!(
            store.delete(&post.id, "a").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn update_returns_the_stored_engagement() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(RacingProvider::default());
        let store = PostStore::new(repos, FeedSettings::default());
        let post = store.create("a", dto("Vintage lamp", 25.0)).await.unwrap();

        let updated = store
            .update(
                &post.id,
                "a",
                PostPatchDto {
                    price: Some(30.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 30.0);
        assert_eq!(updated.likes_count(), 1);
        assert!(updated.is_liked_by("c"));
    }

    #[tokio::test]
    async fn search_contract() {
        let (store, _) = store().await;
        store.create("a", dto("Red Shirt For Sale", 12.0)).await.unwrap();
        store.create("a", dto("Vintage lamp", 25.0)).await.unwrap();

        let hits = store.search_by_caption("shirt").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].caption, "Red Shirt For Sale");

        assert!(matches!(
            store.search_by_caption("").await.unwrap_err(),
            DomainError::BadRequest(_)
        ));
    }
}
