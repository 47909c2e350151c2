//! Likes and comments
//!
//! `toggle_like` flips membership: calling it twice with the same user
//! restores the original state. It is not an idempotent "mark liked".

use std::sync::Arc;

use tracing::info;

use super::views::{CommentView, ViewResolver};
use crate::domain::{Comment, DomainError, DomainResult, LikeToggle, RepositoryProvider};

pub struct EngagementEngine {
    repos: Arc<dyn RepositoryProvider>,
    views: ViewResolver,
}

impl EngagementEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        let views = ViewResolver::new(repos.clone());
        Self { repos, views }
    }

    pub async fn toggle_like(&self, post_id: &str, user_id: &str) -> DomainResult<LikeToggle> {
        let toggle = self
            .repos
            .posts()
            .toggle_like(post_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let action = if toggle.is_liked { "like" } else { "unlike" };
        metrics::counter!("post_likes_toggled_total", "action" => action).increment(1);
        info!(post_id = %post_id, user_id = %user_id, action, likes = toggle.like_count, "Like toggled");
        Ok(toggle)
    }

    /// Append a comment at the end of the post's sequence and return it
    /// with the author's display fields.
    pub async fn add_comment(
        &self,
        post_id: &str,
        author_id: &str,
        text: &str,
    ) -> DomainResult<CommentView> {
        let comment = Comment::new(author_id, text)?;

        if !self.repos.posts().append_comment(post_id, &comment).await? {
            return Err(DomainError::not_found("Post", post_id));
        }

        metrics::counter!("post_comments_added_total").increment(1);
        info!(post_id = %post_id, user_id = %author_id, comment_id = %comment.id, "Comment added");
        self.views.comment(&comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::posts::test_support::seeded;
    use crate::application::posts::{FeedSettings, PostStore};
    use crate::domain::{NewPostDto, Post, PostPatchDto};

    async fn setup() -> (EngagementEngine, PostStore, Post, Arc<dyn RepositoryProvider>) {
        let (repos, _) = seeded().await;
        let store = PostStore::new(repos.clone(), FeedSettings::default());
        let post = store
            .create(
                "a",
                NewPostDto {
                    media_url: Some("https://cdn.example/lamp.jpg".into()),
                    caption: Some("Vintage lamp".into()),
                    price: Some(25.0),
                },
            )
            .await
            .unwrap();
        (EngagementEngine::new(repos.clone()), store, post, repos)
    }

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let (engine, _, post, _) = setup().await;
        let on = engine.toggle_like(&post.id, "b").await.unwrap();
        assert_eq!(on, LikeToggle { like_count: 1, is_liked: true });
        let off = engine.toggle_like(&post.id, "b").await.unwrap();
        assert_eq!(off, LikeToggle { like_count: 0, is_liked: false });
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (engine, _, _, _) = setup().await;
        assert!(matches!(
            engine.toggle_like("missing", "b").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            engine.add_comment("missing", "b", "hi").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn comments_are_appended_last() {
        let (engine, store, post, _) = setup().await;
        engine.add_comment(&post.id, "b", "first").await.unwrap();
        let view = engine
            .add_comment(&post.id, "c", "Is this still available?")
            .await
            .unwrap();
        assert_eq!(view.author.unwrap().user_name, "carol");

        let stored = store.get_by_id(&post.id).await.unwrap();
        assert_eq!(stored.comments_count(), 2);
        assert_eq!(stored.comments()[1].text, "Is this still available?");
        assert_eq!(stored.comments()[1].id, view.id);
    }

    #[tokio::test]
    async fn blank_comment_rejected() {
        let (engine, _, post, _) = setup().await;
        assert!(matches!(
            engine.add_comment(&post.id, "b", "   ").await.unwrap_err(),
            DomainError::ValidationFailed(_)
        ));
    }

    #[tokio::test]
    async fn concurrent_engagement_is_not_lost() {
        let (engine, store, post, _) = setup().await;
        let engine = Arc::new(engine);

        let mut tasks = Vec::new();
        for i in 0..20 {
            let engine = engine.clone();
            let id = post.id.clone();
            tasks.push(tokio::spawn(async move {
                let user = format!("user-{}", i);
                engine.toggle_like(&id, &user).await.unwrap();
                engine.add_comment(&id, &user, "me too").await.unwrap();
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let stored = store.get_by_id(&post.id).await.unwrap();
        assert_eq!(stored.likes_count(), 20);
        assert_eq!(stored.comments_count(), 20);
    }

    #[tokio::test]
    async fn marketplace_scenario() {
        let (engine, store, post, _) = setup().await;
        assert!(post.likes().is_empty() && post.comments().is_empty());

        assert_eq!(
            engine.toggle_like(&post.id, "b").await.unwrap(),
            LikeToggle { like_count: 1, is_liked: true }
        );
        assert_eq!(
            engine.toggle_like(&post.id, "b").await.unwrap(),
            LikeToggle { like_count: 0, is_liked: false }
        );

        engine
            .add_comment(&post.id, "c", "Is this still available?")
            .await
            .unwrap();
        let stored = store.get_by_id(&post.id).await.unwrap();
        assert_eq!(stored.comments().len(), 1);
        assert_eq!(
            stored.comments().last().unwrap().text,
            "Is this still available?"
        );

        let err = store
            .update(
                &post.id,
                "b",
                PostPatchDto {
                    caption: Some("Mine now".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
