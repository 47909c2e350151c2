//! Seller profile: public fields, every post, and derived totals

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::views::{PostView, ViewResolver};
use crate::domain::{DomainError, DomainResult, PublicProfile, RepositoryProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub posts_count: u64,
    pub total_likes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub public_profile: PublicProfile,
    pub posts: Vec<PostView>,
    pub stats: ProfileStats,
}

/// Recomputed on every call.
pub struct ProfileAggregator {
    repos: Arc<dyn RepositoryProvider>,
    views: ViewResolver,
}

impl ProfileAggregator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        let views = ViewResolver::new(repos.clone());
        Self { repos, views }
    }

    pub async fn get_seller_profile(&self, user_id: &str) -> DomainResult<SellerProfile> {
        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let posts = self.repos.posts().list_posts_by_owner(user_id).await?;
        let stats = ProfileStats {
            posts_count: posts.len() as u64,
            total_likes: posts.iter().map(|p| p.likes_count()).sum(),
        };

        Ok(SellerProfile {
            public_profile: user.public_profile(),
            posts: self.views.posts(&posts).await?,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::posts::test_support::seeded;
    use crate::application::posts::{EngagementEngine, FeedSettings, PostStore};
    use crate::domain::NewPostDto;

    #[tokio::test]
    async fn stats_match_returned_posts() {
        let (repos, _) = seeded().await;
        let store = PostStore::new(repos.clone(), FeedSettings::default());
        let engine = EngagementEngine::new(repos.clone());

        let mut ids = Vec::new();
        for caption in ["Lamp", "Chair", "Table"] {
            let post = store
                .create(
                    "a",
                    NewPostDto {
                        media_url: Some("m".into()),
                        caption: Some(caption.into()),
                        price: Some(1.0),
                    },
                )
                .await
                .unwrap();
            ids.push(post.id);
        }
        store
            .create(
                "b",
                NewPostDto {
                    media_url: Some("m".into()),
                    caption: Some("Not alice's".into()),
                    price: Some(1.0),
                },
            )
            .await
            .unwrap();
        engine.toggle_like(&ids[0], "b").await.unwrap();
        engine.toggle_like(&ids[0], "c").await.unwrap();
        engine.toggle_like(&ids[2], "b").await.unwrap();

        let profile = ProfileAggregator::new(repos)
            .get_seller_profile("a")
            .await
            .unwrap();
        assert_eq!(profile.public_profile.user_name, "alice");
        assert_eq!(profile.stats.posts_count, profile.posts.len() as u64);
        assert_eq!(profile.stats.posts_count, 3);
        assert_eq!(
            profile.stats.total_likes,
            profile.posts.iter().map(|p| p.likes_count).sum::<u64>()
        );
        assert_eq!(profile.stats.total_likes, 3);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (repos, _) = seeded().await;
        let err = ProfileAggregator::new(repos)
            .get_seller_profile("zzz")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }
}
