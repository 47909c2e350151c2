//! Read views with owner and author display fields merged in

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Comment, DomainResult, Post, RepositoryProvider, User, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    /// `null` once the author account is gone
    pub author: Option<UserSummary>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub owner: Option<UserSummary>,
    pub media_url: String,
    pub caption: String,
    pub price: f64,
    pub likes: Vec<String>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment authors carry no city.
fn author_summary(user: &User) -> UserSummary {
    UserSummary {
        city: None,
        ..user.summary()
    }
}

fn comment_view(comment: &Comment, users: &HashMap<String, User>) -> CommentView {
    CommentView {
        id: comment.id.clone(),
        author: users.get(&comment.author_id).map(author_summary),
        text: comment.text.clone(),
        created_at: comment.created_at,
    }
}

fn post_view(post: &Post, users: &HashMap<String, User>) -> PostView {
    PostView {
        id: post.id.clone(),
        owner: users.get(&post.owner_id).map(User::summary),
        media_url: post.media_url.clone(),
        caption: post.caption.clone(),
        price: post.price,
        likes: post.likes().to_vec(),
        likes_count: post.likes_count(),
        comments_count: post.comments_count(),
        comments: post.comments().iter().map(|c| comment_view(c, users)).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// Resolves every referenced user in one batched lookup per call.
#[derive(Clone)]
pub struct ViewResolver {
    repos: Arc<dyn RepositoryProvider>,
}

impl ViewResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn load_users(&self, mut ids: Vec<String>) -> DomainResult<HashMap<String, User>> {
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self.repos.users().get_users_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    pub async fn posts(&self, posts: &[Post]) -> DomainResult<Vec<PostView>> {
        let ids = posts
            .iter()
            .flat_map(|p| {
                std::iter::once(p.owner_id.clone())
                    .chain(p.comments().iter().map(|c| c.author_id.clone()))
            })
            .collect();
        let users = self.load_users(ids).await?;
        Ok(posts.iter().map(|p| post_view(p, &users)).collect())
    }

    pub async fn post(&self, post: &Post) -> DomainResult<PostView> {
        let mut views = self.posts(std::slice::from_ref(post)).await?;
        Ok(views.remove(0))
    }

    pub async fn comment(&self, comment: &Comment) -> DomainResult<CommentView> {
        let users = self.load_users(vec![comment.author_id.clone()]).await?;
        Ok(comment_view(comment, &users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::posts::test_support::seeded;
    use crate::domain::NewPostDto;

    fn lamp(owner: &str) -> Post {
        Post::new(
            owner,
            NewPostDto {
                media_url: Some("https://cdn.example/lamp.jpg".into()),
                caption: Some("Vintage lamp".into()),
                price: Some(25.0),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn merges_owner_and_authors() {
        let (repos, [a, b, _]) = seeded().await;
        let mut post = lamp(a.id());
        post.toggle_like(b.id());
        post.append_comment(Comment::new(b.id(), "Still available?").unwrap());
        post.append_comment(Comment::new("deleted-user", "hello").unwrap());

        let view = ViewResolver::new(repos).post(&post).await.unwrap();
        let owner = view.owner.unwrap();
        assert_eq!(owner.user_name, "alice");
        assert_eq!(owner.city.as_deref(), Some("Samarkand"));
        assert_eq!(view.likes_count, 1);
        assert_eq!(view.comments_count, 2);

        let author = view.comments[0].author.as_ref().unwrap();
        assert_eq!(author.user_name, "bob");
        assert!(author.city.is_none());
        assert!(view.comments[1].author.is_none());
    }

    #[tokio::test]
    async fn view_serializes_camel_case() {
        let (repos, [a, _, _]) = seeded().await;
        let view = ViewResolver::new(repos).post(&lamp(a.id())).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["mediaUrl"], "https://cdn.example/lamp.jpg");
        assert_eq!(json["likesCount"], 0);
        assert_eq!(json["owner"]["userName"], "alice");
    }
}
