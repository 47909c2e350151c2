//! Post domain entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{NewPostDto, PostPatchDto, CAPTION_MAX_CHARS, COMMENT_MAX_CHARS};
use crate::shared::{DomainResult, Violations};

/// Ids are UUIDs; anything else can never name a stored record.
pub fn is_well_formed_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// A comment is immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: impl Into<String>, text: impl Into<String>) -> DomainResult<Self> {
        let text = text.into();
        let mut v = Violations::new();
        v.check(!text.trim().is_empty(), "Comment text is required");
        v.check(
            text.chars().count() <= COMMENT_MAX_CHARS,
            format!("Comment cannot exceed {} characters", COMMENT_MAX_CHARS),
        );
        v.into_result()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.into(),
            text,
            created_at: Utc::now(),
        })
    }
}

/// Outcome of flipping one user's like on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub like_count: u64,
    pub is_liked: bool,
}

/// Post aggregate root
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    /// Fixed at creation.
    pub owner_id: String,
    pub media_url: String,
    pub caption: String,
    pub price: f64,
    /// User ids, each at most once, in the order they liked.
    likes: Vec<String>,
    /// Append order.
    comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Publish a new post owned by `owner_id` with no likes or comments.
    pub fn new(owner_id: impl Into<String>, dto: NewPostDto) -> DomainResult<Self> {
        let mut v = Violations::new();
        v.check(
            dto.media_url.as_deref().is_some_and(|m| !m.trim().is_empty()),
            "Media URL is required",
        );
        match dto.caption.as_deref() {
            Some(caption) if !caption.trim().is_empty() => check_caption(&mut v, caption),
            _ => v.check(false, "Caption is required"),
        }
        match dto.price {
            Some(price) => check_price(&mut v, price),
            None => v.check(false, "Price is required"),
        }
        v.into_result()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            media_url: dto.media_url.unwrap_or_default(),
            caption: dto.caption.unwrap_or_default(),
            price: dto.price.unwrap_or_default(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a stored aggregate. Duplicate like entries are dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        owner_id: String,
        media_url: String,
        caption: String,
        price: f64,
        likes: Vec<String>,
        comments: Vec<Comment>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut unique = Vec::with_capacity(likes.len());
        for user_id in likes {
            if !unique.contains(&user_id) {
                unique.push(user_id);
            }
        }
        Self {
            id,
            owner_id,
            media_url,
            caption,
            price,
            likes: unique,
            comments,
            created_at,
            updated_at,
        }
    }

    pub fn likes(&self) -> &[String] {
        &self.likes
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn likes_count(&self) -> u64 {
        self.likes.len() as u64
    }

    pub fn comments_count(&self) -> u64 {
        self.comments.len() as u64
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Flip `user_id`'s membership in the like set. Calling it twice with
    /// the same user restores the original state.
    pub fn toggle_like(&mut self, user_id: &str) -> LikeToggle {
        if let Some(pos) = self.likes.iter().position(|id| id == user_id) {
            self.likes.remove(pos);
        } else {
            self.likes.push(user_id.to_string());
        }
        self.updated_at = Utc::now();
        LikeToggle {
            like_count: self.likes_count(),
            is_liked: self.is_liked_by(user_id),
        }
    }

    pub fn append_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.updated_at = Utc::now();
    }

    /// Apply an owner edit. Nothing changes unless every supplied field is
    /// valid.
    pub fn apply_patch(&mut self, patch: PostPatchDto) -> DomainResult<()> {
        let mut v = Violations::new();
        if let Some(caption) = patch.caption.as_deref() {
            v.check(!caption.trim().is_empty(), "Caption cannot be empty");
            check_caption(&mut v, caption);
        }
        if let Some(price) = patch.price {
            check_price(&mut v, price);
        }
        if let Some(media_url) = patch.media_url.as_deref() {
            v.check(!media_url.trim().is_empty(), "Media URL cannot be empty");
        }
        v.into_result()?;

        if let Some(caption) = patch.caption {
            self.caption = caption;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(media_url) = patch.media_url {
            self.media_url = media_url;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn check_caption(v: &mut Violations, caption: &str) {
    v.check(
        caption.chars().count() <= CAPTION_MAX_CHARS,
        format!("Caption cannot exceed {} characters", CAPTION_MAX_CHARS),
    );
}

fn check_price(v: &mut Violations, price: f64) {
    v.check(price.is_finite() && price >= 0.0, "Price must be zero or greater");
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::DomainError;

    fn lamp() -> Post {
        Post::new(
            "owner-a",
            NewPostDto {
                media_url: Some("https://cdn.example/lamp.jpg".into()),
                caption: Some("Vintage lamp".into()),
                price: Some(25.0),
            },
        )
        .unwrap()
    }

    #[test]
    fn new_post_starts_empty() {
        let post = lamp();
        assert!(post.likes().is_empty());
        assert!(post.comments().is_empty());
        assert_eq!(post.owner_id, "owner-a");
        assert!(is_well_formed_id(&post.id));
    }

    #[test]
    fn new_post_reports_all_missing_fields() {
        match Post::new("owner-a", NewPostDto::default()) {
            Err(DomainError::ValidationFailed(msgs)) => {
                assert_eq!(
                    msgs,
                    vec!["Media URL is required", "Caption is required", "Price is required"]
                );
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn negative_price_rejected() {
        let err = Post::new(
            "owner-a",
            NewPostDto {
                media_url: Some("m".into()),
                caption: Some("c".into()),
                price: Some(-0.01),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::ValidationFailed(vec!["Price must be zero or greater".into()])
        );
    }

    #[test]
    fn caption_length_limit() {
        let dto = |n: usize| NewPostDto {
            media_url: Some("m".into()),
            caption: Some("x".repeat(n)),
            price: Some(0.0),
        };
        assert!(Post::new("o", dto(CAPTION_MAX_CHARS)).is_ok());
        assert!(Post::new("o", dto(CAPTION_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn toggle_is_an_involution() {
        let mut post = lamp();
        let first = post.toggle_like("user-b");
        assert_eq!(first, LikeToggle { like_count: 1, is_liked: true });
        let second = post.toggle_like("user-b");
        assert_eq!(second, LikeToggle { like_count: 0, is_liked: false });
    }

    #[test]
    fn likes_never_hold_duplicates() {
        let mut post = lamp();
        // b toggles four times, c twice, d once
        for user in ["b", "c", "b", "b", "d", "c", "b"] {
            post.toggle_like(user);
            let mut sorted = post.likes().to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), post.likes().len());
        }
        assert!(!post.is_liked_by("b"));
        assert!(!post.is_liked_by("c"));
        assert!(post.is_liked_by("d"));
        assert_eq!(post.likes(), ["d".to_string()]);

        post.toggle_like("b");
        assert_eq!(post.likes_count(), 2);
    }

    #[test]
    fn restore_drops_duplicate_likes() {
        let now = Utc::now();
        let post = Post::restore(
            "id".into(),
            "o".into(),
            "m".into(),
            "c".into(),
            1.0,
            vec!["a".into(), "b".into(), "a".into()],
            Vec::new(),
            now,
            now,
        );
        assert_eq!(post.likes(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn comments_append_in_order() {
        let mut post = lamp();
        post.append_comment(Comment::new("c", "first").unwrap());
        post.append_comment(Comment::new("d", "second").unwrap());
        let texts: Vec<_> = post.comments().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert_eq!(post.comments_count(), 2);
    }

    #[test]
    fn comment_text_rules() {
        assert!(Comment::new("c", "  ").is_err());
        assert!(Comment::new("c", "x".repeat(COMMENT_MAX_CHARS + 1)).is_err());
        assert!(Comment::new("c", "Is this still available?").is_ok());
    }

    #[test]
    fn invalid_patch_leaves_post_untouched() {
        let mut post = lamp();
        let before = post.clone();
        let err = post
            .apply_patch(PostPatchDto {
                caption: Some("New caption".into()),
                price: Some(-5.0),
                media_url: None,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert_eq!(post, before);
    }

    #[test]
    fn patch_updates_only_supplied_fields() {
        let mut post = lamp();
        post.apply_patch(PostPatchDto {
            price: Some(30.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(post.price, 30.0);
        assert_eq!(post.caption, "Vintage lamp");
        assert_eq!(post.owner_id, "owner-a");
    }
}
