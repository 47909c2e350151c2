//! In-memory storage implementation

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::{
    Comment, DomainError, DomainResult, LikeToggle, Post, PostRepositoryInterface,
    RepositoryProvider, UpdateProfileDto, User, UserRepositoryInterface,
};

fn newest_first(posts: &mut [Post]) {
    posts.sort_by_key(|p| Reverse((p.created_at, p.id.clone())));
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Posts keyed by id. Engagement mutates the entry under its shard lock,
/// so concurrent toggles on one post never lose each other's writes.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: DashMap<String, Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepositoryInterface for InMemoryPostRepository {
    async fn insert_post(&self, post: &Post) -> DomainResult<()> {
        if self.posts.contains_key(&post.id) {
            return Err(DomainError::conflict("id"));
        }
        self.posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn find_post(&self, id: &str) -> DomainResult<Option<Post>> {
        Ok(self.posts.get(id).map(|p| p.clone()))
    }

    async fn count_posts(&self) -> DomainResult<u64> {
        Ok(self.posts.len() as u64)
    }

    async fn list_posts(&self, offset: u64, limit: u64) -> DomainResult<Vec<Post>> {
        let mut all: Vec<Post> = self.posts.iter().map(|e| e.value().clone()).collect();
        newest_first(&mut all);
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn search_posts_by_caption(&self, query: &str, limit: u64) -> DomainResult<Vec<Post>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<Post> = self
            .posts
            .iter()
            .filter(|e| contains_ci(&e.caption, &needle))
            .map(|e| e.value().clone())
            .collect();
        newest_first(&mut hits);
        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn list_posts_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Post>> {
        let mut mine: Vec<Post> = self
            .posts
            .iter()
            .filter(|e| e.is_owned_by(owner_id))
            .map(|e| e.value().clone())
            .collect();
        newest_first(&mut mine);
        Ok(mine)
    }

    async fn update_post_fields(&self, post: &Post) -> DomainResult<bool> {
        match self.posts.get_mut(&post.id) {
            Some(mut stored) => {
                stored.caption = post.caption.clone();
                stored.price = post.price;
                stored.media_url = post.media_url.clone();
                stored.updated_at = post.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, id: &str) -> DomainResult<bool> {
        Ok(self.posts.remove(id).is_some())
    }

    async fn toggle_like(&self, post_id: &str, user_id: &str) -> DomainResult<Option<LikeToggle>> {
        Ok(self
            .posts
            .get_mut(post_id)
            .map(|mut post| post.toggle_like(user_id)))
    }

    async fn append_comment(&self, post_id: &str, comment: &Comment) -> DomainResult<bool> {
        match self.posts.get_mut(post_id) {
            Some(mut post) => {
                post.append_comment(comment.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn taken(&self, field: &str, value: &str, except_id: &str) -> bool {
        self.users.iter().any(|u| {
            u.id != except_id
                && match field {
                    "userName" => u.user_name == value,
                    _ => u.email == value,
                }
        })
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> DomainResult<()> {
        if self.users.contains_key(&user.id) {
            return Err(DomainError::conflict("id"));
        }
        if self.taken("userName", &user.user_name, &user.id) {
            return Err(DomainError::conflict("userName"));
        }
        if self.taken("email", &user.email, &user.id) {
            return Err(DomainError::conflict("email"));
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn search_users(&self, query: &str, limit: u64) -> DomainResult<Vec<User>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<User> = self
            .users
            .iter()
            .filter(|u| {
                contains_ci(&u.first_name, &needle)
                    || contains_ci(&u.last_name, &needle)
                    || contains_ci(&u.user_name, &needle)
                    || u.bio.as_deref().is_some_and(|b| contains_ci(b, &needle))
            })
            .map(|u| u.value().clone())
            .collect();
        hits.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>> {
        if let Some(user_name) = dto.user_name.as_deref() {
            if self.taken("userName", user_name, id) {
                return Err(DomainError::conflict("userName"));
            }
        }
        let Some(mut user) = self.users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(v) = dto.first_name {
            user.first_name = v;
        }
        if let Some(v) = dto.last_name {
            user.last_name = v;
        }
        if let Some(v) = dto.user_name {
            user.user_name = v;
        }
        if dto.bio.is_some() {
            user.bio = dto.bio;
        }
        if dto.phone_number.is_some() {
            user.phone_number = dto.phone_number;
        }
        if dto.city.is_some() {
            user.city = dto.city;
        }
        if dto.avatar.is_some() {
            user.avatar = dto.avatar;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

/// Repository provider over the in-memory maps
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    posts: InMemoryPostRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn posts(&self) -> &dyn PostRepositoryInterface {
        &self.posts
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }
}
