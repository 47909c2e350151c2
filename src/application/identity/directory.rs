//! User directory: profile edits and user search

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    DomainError, DomainResult, PublicProfile, RepositoryProvider, UpdateProfileDto, User,
};

use super::Identity;

pub struct UserDirectory {
    repos: Arc<dyn RepositoryProvider>,
    search_limit: u64,
}

impl UserDirectory {
    pub fn new(repos: Arc<dyn RepositoryProvider>, search_limit: u64) -> Self {
        Self {
            repos,
            search_limit,
        }
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Edit the caller's own profile. An empty patch returns the profile
    /// unchanged.
    pub async fn update_profile(
        &self,
        identity: &Identity,
        patch: UpdateProfileDto,
    ) -> DomainResult<User> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get_user(identity.id()).await;
        }

        let user = self
            .repos
            .users()
            .update_profile(identity.id(), patch)
            .await?
            .ok_or_else(|| DomainError::not_found("User", identity.id()))?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn search_users(&self, query: &str) -> DomainResult<Vec<PublicProfile>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::BadRequest("Search query is required".into()));
        }
        let users = self
            .repos
            .users()
            .search_users(query, self.search_limit)
            .await?;
        Ok(users.iter().map(User::public_profile).collect())
    }
}
