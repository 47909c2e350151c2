//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{PostRepositoryInterface, RepositoryProvider, UserRepositoryInterface};

use super::post_repository::SeaOrmPostRepository;
use super::user_repository::UserRepository;

/// Repository provider backed by one SeaORM connection pool.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let post = repos.posts().find_post(&id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    posts: SeaOrmPostRepository,
    users: UserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            posts: SeaOrmPostRepository::new(db.clone()),
            users: UserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn posts(&self) -> &dyn PostRepositoryInterface {
        &self.posts
    }

    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }
}
