//! Post use cases: the feed store, engagement, read views and seller
//! profiles

pub mod engagement;
pub mod profile;
pub mod store;
pub mod views;

pub use engagement::EngagementEngine;
pub use profile::{ProfileAggregator, ProfileStats, SellerProfile};
pub use store::{FeedSettings, PostStore};
pub use views::{CommentView, PostView, ViewResolver};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::Utc;

    use crate::application::Identity;
    use crate::domain::{RepositoryProvider, User, UserRole};
    use crate::infrastructure::InMemoryRepositoryProvider;

    pub fn user(id: &str, user_name: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            user_name: user_name.into(),
            email: format!("{}@example.com", user_name),
            password_hash: "x".into(),
            role: UserRole::User,
            avatar: Some(format!("https://cdn.example/{}.png", user_name)),
            bio: None,
            city: Some("Samarkand".into()),
            phone_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Provider seeded with users `a`, `b` and `c`.
    pub async fn seeded() -> (Arc<dyn RepositoryProvider>, [Identity; 3]) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let mut ids = Vec::new();
        for (id, name) in [("a", "alice"), ("b", "bob"), ("c", "carol")] {
            let u = user(id, name);
            repos.users().create_user(&u).await.unwrap();
            ids.push(Identity { user: u });
        }
        let [a, b, c]: [Identity; 3] = ids.try_into().unwrap();
        (repos, [a, b, c])
    }
}
