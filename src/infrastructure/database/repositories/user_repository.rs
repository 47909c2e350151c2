use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{contains_folded, fold};
use crate::domain::{
    DomainError, DomainResult, UpdateProfileDto, User, UserRepositoryInterface, UserRole,
};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::User => UserRole::User,
        user::UserRole::Admin => UserRole::Admin,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::User => user::UserRole::User,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        user_name: model.user_name,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        avatar: model.avatar,
        bio: model.bio,
        city: model.city,
        phone_number: model.phone_number,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Unique-index violations become `Conflict` naming the public field.
fn write_err(e: DbErr) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("duplicate") {
        if msg.contains("user_name") {
            return DomainError::conflict("userName");
        }
        if msg.contains("email") {
            return DomainError::conflict("email");
        }
    }
    DomainError::from(e)
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, u: &User) -> DomainResult<()> {
        let new_user = user::ActiveModel {
            id: Set(u.id.clone()),
            first_name: Set(u.first_name.clone()),
            last_name: Set(u.last_name.clone()),
            user_name: Set(u.user_name.clone()),
            email: Set(u.email.clone()),
            password_hash: Set(u.password_hash.clone()),
            role: Set(domain_role_to_entity(u.role)),
            avatar: Set(u.avatar.clone()),
            bio: Set(u.bio.clone()),
            city: Set(u.city.clone()),
            phone_number: Set(u.phone_number.clone()),
            first_name_folded: Set(fold(&u.first_name)),
            last_name_folded: Set(fold(&u.last_name)),
            user_name_folded: Set(fold(&u.user_name)),
            bio_folded: Set(u.bio.as_deref().map(fold)),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        };

        new_user.insert(&self.db).await.map_err(write_err)?;
        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn search_users(&self, query: &str, limit: u64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(
                Condition::any()
                    .add(contains_folded(user::Column::FirstNameFolded, query))
                    .add(contains_folded(user::Column::LastNameFolded, query))
                    .add(contains_folded(user::Column::UserNameFolded, query))
                    .add(contains_folded(user::Column::BioFolded, query)),
            )
            .order_by_asc(user::Column::UserName)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(first_name) = dto.first_name {
            active.first_name_folded = Set(fold(&first_name));
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = dto.last_name {
            active.last_name_folded = Set(fold(&last_name));
            active.last_name = Set(last_name);
        }
        if let Some(user_name) = dto.user_name {
            active.user_name_folded = Set(fold(&user_name));
            active.user_name = Set(user_name);
        }
        if let Some(bio) = dto.bio {
            active.bio_folded = Set(Some(fold(&bio)));
            active.bio = Set(Some(bio));
        }
        if let Some(phone_number) = dto.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        if let Some(city) = dto.city {
            active.city = Set(Some(city));
        }
        if let Some(avatar) = dto.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(write_err)?;
        Ok(Some(user_model_to_domain(updated)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::connect_in_memory;

    fn sample_user(id: &str, user_name: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            user_name: user_name.to_string(),
            email: format!("{}@example.com", user_name),
            password_hash: "opaque".into(),
            role: UserRole::User,
            avatar: None,
            bio: Some("Sells mechanical calculators".into()),
            city: Some("London".into()),
            phone_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn repo() -> UserRepository {
        UserRepository::new(connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let repo = repo().await;
        let user = sample_user("u1", "ada");
        repo.create_user(&user).await.unwrap();

        let fetched = repo.get_user_by_id("u1").await.unwrap().unwrap();
        assert_eq!(fetched.user_name, "ada");
        assert_eq!(fetched.role, UserRole::User);
        assert!(repo.get_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_name_is_a_conflict() {
        let repo = repo().await;
        repo.create_user(&sample_user("u1", "ada")).await.unwrap();

        let mut clash = sample_user("u2", "ada");
        clash.email = "other@example.com".into();
        assert_eq!(
            repo.create_user(&clash).await.unwrap_err(),
            DomainError::conflict("userName")
        );
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_fields() {
        let repo = repo().await;
        repo.create_user(&sample_user("u1", "ada")).await.unwrap();
        let mut grace = sample_user("u2", "grace");
        grace.first_name = "Grace".into();
        grace.last_name = "Hopper".into();
        grace.bio = None;
        repo.create_user(&grace).await.unwrap();

        let hits = repo.search_users("HOPP", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "u2");

        let hits = repo.search_users("calculator", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "u1");

        assert!(repo.search_users("100%", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let repo = repo().await;
        let mut seller = sample_user("u1", "mehmet");
        seller.first_name = "ÇAĞLA".into();
        seller.last_name = "Иванова".into();
        seller.bio = Some("ÜRÜNLER ve ДЕТСКИЕ вещи".into());
        repo.create_user(&seller).await.unwrap();

        for query in ["çağla", "ИВАН", "ürünler", "детские"] {
            let hits = repo.search_users(query, 20).await.unwrap();
            assert_eq!(hits.len(), 1, "query {:?}", query);
        }

        repo.update_profile(
            "u1",
            UpdateProfileDto {
                user_name: Some("ÖZGÜR".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(repo.search_users("özgür", 20).await.unwrap().len(), 1);
        assert!(repo.search_users("mehmet", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_profile_changes_only_given_fields() {
        let repo = repo().await;
        repo.create_user(&sample_user("u1", "ada")).await.unwrap();

        let updated = repo
            .update_profile(
                "u1",
                UpdateProfileDto {
                    city: Some("Paris".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.city.as_deref(), Some("Paris"));
        assert_eq!(updated.user_name, "ada");

        let missing = repo
            .update_profile("nobody", UpdateProfileDto::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn batch_lookup_skips_unknown_ids() {
        let repo = repo().await;
        repo.create_user(&sample_user("u1", "ada")).await.unwrap();
        let found = repo
            .get_users_by_ids(&["u1".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
