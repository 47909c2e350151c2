//! SeaORM post repository
//!
//! Likes and comments are rows of their own, so engagement never rewrites
//! the post document. Each write runs in one transaction that starts by
//! touching the post row: that both proves the post exists and takes the
//! write lock before anything is read.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{contains_folded, fold};
use crate::domain::{
    is_well_formed_id, Comment, DomainResult, LikeToggle, Post, PostRepositoryInterface,
};
use crate::infrastructure::database::entities::{post, post_comment, post_like};

pub struct SeaOrmPostRepository {
    db: DatabaseConnection,
}

impl SeaOrmPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Load likes and comments for `models` in two queries and assemble the
/// aggregates, keeping the input order.
async fn hydrate<C: ConnectionTrait>(conn: &C, models: Vec<post::Model>) -> DomainResult<Vec<Post>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();

    let likes = post_like::Entity::find()
        .filter(post_like::Column::PostId.is_in(ids.clone()))
        .order_by_asc(post_like::Column::CreatedAt)
        .all(conn)
        .await?;
    let comments = post_comment::Entity::find()
        .filter(post_comment::Column::PostId.is_in(ids))
        .order_by_asc(post_comment::Column::Seq)
        .all(conn)
        .await?;

    let mut likes_by_post: HashMap<String, Vec<String>> = HashMap::new();
    for like in likes {
        likes_by_post.entry(like.post_id).or_default().push(like.user_id);
    }
    let mut comments_by_post: HashMap<String, Vec<Comment>> = HashMap::new();
    for c in comments {
        comments_by_post.entry(c.post_id).or_default().push(Comment {
            id: c.id,
            author_id: c.user_id,
            text: c.text,
            created_at: c.created_at,
        });
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let likes = likes_by_post.remove(&m.id).unwrap_or_default();
            let comments = comments_by_post.remove(&m.id).unwrap_or_default();
            Post::restore(
                m.id,
                m.user_id,
                m.media_url,
                m.caption,
                m.price,
                likes,
                comments,
                m.created_at,
                m.updated_at,
            )
        })
        .collect())
}

/// Bump `updated_at`; zero rows affected means the post is gone.
async fn touch<C: ConnectionTrait>(conn: &C, post_id: &str) -> DomainResult<bool> {
    let result = post::Entity::update_many()
        .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(post::Column::Id.eq(post_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

#[async_trait]
impl PostRepositoryInterface for SeaOrmPostRepository {
    async fn insert_post(&self, p: &Post) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        post::ActiveModel {
            id: Set(p.id.clone()),
            user_id: Set(p.owner_id.clone()),
            media_url: Set(p.media_url.clone()),
            caption: Set(p.caption.clone()),
            caption_folded: Set(fold(&p.caption)),
            price: Set(p.price),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
        .insert(&txn)
        .await?;

        for user_id in p.likes() {
            post_like::ActiveModel {
                post_id: Set(p.id.clone()),
                user_id: Set(user_id.clone()),
                created_at: Set(p.created_at),
            }
            .insert(&txn)
            .await?;
        }
        for c in p.comments() {
            post_comment::Entity::insert(post_comment::ActiveModel {
                seq: NotSet,
                id: Set(c.id.clone()),
                post_id: Set(p.id.clone()),
                user_id: Set(c.author_id.clone()),
                text: Set(c.text.clone()),
                created_at: Set(c.created_at),
            })
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn find_post(&self, id: &str) -> DomainResult<Option<Post>> {
        if !is_well_formed_id(id) {
            return Ok(None);
        }
        let Some(model) = post::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(hydrate(&self.db, vec![model]).await?.pop())
    }

    async fn count_posts(&self) -> DomainResult<u64> {
        Ok(post::Entity::find().count(&self.db).await?)
    }

    async fn list_posts(&self, offset: u64, limit: u64) -> DomainResult<Vec<Post>> {
        let models = post::Entity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        hydrate(&self.db, models).await
    }

    async fn search_posts_by_caption(&self, query: &str, limit: u64) -> DomainResult<Vec<Post>> {
        let models = post::Entity::find()
            .filter(contains_folded(post::Column::CaptionFolded, query))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        hydrate(&self.db, models).await
    }

    async fn list_posts_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Post>> {
        let models = post::Entity::find()
            .filter(post::Column::UserId.eq(owner_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await?;
        hydrate(&self.db, models).await
    }

    async fn update_post_fields(&self, p: &Post) -> DomainResult<bool> {
        let result = post::Entity::update_many()
            .col_expr(post::Column::Caption, Expr::value(p.caption.clone()))
            .col_expr(post::Column::CaptionFolded, Expr::value(fold(&p.caption)))
            .col_expr(post::Column::Price, Expr::value(p.price))
            .col_expr(post::Column::MediaUrl, Expr::value(p.media_url.clone()))
            .col_expr(post::Column::UpdatedAt, Expr::value(p.updated_at))
            .filter(post::Column::Id.eq(p.id.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_post(&self, id: &str) -> DomainResult<bool> {
        if !is_well_formed_id(id) {
            return Ok(false);
        }
        let txn = self.db.begin().await?;

        post_like::Entity::delete_many()
            .filter(post_like::Column::PostId.eq(id))
            .exec(&txn)
            .await?;
        post_comment::Entity::delete_many()
            .filter(post_comment::Column::PostId.eq(id))
            .exec(&txn)
            .await?;
        let result = post::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn toggle_like(&self, post_id: &str, user_id: &str) -> DomainResult<Option<LikeToggle>> {
        if !is_well_formed_id(post_id) {
            return Ok(None);
        }
        let txn = self.db.begin().await?;

        if !touch(&txn, post_id).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        let removed = post_like::Entity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?
            .rows_affected;

        if removed == 0 {
            post_like::Entity::insert(post_like::ActiveModel {
                post_id: Set(post_id.to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(Utc::now()),
            })
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        let like_count = post_like::Entity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&txn)
            .await?;

        txn.commit().await?;

        Ok(Some(LikeToggle {
            like_count,
            is_liked: removed == 0,
        }))
    }

    async fn append_comment(&self, post_id: &str, c: &Comment) -> DomainResult<bool> {
        if !is_well_formed_id(post_id) {
            return Ok(false);
        }
        let txn = self.db.begin().await?;

        if !touch(&txn, post_id).await? {
            txn.rollback().await?;
            return Ok(false);
        }

        post_comment::Entity::insert(post_comment::ActiveModel {
            seq: NotSet,
            id: Set(c.id.clone()),
            post_id: Set(post_id.to_string()),
            user_id: Set(c.author_id.clone()),
            text: Set(c.text.clone()),
            created_at: Set(c.created_at),
        })
        .exec(&txn)
        .await?;

        txn.commit().await?;
        Ok(true)
    }
}

// ── Tests ──────────────────────────────────────────────────────
