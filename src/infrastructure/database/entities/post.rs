//! Post entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Post model. Likes and comments live in their own tables keyed by
/// `post_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner
    pub user_id: String,
    pub media_url: String,
    #[sea_orm(column_type = "Text")]
    pub caption: String,
    /// `caption` case-folded, for search
    #[sea_orm(column_type = "Text")]
    pub caption_folded: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_like::Entity")]
    Likes,
    #[sea_orm(has_many = "super::post_comment::Entity")]
    Comments,
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::post_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
