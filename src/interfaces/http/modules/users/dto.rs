//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{UpdateProfileDto, User};

/// The caller's own account, as returned after a profile edit
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for AccountDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            user_name: u.user_name,
            email: u.email,
            role: u.role.to_string(),
            avatar: u.avatar,
            bio: u.bio,
            city: u.city,
            phone_number: u.phone_number,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Profile edit. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "First name cannot exceed 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name cannot exceed 50 characters"))]
    pub last_name: Option<String>,
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub user_name: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    #[validate(length(max = 100, message = "City cannot exceed 100 characters"))]
    pub city: Option<String>,
    /// Reference returned by the media upload service
    pub avatar: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileDto {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            user_name: r.user_name,
            bio: r.bio,
            phone_number: r.phone_number,
            city: r.city,
            avatar: r.avatar,
        }
    }
}
