//! Post request DTOs
//!
//! Fields stay optional so the post aggregate can report what is missing;
//! the rules here only bound what is present.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{NewPostDto, PostPatchDto};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Reference returned by the media upload service
    #[validate(length(min = 1, message = "Media URL is required"))]
    pub media_url: Option<String>,
    #[validate(length(max = 1000, message = "Caption cannot exceed 1000 characters"))]
    pub caption: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be zero or greater"))]
    pub price: Option<f64>,
}

impl From<CreatePostRequest> for NewPostDto {
    fn from(r: CreatePostRequest) -> Self {
        Self {
            media_url: r.media_url,
            caption: r.caption,
            price: r.price,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(max = 1000, message = "Caption cannot exceed 1000 characters"))]
    pub caption: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be zero or greater"))]
    pub price: Option<f64>,
    pub media_url: Option<String>,
}

impl From<UpdatePostRequest> for PostPatchDto {
    fn from(r: UpdatePostRequest) -> Self {
        Self {
            caption: r.caption,
            price: r.price,
            media_url: r.media_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(length(max = 500, message = "Comment cannot exceed 500 characters"))]
    pub text: String,
}

/// Feed window. Values are parsed leniently: anything that is not a
/// positive integer falls back to the default.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FeedParams {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 20, capped by configuration)
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring
    pub q: Option<String>,
}
