//! Response envelope shared by every endpoint

use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::Pagination;

pub mod validated_json;

pub use validated_json::ValidatedJson;

/// Either a single message or the full list of field violations
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// `{success, data?, count?, pagination?, error?}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of items in `data` for list and search responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessage>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            pagination: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(ErrorMessage::One(message.into()))
    }

    pub fn errors(messages: Vec<String>) -> Self {
        Self::failure(ErrorMessage::Many(messages))
    }

    fn failure(error: ErrorMessage) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            pagination: None,
            error: Some(error),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Success envelope for a list, with `count` filled in.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::success(items)
        }
    }
}

/// `data` of operations that return nothing
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct EmptyData {}
