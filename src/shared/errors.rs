use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Unique constraint violated on `field`.
    #[error("{field} already exists")]
    Conflict { field: String },

    /// Every violated field constraint, collected rather than failing fast.
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Ownership check failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Role-based authorization failed.
    #[error("Insufficient permissions: {0}")]
    RoleForbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
        }
    }

    /// Short category name used in logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::ValidationFailed(_) => "validation_failed",
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::RoleForbidden(_) => "role_forbidden",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Internal(format!("Database error: {}", e))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Accumulates field violations so callers can report all of them at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> DomainResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ValidationFailed(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_collect_every_message() {
        let mut v = Violations::new();
        v.check(false, "Caption is required");
        v.check(true, "never reported");
        v.check(false, "Price must be zero or greater");

        match v.into_result() {
            Err(DomainError::ValidationFailed(msgs)) => {
                assert_eq!(msgs, vec!["Caption is required", "Price must be zero or greater"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn empty_violations_pass() {
        assert!(Violations::new().into_result().is_ok());
    }

    #[test]
    fn conflict_names_the_field() {
        assert_eq!(DomainError::conflict("userName").to_string(), "userName already exists");
    }
}
