//! Credential verification and role checks

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenError};

pub const MISSING_TOKEN: &str = "Access denied. No token provided";
pub const EXPIRED_TOKEN: &str = "Token has expired";
pub const INVALID_TOKEN: &str = "Invalid token";

/// The user behind a verified credential, as stored right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user: User,
}

impl Identity {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }
}

pub struct AuthGate {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl AuthGate {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    /// Verify signature, issuer and expiry, then resolve the subject. A
    /// subject that no longer exists is treated as an invalid token.
    pub async fn authenticate(&self, credential: Option<&str>) -> DomainResult<Identity> {
        let Some(token) = credential.filter(|t| !t.is_empty()) else {
            debug!("Request without credential");
            return Err(DomainError::Unauthorized(MISSING_TOKEN.into()));
        };

        let claims = verify_token(token, &self.jwt_config).map_err(|e| {
            debug!(error = ?e, "Credential rejected");
            match e {
                TokenError::Expired => DomainError::Unauthorized(EXPIRED_TOKEN.into()),
                TokenError::Invalid => DomainError::Unauthorized(INVALID_TOKEN.into()),
            }
        })?;

        match self.repos.users().get_user_by_id(&claims.sub).await? {
            Some(user) => Ok(Identity { user }),
            None => {
                warn!(user_id = %claims.sub, "Credential subject no longer exists");
                Err(DomainError::Unauthorized(INVALID_TOKEN.into()))
            }
        }
    }
}

/// Allow the identity through only if its role is one of `required`.
pub fn authorize(identity: &Identity, required: &[UserRole]) -> DomainResult<()> {
    if required.contains(&identity.role()) {
        Ok(())
    } else {
        debug!(user_id = %identity.id(), role = %identity.role(), "Role check failed");
        Err(DomainError::RoleForbidden("Insufficient permissions".into()))
    }
}
