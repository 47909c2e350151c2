//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

pub use crypto::jwt::{create_token, verify_token, JwtConfig, TokenClaims, TokenError};
pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{connect_in_memory, init_database, run_migrations, DatabaseConfig};
pub use storage::{InMemoryPostRepository, InMemoryRepositoryProvider, InMemoryUserRepository};
