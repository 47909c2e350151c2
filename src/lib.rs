//! # Bazaar marketplace service
//!
//! Users publish media posts with a caption and a price; other users like
//! and comment on them, and both posts and users are searchable.
//!
//! ## Architecture
//!
//! - **domain**: the Post aggregate, users, repository traits
//! - **application**: AuthGate, PostStore, EngagementEngine,
//!   ProfileAggregator, UserDirectory
//! - **infrastructure**: JWT verification, SeaORM persistence, in-memory
//!   repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error taxonomy, pagination, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use infrastructure::{
    connect_in_memory, create_token, init_database, DatabaseConfig, JwtConfig,
    SeaOrmRepositoryProvider,
};

pub use interfaces::http::{create_api_router, ApiDependencies};
