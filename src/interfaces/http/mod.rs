//! HTTP REST API interfaces
//!
//! - `common`: response envelope and the validating JSON extractor
//! - `error`: maps domain failures onto status codes and the envelope
//! - `middleware`: credential extraction and authentication
//! - `modules`: handlers grouped by resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;

pub use error::ApiError;
pub use router::{create_api_router, ApiDependencies, ApiDoc};
