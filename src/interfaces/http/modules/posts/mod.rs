//! Posts module: feed, search, CRUD, likes and comments

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
