//! In-memory repositories for tests and throwaway runs

mod memory;

pub use memory::{InMemoryPostRepository, InMemoryRepositoryProvider, InMemoryUserRepository};
