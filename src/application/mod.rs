//! Application layer - use cases orchestrating the domain
//!
//! Services hold an `Arc<dyn RepositoryProvider>` built once at startup and
//! are cheap to share between request handlers.

pub mod identity;
pub mod posts;

pub use identity::{AuthGate, Identity, UserDirectory};
pub use posts::{
    CommentView, EngagementEngine, FeedSettings, PostStore, PostView, ProfileAggregator,
    ProfileStats, SellerProfile, ViewResolver,
};
