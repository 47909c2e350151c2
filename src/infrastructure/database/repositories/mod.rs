//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod post_repository;
pub mod repository_provider;
pub mod user_repository;

pub use post_repository::SeaOrmPostRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::UserRepository;

use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, SimpleExpr};

/// Case folding for searchable text. SQLite's `LOWER()` only folds ASCII,
/// so searchable columns get a `*_folded` twin written with this.
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// `col LIKE '%query%'` against a folded column, with `query` folded the
/// same way and LIKE wildcards in it taken literally.
pub(crate) fn contains_folded(col: impl IntoColumnRef, query: &str) -> SimpleExpr {
    let mut escaped = String::with_capacity(query.len());
    for c in fold(query).chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Expr::col(col).like(LikeExpr::new(format!("%{}%", escaped)).escape('\\'))
}
