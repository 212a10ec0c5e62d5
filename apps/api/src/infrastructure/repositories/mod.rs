pub mod sqlx_comment_repository;
pub mod sqlx_dragon_repository;
pub mod sqlx_post_repository;
pub mod sqlx_profile_repository;
pub mod sqlx_vote_repository;

pub use sqlx_comment_repository::SqlxCommentRepository;
pub use sqlx_dragon_repository::SqlxDragonRepository;
pub use sqlx_post_repository::SqlxPostRepository;
pub use sqlx_profile_repository::SqlxProfileRepository;
pub use sqlx_vote_repository::SqlxVoteRepository;

use crate::domain::shared::errors::DomainError;

/// Unique violations become `Conflict`; everything else is an infrastructure failure.
pub(crate) fn storage_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let what = match db.constraint() {
                Some("accounts_email_key") => "Email is already registered",
                Some("profiles_username_key") => "Username is already taken",
                _ => "Record already exists",
            };
            return DomainError::Conflict(what.to_string());
        }
    }
    DomainError::InfrastructureError(err.to_string())
}
