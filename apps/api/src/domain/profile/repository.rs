use super::entity::{Credentials, NewAccount, Profile, ProfileChanges};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Creates the account and its profile. `Conflict` on a taken email or username.
    async fn create_account(&self, account: NewAccount) -> Result<Profile, DomainError>;
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, DomainError>;
    async fn update(&self, id: Uuid, changes: ProfileChanges) -> Result<Profile, DomainError>;
    /// Flips the follow edge and returns whether `follower_id` now follows.
    async fn toggle_follow(&self, follower_id: Uuid, following_id: Uuid)
    -> Result<bool, DomainError>;
    async fn is_following(&self, follower_id: Uuid, following_id: Uuid)
    -> Result<bool, DomainError>;
    /// `(followers, following)` of a profile.
    async fn follow_counts(&self, id: Uuid) -> Result<(i64, i64), DomainError>;
}
