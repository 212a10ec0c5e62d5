use super::{
    entity::{TargetKind, Vote, VoteDirection, VoteOutcome, VoteTarget},
    tally::Tally,
};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn find_vote(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
    ) -> Result<Option<Vote>, DomainError>;

    /// Set the voter's stance on `target` to exactly `direction` (or clear it),
    /// recount the target from its vote rows and write the recount back onto the
    /// target's cached `votes` column, all as one serialized unit per target.
    ///
    /// With `toggle`, `direction` is first resolved against the stance held inside
    /// that same unit: repeating the held direction clears it.
    ///
    /// Fails with `NotFound` when the target does not exist.
    async fn cast_vote(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
        direction: Option<VoteDirection>,
        toggle: bool,
    ) -> Result<VoteOutcome, DomainError>;

    /// Live recount from vote rows without touching the cached column.
    async fn recount(&self, target: VoteTarget) -> Result<Tally, DomainError>;

    async fn votes_by_voter(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        target_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteDirection>, DomainError>;
}
