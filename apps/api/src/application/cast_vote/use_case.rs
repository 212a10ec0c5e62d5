use super::dto::CastVoteRequest;
use crate::domain::{
    shared::errors::DomainError,
    vote::{
        entity::{VoteDirection, VoteOutcome, VoteTarget},
        repository::VoteRepository,
    },
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct CastVoteUseCase {
    repository: Arc<dyn VoteRepository>,
}

impl CastVoteUseCase {
    pub fn new(repository: Arc<dyn VoteRepository>) -> Self {
        Self { repository }
    }

    /// Record the caller's vote on `target` and return the recomputed tally.
    ///
    /// Anonymous callers are rejected before the store is touched.
    #[instrument(skip_all, fields(target_kind = %target.kind, target_id = %target.id))]
    pub async fn execute(
        &self,
        voter: Option<Uuid>,
        target: VoteTarget,
        request: CastVoteRequest,
    ) -> Result<VoteOutcome, DomainError> {
        let voter_id = voter.ok_or(DomainError::Unauthorized)?;
        let direction: Option<VoteDirection> = request.choice().into();

        let outcome = self
            .repository
            .cast_vote(voter_id, target, direction, request.toggle)
            .await?;
        tracing::info!(
            voter = %voter_id,
            total_votes = outcome.total_votes,
            user_vote = ?outcome.user_vote,
            "vote recorded"
        );
        Ok(outcome)
    }

    /// Live tally of `target` plus the viewer's own direction, if any.
    pub async fn state(
        &self,
        viewer: Option<Uuid>,
        target: VoteTarget,
    ) -> Result<VoteOutcome, DomainError> {
        let tally = self.repository.recount(target).await?;
        let user_vote = match viewer {
            Some(viewer_id) => self
                .repository
                .find_vote(viewer_id, target)
                .await?
                .map(|vote| vote.direction),
            None => None,
        };
        Ok(VoteOutcome {
            target,
            total_votes: tally.score(),
            user_vote,
        })
    }
}
