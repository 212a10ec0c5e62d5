use super::{MemoryState, MemoryStore};
use crate::domain::{
    shared::errors::DomainError,
    vote::{
        entity::{TargetKind, Vote, VoteDirection, VoteOutcome, VoteTarget},
        repository::VoteRepository,
        tally::{resolve_toggle, Tally, VoteTransition},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

impl MemoryState {
    fn ensure_target(&self, target: VoteTarget) -> Result<(), DomainError> {
        let exists = match target.kind {
            TargetKind::Post => self.posts.contains_key(&target.id),
            TargetKind::Comment => self.comments.contains_key(&target.id),
        };
        if exists {
            Ok(())
        } else {
            Err(match target.kind {
                TargetKind::Post => DomainError::NotFound("Post not found".into()),
                TargetKind::Comment => DomainError::NotFound("Comment not found".into()),
            })
        }
    }

    fn vote_of(&self, voter_id: Uuid, target: VoteTarget) -> Option<&Vote> {
        self.votes
            .values()
            .find(|vote| vote.voter_id == voter_id && vote.target == target)
    }

    pub(super) fn tally(&self, target: VoteTarget) -> Tally {
        Tally::from_directions(
            self.votes
                .values()
                .filter(|vote| vote.target == target)
                .map(|vote| vote.direction),
        )
    }

    fn write_back(&mut self, target: VoteTarget, score: i32) {
        match target.kind {
            TargetKind::Post => {
                if let Some(post) = self.posts.get_mut(&target.id) {
                    post.votes = score;
                }
            }
            TargetKind::Comment => {
                if let Some(comment) = self.comments.get_mut(&target.id) {
                    comment.votes = score;
                }
            }
        }
    }

    /// Drop every vote on `target`; used by the delete cascades.
    pub(super) fn purge_votes(&mut self, target: VoteTarget) {
        self.votes.retain(|_, vote| vote.target != target);
    }
}

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn find_vote(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
    ) -> Result<Option<Vote>, DomainError> {
        Ok(self.state.lock().await.vote_of(voter_id, target).cloned())
    }

    async fn cast_vote(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
        direction: Option<VoteDirection>,
        toggle: bool,
    ) -> Result<VoteOutcome, DomainError> {
        let mut state = self.state.lock().await;
        state.ensure_target(target)?;

        let existing = state.vote_of(voter_id, target).cloned();
        let current = existing.as_ref().map(|vote| vote.direction);
        let direction = if toggle {
            resolve_toggle(current, direction)
        } else {
            direction
        };
        let transition = VoteTransition::between(current, direction);

        match (transition, existing) {
            (VoteTransition::Inserted(to), _) => {
                let vote = Vote {
                    id: Uuid::now_v7(),
                    voter_id,
                    target,
                    direction: to,
                    created_at: Utc::now(),
                };
                state.votes.insert(vote.id, vote);
            }
            (VoteTransition::Flipped { to, .. }, Some(vote)) => {
                if let Some(stored) = state.votes.get_mut(&vote.id) {
                    stored.direction = to;
                }
            }
            (VoteTransition::Removed(_), Some(vote)) => {
                state.votes.remove(&vote.id);
            }
            _ => {}
        }

        let tally = state.tally(target);
        state.write_back(target, tally.score());

        Ok(VoteOutcome {
            target,
            total_votes: tally.score(),
            user_vote: transition.resulting(current),
        })
    }

    async fn recount(&self, target: VoteTarget) -> Result<Tally, DomainError> {
        let state = self.state.lock().await;
        state.ensure_target(target)?;
        Ok(state.tally(target))
    }

    async fn votes_by_voter(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        target_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteDirection>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .votes
            .values()
            .filter(|vote| {
                vote.voter_id == voter_id
                    && vote.target.kind == kind
                    && target_ids.contains(&vote.target.id)
            })
            .map(|vote| (vote.target.id, vote.direction))
            .collect())
    }
}
