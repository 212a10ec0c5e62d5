use crate::domain::shared::closed_set::closed_set;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

closed_set! {
    /// What a vote points at.
    #[ts(export)]
    pub enum TargetKind {
        Post => "post",
        Comment => "comment",
    }
}

impl TargetKind {
    /// Table holding targets of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            TargetKind::Post => "posts",
            TargetKind::Comment => "comments",
        }
    }

    /// Column of `votes` referencing targets of this kind.
    pub fn vote_column(&self) -> &'static str {
        match self {
            TargetKind::Post => "post_id",
            TargetKind::Comment => "comment_id",
        }
    }
}

closed_set! {
    /// A stored stance. Absence of a vote is modelled as `Option::None`, never as a
    /// third stored state.
    #[ts(export)]
    pub enum VoteDirection {
        Up => "up",
        Down => "down",
    }
}

impl VoteDirection {
    /// Contribution of one vote to a tally.
    pub fn weight(&self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

closed_set! {
    /// A requested stance as sent by clients; `none` clears the caller's vote.
    #[ts(export)]
    pub enum VoteChoice {
        Up => "up",
        Down => "down",
        None => "none",
    }
}

impl From<VoteChoice> for Option<VoteDirection> {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Up => Some(VoteDirection::Up),
            VoteChoice::Down => Some(VoteDirection::Down),
            VoteChoice::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoteTarget {
    pub kind: TargetKind,
    pub id: Uuid,
}

impl VoteTarget {
    pub fn post(id: Uuid) -> Self {
        Self {
            kind: TargetKind::Post,
            id,
        }
    }

    pub fn comment(id: Uuid) -> Self {
        Self {
            kind: TargetKind::Comment,
            id,
        }
    }
}

/// One voter's current stance on one target.
///
/// At most one `Vote` exists per (`voter_id`, `target`). Only the voter mutates it,
/// through the tally engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vote {
    pub id: Uuid,
    pub voter_id: Uuid,
    pub target: VoteTarget,
    pub direction: VoteDirection,
    pub created_at: DateTime<Utc>,
}

/// Result of a vote mutation or a vote-state read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoteOutcome {
    pub target: VoteTarget,
    /// Tally recomputed from the vote rows; equals the target's cached `votes`.
    pub total_votes: i32,
    pub user_vote: Option<VoteDirection>,
}
