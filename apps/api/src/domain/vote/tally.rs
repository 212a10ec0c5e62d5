//! Pure tally arithmetic shared by every store backend.
//!
//! Stores never increment or decrement a cached counter. They apply a
//! [`VoteTransition`] to the vote rows, recount the target with [`Tally::from_directions`]
//! and write the recount back.

use super::entity::VoteDirection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub up: i64,
    pub down: i64,
}

impl Tally {
    pub fn from_directions<I>(directions: I) -> Self
    where
        I: IntoIterator<Item = VoteDirection>,
    {
        directions
            .into_iter()
            .fold(Tally::default(), |mut tally, direction| {
                match direction {
                    VoteDirection::Up => tally.up += 1,
                    VoteDirection::Down => tally.down += 1,
                }
                tally
            })
    }

    /// `#up - #down`, saturated into the width of the cached column.
    pub fn score(&self) -> i32 {
        (self.up - self.down).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

/// Row-level effect of setting a voter's stance to `requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    Unchanged,
    Inserted(VoteDirection),
    Flipped {
        from: VoteDirection,
        to: VoteDirection,
    },
    Removed(VoteDirection),
}

impl VoteTransition {
    pub fn between(existing: Option<VoteDirection>, requested: Option<VoteDirection>) -> Self {
        match (existing, requested) {
            (None, None) => VoteTransition::Unchanged,
            (None, Some(to)) => VoteTransition::Inserted(to),
            (Some(from), None) => VoteTransition::Removed(from),
            (Some(from), Some(to)) if from == to => VoteTransition::Unchanged,
            (Some(from), Some(to)) => VoteTransition::Flipped { from, to },
        }
    }

    /// The voter's direction once the transition is applied.
    pub fn resulting(&self, existing: Option<VoteDirection>) -> Option<VoteDirection> {
        match self {
            VoteTransition::Unchanged => existing,
            VoteTransition::Inserted(to) | VoteTransition::Flipped { to, .. } => Some(*to),
            VoteTransition::Removed(_) => None,
        }
    }
}

/// Toggle convention used by interactive callers: asking for the direction you
/// already hold clears it.
pub fn resolve_toggle(
    current: Option<VoteDirection>,
    requested: Option<VoteDirection>,
) -> Option<VoteDirection> {
    match (current, requested) {
        (Some(current), Some(requested)) if current == requested => None,
        (_, requested) => requested,
    }
}
