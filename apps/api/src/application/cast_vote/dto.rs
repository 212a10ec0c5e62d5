use crate::domain::vote::entity::VoteChoice;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CastVoteRequest {
    /// `null` is accepted as `none`.
    #[serde(default)]
    pub direction: Option<VoteChoice>,
    /// Apply the toggle convention: repeating the held direction clears it.
    #[serde(default)]
    pub toggle: bool,
}

impl CastVoteRequest {
    pub fn choice(&self) -> VoteChoice {
        self.direction.unwrap_or(VoteChoice::None)
    }
}
