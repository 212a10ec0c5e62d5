pub mod cast_vote;
pub mod comments;
pub mod encyclopedia;
pub mod posts;
pub mod profiles;
