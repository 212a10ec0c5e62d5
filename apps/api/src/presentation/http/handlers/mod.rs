pub mod auth;
pub mod comments;
pub mod dragons;
pub mod health;
pub mod posts;
pub mod profiles;
pub mod votes;
