pub mod comment;
pub mod dragon;
pub mod post;
pub mod profile;
pub mod shared;
pub mod vote;
