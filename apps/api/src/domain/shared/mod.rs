pub mod closed_set;
pub mod errors;
pub mod pagination;
