pub mod not_found;
pub mod results;
pub mod vote;
