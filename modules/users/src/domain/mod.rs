pub mod error;
pub mod repo;
