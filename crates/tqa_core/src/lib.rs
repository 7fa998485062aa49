pub mod bibliography;
pub mod chunks;
pub mod config;
pub mod error;
pub mod query;
