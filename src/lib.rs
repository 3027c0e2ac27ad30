//! In-memory, hash-chained vote log and the voting API built on it.

pub mod api;
pub mod block;
pub mod chain;
pub mod config;
pub mod errors;
pub mod models;
pub mod seed;
pub mod service;
pub mod store;

pub use block::Block;
pub use chain::Chain;
pub use errors::VotingError;
pub use service::VotingService;
