//! Core module - configuration, state, and server startup
//!
//! - [`Config`] - environment-driven settings
//! - [`ServerState`] - shared handles behind every request
//! - [`Server`] - HTTP listener

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
