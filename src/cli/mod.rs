//! CLI command handlers
//!
//! Bridges clap argument parsing with the secret service.

pub mod secret;

pub use secret::{handle_consume, handle_create, handle_sweep, ConsumeArgs, CreateArgs};
