#![forbid(unsafe_code)]

//! Core user-state subsystem for the Liftlog fitness tracker.
//!
//! This crate provides:
//! - Domain types (workouts, exercises, sets, stored user state)
//! - The concurrent user store with durable snapshotting
//! - The hierarchy assembler (flat join rows to nested workouts)
//! - Account lifecycle helpers (signup, payload validation)
//! - Shutdown flushing and a CSV row source for offline tooling

pub mod types;
pub mod error;
pub mod ordering;
pub mod store;
pub mod assembler;
pub mod rows;
pub mod account;
pub mod config;
pub mod logging;
pub mod shutdown;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use store::UserStore;
pub use assembler::assemble_workout;
pub use rows::CsvRowSource;
pub use account::{create_user, validate_payload};
pub use config::Config;
pub use shutdown::flush_on_signal;
