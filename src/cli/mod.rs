//! Command-line interface module.
//!
//! This module provides the CLI functionality for:
//! - Recording a snapshot from supplied counters
//! - Printing the recent window
//! - Sweeping expired snapshots

pub mod commands;
pub mod handlers;

pub use commands::{Commands, LoggingConfig};
pub use handlers::{handle_discard, handle_get, handle_record};
