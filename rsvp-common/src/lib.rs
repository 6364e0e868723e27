//! # RSVP Common Library
//!
//! Shared code for the RSVP service and the guest import tool:
//! - Guest, RSVP and avatar models
//! - Name normalization and guest matching
//! - Guest directory cache
//! - CSV guest list import and reconciliation
//! - RSVP verification state machine
//! - Avatar aggregation for the plaza view
//! - REST store and transactional email clients
//! - Environment-sourced configuration

pub mod avatars;
pub mod config;
pub mod directory;
pub mod email;
pub mod error;
pub mod import;
pub mod matching;
pub mod models;
pub mod store;
pub mod verification;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::Config;
pub use directory::GuestDirectory;
pub use error::{Error, Result};
