//! # playlog common library
//!
//! Shared code for the playlog workspace:
//! - Database models, schema creation and station seeding
//! - Canonical text form for artist names and song titles
//! - Station-local time normalization
//! - Configuration loading
//! - Common error type

pub mod canonical;
pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use canonical::canonical;
pub use error::{Error, Result};
