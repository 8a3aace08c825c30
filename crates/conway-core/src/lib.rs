//! Core types, configuration, and error handling for Conway.
//!
//! This crate provides the shared foundation used by the other Conway crates:
//! - [`ConwayError`]: unified error type using `thiserror`
//! - [`ConwayConfig`]: configuration loaded from `.conway.toml`
//! - Shared types: [`AuthorRevision`], [`Effort`], [`Change`],
//!   [`CommunicationRecord`], [`PairOrder`], [`SortOrder`]

mod config;
mod error;
mod types;

pub use config::{CommunicationConfig, ConwayConfig};
pub use error::ConwayError;
pub use types::{AuthorRevision, Change, CommunicationRecord, Effort, PairOrder, SortOrder};

/// A convenience `Result` type for Conway operations.
pub type Result<T> = std::result::Result<T, ConwayError>;
