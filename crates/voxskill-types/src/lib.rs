//! Shared types for voxskill.
//!
//! This crate contains the request/response envelopes exchanged with the
//! voice platform, the locale prompt entry shape, the skill configuration
//! and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod response;
