//! HTTP endpoint for the skill.
//!
//! `POST /skill` takes a platform request envelope and returns the response
//! envelope; `GET /health` is a liveness probe.

pub mod error;
pub mod handlers;
pub mod router;
