//! Infrastructure layer for voxskill.
//!
//! Implements the ports defined in `voxskill-core`: prompt catalogs read from
//! a languages directory, configuration from TOML/`.env`/environment, and
//! persistent attributes in SQLite.

pub mod config;
pub mod locale;
pub mod sqlite;
