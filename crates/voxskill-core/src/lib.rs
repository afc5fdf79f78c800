//! Skill runtime and greeting skill for voxskill.
//!
//! This crate defines the request pipeline (interceptors, handler registry,
//! exception handlers), the request-scoped attribute bag, and the ports
//! (`LocaleSource`, `PersistenceAdapter`, `ConfigLoader`) that the
//! infrastructure layer implements. It depends only on `voxskill-types` --
//! never on `voxskill-infra` or any database/IO crate.

pub mod attributes;
pub mod config;
pub mod dispatch;
pub mod greeter;
pub mod locale;
pub mod persistence;
pub mod response;
pub mod skill;
