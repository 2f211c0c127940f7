//! Mostinger library crate.
//!
//! Layering follows a hexagonal layout: `domain` holds entities and
//! invariants, `application` holds services and repository ports, `cache`
//! holds the feed cache subsystem, and `infra` holds the Postgres and HTTP
//! adapters.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
