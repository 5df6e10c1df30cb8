//! Quitanda server library.
//!
//! This crate provides the inventory and sales backend as a library,
//! allowing it to be tested and reused from the CLI (seeding, migrations).
//!
//! # Layout
//!
//! - [`config`] - Environment-driven configuration
//! - [`db`] - Connection pool, migrations, and per-table repositories
//! - [`models`] - Domain types and request inputs
//! - [`services`] - Validation and workflows on top of the repositories
//! - [`routes`] - Axum handlers
//! - [`middleware`] - Access-token extractors and the session layer
//! - [`auth`] - Google OAuth client and token issuing
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
