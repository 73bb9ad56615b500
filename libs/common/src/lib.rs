//! Core library for the Salescast backend
//!
//! This crate provides the session-scoped in-memory store, the forecast
//! engine, and the shared data records used by the HTTP service. All
//! state lives in memory and dies with the process.

pub mod clock;
pub mod error;
pub mod forecast;
pub mod models;
pub mod store;
