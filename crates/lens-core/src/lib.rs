//! Core domain types and helpers for the watchlens pipeline.
//!
//! Holds the viewing-history data model, the duration normalizer, timestamp
//! parsing and temporal decomposition, display formatting, CLI settings and
//! the shared error type.

pub mod duration;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod timestamps;
