//! Data ingestion and aggregation layer for watchlens.
//!
//! Responsible for reading the viewing-history CSV, inferring which columns
//! carry timestamp / duration / title semantics, enriching records with
//! derived fields and computing every aggregation table the report layer
//! consumes.

pub mod aggregator;
pub mod analysis;
pub mod columns;
pub mod reader;
