//! Marker trait for read-side requests
//!
//! Every request type registered with the mediator is a query over committed
//! state; ingestion writes go through [`crate::ingest`] rather than the
//! mediator.

/// A request that only reads committed state
pub trait Query {}
