//! Store layer contracts and in-memory implementation.
//!
//! # Responsibility
//! - Define the keyed assignment storage contract used by services.
//! - Own identifier generation and query/filter/sort primitives.
//!
//! # Invariants
//! - Stores hold no validation rules; services validate before writing.
//! - Store operations are safe to call from many threads at once.

pub mod assignment_store;
