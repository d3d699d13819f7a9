//! Domain model for tracked academic assignments.
//!
//! # Responsibility
//! - Define the canonical assignment record shared by store and service.
//! - Keep status vocabulary open while naming the values core logic reads.
//!
//! # Invariants
//! - Every stored assignment is identified by a store-issued `AssignmentId`.
//! - Record equality is identity equality (`id` only).

pub mod assignment;
