//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input before it reaches a store.
//! - Expose the assignment use cases callers are expected to invoke.

pub mod assignment_service;
