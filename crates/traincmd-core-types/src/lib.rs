//! Core types shared across traincmd facilities
//!
//! This crate provides foundational types used by the command model,
//! the store and the logging facility:
//!
//! - **Progress**: ProgressSnapshot, the read-only view of trainer progress
//! - **Schema constants**: Canonical field keys and event names

pub mod progress;
pub mod schema;

pub use progress::ProgressSnapshot;
