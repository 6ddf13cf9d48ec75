//! Pure domain logic for the Stylecast generation platform.
//!
//! Holds the [`Task`](task::Task) lifecycle model, result-reference
//! classification, and the shared [`CoreError`](error::CoreError) type.
//! This crate performs no I/O; everything here is unit-testable without
//! a runtime.

pub mod error;
pub mod result_ref;
pub mod task;
