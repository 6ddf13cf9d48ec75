//! Stylecast API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! collaborator wiring) so integration tests and the binary entrypoint
//! can both access them.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;
