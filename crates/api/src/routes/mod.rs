//! Route registration.

pub mod batches;
pub mod callback;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
///
/// The batch route is deliberately excluded from the request timeout
/// (applied by the caller to this sub-router's siblings): a batch run is
/// committed to its full poll budget per item and can legitimately
/// outlive an interactive timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(callback::router())
        .merge(tasks::router())
}
