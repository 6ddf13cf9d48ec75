use std::time::Duration;

use stylecast_pipeline::PollBudget;
use stylecast_render::RenderConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    ///
    /// Note this bounds the callback and status endpoints; batch runs
    /// can legitimately outlive it and use their own budget, so the
    /// batch route is mounted outside the timeout layer.
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}

/// Load the render provider connection settings from the environment.
///
/// | Env Var               | Default                              |
/// |-----------------------|--------------------------------------|
/// | `RENDER_API_BASE_URL` | (required)                           |
/// | `RENDER_API_KEY`      | (required)                           |
/// | `RENDER_MODEL`        | `portrait-v1`                        |
/// | `RENDER_CALLBACK_URL` | (required)                           |
pub fn render_config_from_env() -> RenderConfig {
    RenderConfig {
        base_url: std::env::var("RENDER_API_BASE_URL").expect("RENDER_API_BASE_URL must be set"),
        api_key: std::env::var("RENDER_API_KEY").expect("RENDER_API_KEY must be set"),
        model: std::env::var("RENDER_MODEL").unwrap_or_else(|_| "portrait-v1".into()),
        callback_url: std::env::var("RENDER_CALLBACK_URL")
            .expect("RENDER_CALLBACK_URL must be set"),
    }
}

/// Load the reconciler poll budget from the environment.
///
/// Defaults match the pipeline's standard budget: 30 attempts at a
/// 2000 ms interval.
pub fn poll_budget_from_env() -> PollBudget {
    let max_attempts: u32 = std::env::var("POLL_MAX_ATTEMPTS")
        .unwrap_or_else(|_| "30".into())
        .parse()
        .expect("POLL_MAX_ATTEMPTS must be a valid u32");

    let interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
        .unwrap_or_else(|_| "2000".into())
        .parse()
        .expect("POLL_INTERVAL_MS must be a valid u64");

    PollBudget {
        max_attempts,
        interval: Duration::from_millis(interval_ms),
    }
}
