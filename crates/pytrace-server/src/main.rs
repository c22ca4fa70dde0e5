//! Binary entrypoint for the pytrace HTTP server.
//!
//! Reads configuration from environment variables:
//! - `PYTRACE_PORT`: Server listen port (default: "3000")
//! - `PYTRACE_PYTHON`: Python executable (default: `python3`, then `python`)
//! - `PYTRACE_TIMEOUT_MS`: Per-run deadline in milliseconds (default: "10000", "0" disables)

use pytrace_server::router::build_router;
use pytrace_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PYTRACE_PORT").unwrap_or_else(|_| "3000".to_string());

    let state = match AppState::from_env() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("pytrace server starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
