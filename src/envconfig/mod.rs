use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the extraction engine the CLI talks to.
pub fn engine_host() -> String {
    let mut host = env::var("MANIFOLDS_ENGINE_HOST")
        .unwrap_or_else(|_| "http://localhost:8300".to_string());

    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{}", host);
    }

    host
}

/// Per-request timeout. Layer-wise fits over large stimulus sets run long,
/// hence the high default.
pub fn engine_timeout() -> Duration {
    let seconds = env::var("MANIFOLDS_ENGINE_TIMEOUT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);
    Duration::from_secs(seconds)
}

pub fn results_dir() -> PathBuf {
    PathBuf::from(env::var("MANIFOLDS_RESULTS").unwrap_or_else(|_| "results".to_string()))
}
