//! Preview server for generated llmtxt bundles.
//!
//! Serves the artifacts a bundle pass wrote to the output directory so the
//! generated `llms.txt`, `llms-full.txt`, and per-page mirrors can be
//! inspected the way an LLM fetcher would see them. Everything is served as
//! plain text; there is no rendering layer.

mod app;
mod artifacts;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory containing the generated artifacts.
    pub out_dir: PathBuf,
}

impl ServerConfig {
    /// Derive the server configuration from the loaded application config.
    #[must_use]
    pub fn from_config(config: &llmtxt_config::Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            out_dir: config.paths.out_dir.clone(),
        }
    }
}

/// Server error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The host/port pair did not form a valid socket address.
    #[error("Invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerError`] if the listen address is invalid or binding
/// fails.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState {
        out_dir: config.out_dir,
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting preview server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn router_for(dir: &TempDir) -> axum::Router {
        app::create_router(Arc::new(AppState {
            out_dir: dir.path().to_path_buf(),
        }))
    }

    async fn get(router: axum::Router, path: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_llms_txt_as_plain_text() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("llms.txt"), "# Docs\n").unwrap();

        let response = router_for(&dir)
            .oneshot(
                Request::builder()
                    .uri("/llms.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_root_previews_llms_txt() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("llms.txt"), "# Docs\n").unwrap();

        let (status, body) = get(router_for(&dir), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "# Docs\n");
    }

    #[tokio::test]
    async fn test_serves_nested_mirror() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("guide")).unwrap();
        std::fs::write(dir.path().join("guide/setup.md"), "Steps\n").unwrap();

        let (status, body) = get(router_for(&dir), "/guide/setup.md").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Steps\n");
    }

    #[tokio::test]
    async fn test_missing_artifact_is_404() {
        let dir = TempDir::new().unwrap();
        let (status, _) = get(router_for(&dir), "/nope.md").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_artifact_extension_is_404() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>").unwrap();

        let (status, _) = get(router_for(&dir), "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
