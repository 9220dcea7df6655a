//! Generated artifact serving.
//!
//! Every route falls through to one handler that maps the request path onto
//! a file in the output directory. Only the text artifacts the generator
//! emits are served (`llms.txt`, `llms-full.txt`, and the `.md` page
//! mirrors), always as plain text so clients and LLM fetchers see raw
//! markdown rather than rendered HTML.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::state::AppState;

/// Create the router serving generated artifacts.
pub(crate) fn artifact_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_artifact)
}

/// Serve one generated artifact as plain text.
async fn serve_artifact(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');

    // The bare root previews the summary artifact.
    let rel = if path.is_empty() { "llms.txt" } else { path };

    let Some(file_path) = resolve(&state.out_dir, rel) else {
        warn!(path = rel, "artifact request refused");
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read_to_string(&file_path).await {
        Ok(content) => {
            debug!(path = rel, bytes = content.len(), "served artifact");
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(Body::from(content))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(err) => {
            warn!(path = rel, %err, "artifact not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Map a request path onto a file inside `out_dir`.
///
/// Refuses anything that is not a `.txt` or `.md` artifact, and any path
/// that would escape the output directory.
fn resolve(out_dir: &Path, rel: &str) -> Option<PathBuf> {
    if !(rel.ends_with(".txt") || rel.ends_with(".md")) {
        return None;
    }
    let rel_path = Path::new(rel);
    if rel_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(out_dir.join(rel_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_accepts_artifact_paths() {
        let out = Path::new("/srv/dist");
        assert_eq!(
            resolve(out, "llms.txt"),
            Some(PathBuf::from("/srv/dist/llms.txt"))
        );
        assert_eq!(
            resolve(out, "guide/setup.md"),
            Some(PathBuf::from("/srv/dist/guide/setup.md"))
        );
    }

    #[test]
    fn test_resolve_refuses_other_extensions() {
        let out = Path::new("/srv/dist");
        assert_eq!(resolve(out, "index.html"), None);
        assert_eq!(resolve(out, "style.css"), None);
    }

    #[test]
    fn test_resolve_refuses_traversal() {
        let out = Path::new("/srv/dist");
        assert_eq!(resolve(out, "../secret.md"), None);
        assert_eq!(resolve(out, "a/../../b.txt"), None);
        assert_eq!(resolve(out, "/etc/passwd.md"), None);
    }
}
