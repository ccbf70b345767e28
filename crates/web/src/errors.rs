//! Custom 500 handling.
//!
//! Any handler error renders the diagnostic 500 page; if that rendering
//! itself fails, a minimal inline HTML response goes out instead of
//! cascading.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

#[derive(Template)]
#[template(path = "500.html")]
struct ServerErrorTemplate {
    exception: String,
    error: String,
    statuspage_version: &'static str,
    rust_version: &'static str,
}

/// Fallback body when even the error template cannot render.
const FALLBACK_BODY: &str = "<h1>Server Error (500)</h1>";

/// Render the diagnostic 500 page for an unhandled fault.
pub fn server_error_response(err: &anyhow::Error) -> Response {
    let tmpl = ServerErrorTemplate {
        exception: format!("{:#}", err),
        error: err.to_string(),
        statuspage_version: env!("CARGO_PKG_VERSION"),
        rust_version: env!("CARGO_PKG_RUST_VERSION"),
    };
    let body = match tmpl.render() {
        Ok(body) => body,
        Err(render_err) => {
            error!(error = %render_err, "500 template failed to render, using fallback");
            FALLBACK_BODY.to_string()
        }
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}

/// Error type for fallible page handlers. Converts from anything
/// `anyhow` accepts so handlers can use `?`.
#[derive(Debug)]
pub struct PageError(anyhow::Error);

impl<E> From<E> for PageError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Unhandled error while serving page");
        metrics::counter!("web.server_errors").increment(1);
        server_error_response(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn error_page_is_500_with_diagnostics() {
        let err = anyhow::anyhow!("store unavailable");
        let resp = server_error_response(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("store unavailable"));
        assert!(body.contains(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn page_error_converts_and_responds() {
        let err: PageError = anyhow::anyhow!("boom").into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
