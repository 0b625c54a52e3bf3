//! HTTP surface of The DataTank's informational resources.
//!
//! The only resource is the DCAT catalog, served at `/info/dcat` with an
//! optional format suffix (`/info/dcat.ttl`, `/info/dcat.json`, ...). When no
//! suffix is given the format is negotiated from the `Accept` header.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod error;

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE, HOST, VARY};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use dcat_catalog::{dcat_envelope, select_format, DatasetRepository, Format};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use config::{CliArgs, ConfigError, ServerConfig};
pub use error::InfoError;

/// Host used for catalog URIs when neither configuration nor the request
/// name one.
const FALLBACK_HOST: &str = "localhost";

/// Shared state of the info handlers.
pub struct AppState {
    repository: Arc<dyn DatasetRepository>,
    base_uri: Option<String>,
    default_format: Format,
}

impl AppState {
    /// Creates handler state over `repository`.
    pub fn new(
        repository: Arc<dyn DatasetRepository>,
        base_uri: Option<String>,
        default_format: Format,
    ) -> Self {
        AppState {
            repository,
            base_uri,
            default_format,
        }
    }

    fn base_uri(&self, headers: &HeaderMap) -> String {
        if let Some(base_uri) = &self.base_uri {
            return base_uri.clone();
        }
        let host = headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|host| !host.is_empty())
            .unwrap_or(FALLBACK_HOST);
        format!("http://{host}")
    }
}

/// Builds the router serving `/info` and everything below it.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/info", any(handle_info_root))
        .route("/info/", any(handle_info_root))
        .route("/info/*path", any(handle_info))
        .with_state(state)
}

/// A running catalog server.
pub struct CatalogServer {
    /// Address the server is bound to.
    pub addr: SocketAddr,
    /// `http://` URL of the server.
    pub base_url: String,
    /// Task running the server; resolves once `shutdown` fires and in-flight
    /// requests finish.
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl CatalogServer {
    /// Binds `config.listen_addr` and serves the info resources until
    /// `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound.
    pub async fn start<F>(
        config: &ServerConfig,
        repository: Arc<dyn DatasetRepository>,
        shutdown: F,
    ) -> Result<CatalogServer, anyhow::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(config.listen_addr)
            .await
            .with_context(|| format!("failed to bind {}", config.listen_addr))?;
        let addr = listener.local_addr()?;

        let state = Arc::new(AppState::new(
            repository,
            config.base_uri.clone(),
            config.default_format,
        ));
        let server = axum::serve(listener, router(state)).with_graceful_shutdown(shutdown);
        let handle = tokio::spawn(server.into_future());

        tracing::info!(%addr, default_format = %config.default_format, "info server listening");

        Ok(CatalogServer {
            addr,
            base_url: format!("http://{addr}"),
            handle,
        })
    }
}

/// Splits `dcat.ttl` into (`dcat`, `Some("ttl")`) at the first dot. An empty
/// extension counts as none.
fn split_extension(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((resource, ext)) if !ext.is_empty() => (resource, Some(ext)),
        Some((resource, _)) => (resource, None),
        None => (path, None),
    }
}

async fn handle_info_root(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, InfoError> {
    serve_info(&state, method, "", &headers)
}

async fn handle_info(
    State(state): State<Arc<AppState>>,
    method: Method,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, InfoError> {
    serve_info(&state, method, &path, &headers)
}

fn serve_info(
    state: &AppState,
    method: Method,
    path: &str,
    headers: &HeaderMap,
) -> Result<Response, InfoError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(InfoError::MethodNotSupported(method));
    }

    let path = path.trim_start_matches('/');
    let (resource, extension) = split_extension(path);
    let mut pieces = resource.split('/');

    match pieces.next() {
        Some("dcat") => {}
        _ => return Err(InfoError::NotFound(path.to_owned())),
    }

    let accept = headers.get(ACCEPT).and_then(|value| value.to_str().ok());
    let format = select_format(extension, accept, state.default_format)?;

    let base_uri = state.base_uri(headers);
    let datasets = state.repository.list_datasets()?;
    let envelope = dcat_envelope(&base_uri, &datasets)?;

    tracing::debug!(
        %method,
        path,
        %format,
        datasets = datasets.len(),
        triples = envelope.graph.len(),
        "served DCAT catalog"
    );

    let disposition = format!(
        "inline; filename=\"{}.{}\"",
        envelope.resource_label,
        format.suffix()
    );
    let headers = [
        (CONTENT_TYPE, header_value(format.content_type())),
        (CONTENT_DISPOSITION, header_value(disposition)),
        (VARY, HeaderValue::from_static("Accept")),
    ];

    let body = if method == Method::HEAD {
        Vec::new()
    } else {
        format.render(&envelope)?
    };
    Ok((StatusCode::OK, headers, body).into_response())
}

fn header_value(value: String) -> HeaderValue {
    HeaderValue::try_from(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_splits_at_first_dot() {
        assert_eq!(split_extension("dcat.ttl"), ("dcat", Some("ttl")));
        assert_eq!(split_extension("dcat"), ("dcat", None));
        assert_eq!(split_extension("dcat."), ("dcat", None));
        assert_eq!(split_extension("dcat.tar.gz"), ("dcat", Some("tar.gz")));
    }

    #[test]
    fn base_uri_prefers_configuration() {
        let state = AppState::new(
            Arc::new(dcat_catalog::InMemoryRepository::new(Vec::new())),
            Some("https://data.example.org".to_owned()),
            Format::Turtle,
        );
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("internal:8080"));
        assert_eq!(state.base_uri(&headers), "https://data.example.org");
    }

    #[test]
    fn base_uri_falls_back_to_host_header() {
        let state = AppState::new(
            Arc::new(dcat_catalog::InMemoryRepository::new(Vec::new())),
            None,
            Format::Turtle,
        );
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("data.example.org"));
        assert_eq!(state.base_uri(&headers), "http://data.example.org");
        assert_eq!(state.base_uri(&HeaderMap::new()), "http://localhost");
    }
}
