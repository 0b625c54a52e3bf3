//! Failures of the info resource and their HTTP rendering.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use dcat_catalog::{CatalogError, NegotiateError, RepositoryError};
use thiserror::Error;

/// Every way a request to `/info/...` can fail.
#[derive(Debug, Error)]
pub enum InfoError {
    /// Only GET and HEAD are served.
    #[error("The method {0} is not supported by the info resource.")]
    MethodNotSupported(Method),
    /// No informational resource by that name.
    #[error("The info resource {0:?} does not exist.")]
    NotFound(String),
    /// Format selection or rendering failed.
    #[error(transparent)]
    Negotiate(#[from] NegotiateError),
    /// A dataset record could not be turned into catalog triples.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The dataset listing could not be read.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl InfoError {
    /// HTTP status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            InfoError::MethodNotSupported(_) => StatusCode::BAD_REQUEST,
            InfoError::NotFound(_) => StatusCode::NOT_FOUND,
            InfoError::Negotiate(
                NegotiateError::UnsupportedFormat(_) | NegotiateError::NotAcceptable(_),
            ) => StatusCode::NOT_ACCEPTABLE,
            InfoError::Negotiate(NegotiateError::Serialization(_))
            | InfoError::Catalog(_)
            | InfoError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InfoError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !status.is_server_error() {
            tracing::debug!(%status, error = %self, "rejected info request");
            return (status, self.to_string()).into_response();
        }

        match &self {
            InfoError::Catalog(err) => tracing::error!(
                record = err.record(),
                error = %err,
                source = ?std::error::Error::source(err),
                "failed to build DCAT catalog"
            ),
            _ => tracing::error!(
                error = %self,
                source = ?std::error::Error::source(&self),
                "failed to serve info resource"
            ),
        }
        (status, "Internal server error.").into_response()
    }
}
