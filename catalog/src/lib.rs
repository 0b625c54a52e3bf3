//! DCAT catalog of the datasets published by The DataTank.
//!
//! The `dcat-catalog` crate turns a listing of dataset summaries into an RDF
//! graph described with the Data Catalog Vocabulary, and renders that graph
//! as Turtle, RDF/XML, JSON-LD, or N-Triples according to the client's
//! request.
//!
//! # Entry Point
//!
//! ```
//! use dcat_catalog::{dcat_envelope, negotiate, DatasetSummary, Format};
//!
//! let datasets = vec![DatasetSummary {
//!     resource_name: "rainfall".to_owned(),
//!     collection_uri: "weather".to_owned(),
//!     description: "Rain data".to_owned(),
//!     created_at: "2020-01-01T00:00:00Z".to_owned(),
//!     updated_at: "2020-06-01T00:00:00Z".to_owned(),
//! }];
//! let envelope = dcat_envelope("http://example.org", &datasets).unwrap();
//! let response = negotiate(&envelope, None, Some("text/turtle"), Format::Turtle).unwrap();
//! assert_eq!(response.format, Format::Turtle);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod model;
pub mod namespaces;
pub mod negotiate;
pub mod repository;
pub mod serializer;
pub mod time;

pub use builder::{build_catalog, catalog_uri, dataset_uri, dcat_envelope, CatalogError};
pub use model::{
    DatasetSummary, Graph, GraphBuilder, ResponseEnvelope, SemanticConf, Term, Triple,
};
pub use namespaces::{Namespace, DCAT_NAMESPACES};
pub use negotiate::{negotiate, select_format, Format, NegotiateError, Negotiated};
pub use repository::{DatasetRepository, InMemoryRepository, RepositoryError};
