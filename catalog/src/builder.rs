//! Catalog builder: turns a dataset listing into a DCAT graph.
//!
//! The builder expects its input sorted by `updated_at`, most recent first
//! (the [`DatasetRepository`](crate::repository::DatasetRepository) contract).
//! It does not sort; it only reports input that breaks the contract.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::model::{DatasetSummary, Graph, GraphBuilder, ResponseEnvelope, SemanticConf};
use crate::namespaces::{iris, DCAT_NAMESPACES};
use crate::time::{parse_timestamp, to_iso8601};

/// Path of the catalog document below the base URI.
pub const CATALOG_PATH: &str = "/info/dcat";

/// Title literal attached to every catalog.
pub const CATALOG_TITLE: &str = "A DCAT feed of datasets published by The DataTank.";

/// Resource label of the catalog document.
pub const CATALOG_LABEL: &str = "dcat";

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A dataset timestamp could not be parsed.
    #[error("dataset {record}: malformed {field} timestamp {value:?}")]
    Format {
        /// `collection/resource` of the offending dataset.
        record: String,
        /// Which timestamp field failed (`created_at` or `updated_at`).
        field: &'static str,
        /// The raw value as stored.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },
}

impl CatalogError {
    /// Identifier of the record that caused the error.
    #[must_use]
    pub fn record(&self) -> &str {
        match self {
            CatalogError::Format { record, .. } => record,
        }
    }
}

/// Returns the IRI of the catalog node for `base_uri`.
#[must_use]
pub fn catalog_uri(base_uri: &str) -> String {
    format!("{}{}", trim_base(base_uri), CATALOG_PATH)
}

/// Returns the IRI of a dataset node: `{base}/{collection}/{resource}`.
#[must_use]
pub fn dataset_uri(base_uri: &str, dataset: &DatasetSummary) -> String {
    format!(
        "{}/{}/{}",
        trim_base(base_uri),
        dataset.collection_uri,
        dataset.resource_name
    )
}

fn trim_base(base_uri: &str) -> &str {
    base_uri.strip_suffix('/').unwrap_or(base_uri)
}

/// Builds the DCAT graph for `datasets`.
///
/// The catalog's `dct:modified` is taken from the first dataset; it is left
/// out when `datasets` is empty. A dataset whose URI repeats an earlier one,
/// or equals the catalog URI, is skipped.
///
/// # Errors
///
/// Returns [`CatalogError::Format`] if any `created_at` or `updated_at`
/// cannot be parsed.
pub fn build_catalog(base_uri: &str, datasets: &[DatasetSummary]) -> Result<Graph, CatalogError> {
    let base = trim_base(base_uri);
    let catalog = catalog_uri(base);
    let mut graph = GraphBuilder::new();

    graph.add_resource(&catalog, iris::RDF_TYPE, iris::DCAT_CATALOG);
    graph.add_literal(&catalog, iris::DCT_TITLE, CATALOG_TITLE);

    match datasets.first() {
        Some(latest) => {
            let modified = parse_field(latest, "updated_at", &latest.updated_at)?;
            graph.add_literal(&catalog, iris::DCT_MODIFIED, &to_iso8601(&modified));
            warn_if_unsorted(&modified, &datasets[1..]);
        }
        None => tracing::warn!(catalog = %catalog, "no datasets published; catalog has no modification date"),
    }

    graph.add_literal(&catalog, iris::FOAF_HOMEPAGE, base);

    let mut emitted = HashSet::new();
    for dataset in datasets {
        let issued = parse_field(dataset, "created_at", &dataset.created_at)?;
        let modified = parse_field(dataset, "updated_at", &dataset.updated_at)?;

        let uri = dataset_uri(base, dataset);
        if uri == catalog {
            tracing::warn!(dataset = %dataset.record_id(), "dataset URI collides with the catalog URI; skipping it");
            continue;
        }
        if !emitted.insert(uri.clone()) {
            tracing::warn!(dataset = %dataset.record_id(), "duplicate dataset in listing; keeping the first entry");
            continue;
        }

        graph.add_resource(&catalog, iris::DCAT_DATASET, &uri);
        graph.add_resource(&uri, iris::RDF_TYPE, iris::DCAT_DATASET);
        graph.add_literal(&uri, iris::DCT_DESCRIPTION, &dataset.description);
        graph.add_literal(&uri, iris::DCT_ISSUED, &to_iso8601(&issued));
        graph.add_literal(&uri, iris::DCT_MODIFIED, &to_iso8601(&modified));
    }

    Ok(graph.freeze())
}

/// Builds the catalog and wraps it with the DCAT namespace table.
///
/// # Errors
///
/// Propagates [`build_catalog`] errors.
pub fn dcat_envelope(
    base_uri: &str,
    datasets: &[DatasetSummary],
) -> Result<ResponseEnvelope, CatalogError> {
    Ok(ResponseEnvelope {
        graph: build_catalog(base_uri, datasets)?,
        semantic: SemanticConf {
            namespaces: DCAT_NAMESPACES.to_vec(),
        },
        resource_label: CATALOG_LABEL.to_owned(),
    })
}

fn parse_field(
    dataset: &DatasetSummary,
    field: &'static str,
    value: &str,
) -> Result<DateTime<FixedOffset>, CatalogError> {
    parse_timestamp(value).map_err(|source| CatalogError::Format {
        record: dataset.record_id(),
        field,
        value: value.to_owned(),
        source,
    })
}

fn warn_if_unsorted(latest: &DateTime<FixedOffset>, rest: &[DatasetSummary]) {
    // Malformed values are reported by the main loop.
    let newer = rest.iter().find(|d| {
        parse_timestamp(&d.updated_at)
            .map(|ts| ts > *latest)
            .unwrap_or(false)
    });
    if let Some(dataset) = newer {
        tracing::warn!(
            dataset = %dataset.record_id(),
            "dataset listing is not sorted by update time; catalog modification date may be stale"
        );
    }
}
