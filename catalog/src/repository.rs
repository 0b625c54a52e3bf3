//! Read-only access to the platform's dataset listing.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::DatasetSummary;
use crate::time::parse_timestamp;

/// Errors raised while loading a dataset listing.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The snapshot file could not be read.
    #[error("failed to read dataset snapshot {}", path.display())]
    Io {
        /// Path of the snapshot file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot file is not a JSON array of dataset summaries.
    #[cfg(feature = "serde")]
    #[error("failed to decode dataset snapshot {}", path.display())]
    Decode {
        /// Path of the snapshot file.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Source of dataset summaries for the catalog.
///
/// Implementations must return datasets sorted by `updated_at`, most recent
/// first: the catalog's modification date is read from the first entry.
pub trait DatasetRepository: Send + Sync {
    /// Returns a snapshot of every published dataset, newest update first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn list_datasets(&self) -> Result<Vec<DatasetSummary>, RepositoryError>;
}

/// Sorts `datasets` by `updated_at`, most recent first.
///
/// The sort is stable. Records whose `updated_at` cannot be parsed go last,
/// so the catalog builder still sees and reports them.
pub fn sort_by_update_desc(datasets: &mut [DatasetSummary]) {
    datasets.sort_by_cached_key(|d| std::cmp::Reverse(parse_timestamp(&d.updated_at).ok()));
}

/// A fixed listing held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    datasets: Vec<DatasetSummary>,
}

impl InMemoryRepository {
    /// Creates a repository over `datasets`, sorting them per the
    /// [`DatasetRepository`] contract.
    #[must_use]
    pub fn new(mut datasets: Vec<DatasetSummary>) -> Self {
        sort_by_update_desc(&mut datasets);
        Self { datasets }
    }

    /// Loads a JSON snapshot: an array of objects with `resource_name`,
    /// `collection_uri`, `description`, `created_at` and `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the file cannot be read and
    /// [`RepositoryError::Decode`] if it is not a valid snapshot.
    #[cfg(feature = "serde")]
    pub fn from_json_file(path: &Path) -> Result<Self, RepositoryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RepositoryError::Io {
            path: path.to_owned(),
            source,
        })?;
        let datasets: Vec<DatasetSummary> =
            serde_json::from_str(&content).map_err(|source| RepositoryError::Decode {
                path: path.to_owned(),
                source,
            })?;
        tracing::debug!(path = %path.display(), count = datasets.len(), "loaded dataset snapshot");
        Ok(Self::new(datasets))
    }

    /// Number of datasets held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns `true` if no datasets are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DatasetRepository for InMemoryRepository {
    fn list_datasets(&self) -> Result<Vec<DatasetSummary>, RepositoryError> {
        Ok(self.datasets.clone())
    }
}
