use log::{debug, error, info};

use crate::error::{AttendanceError, FetchFailure};
use crate::model::dataset::RawDataset;
use crate::repository::SnapshotSource;

/// Retrieves and validates the attendance snapshot.
///
/// No caching and no retries: every call is one fresh read, and retrying means calling
/// [`DataFetcher::fetch`] again.
pub struct DataFetcher<S: SnapshotSource> {
    source: S,
}

impl<S: SnapshotSource> DataFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn fetch(&self) -> Result<RawDataset, AttendanceError> {
        debug!("Fetching attendance data from {}", self.source.describe());
        match self.read_and_validate() {
            Ok(dataset) => {
                info!(
                    "Loaded attendance data for {} users (generated {})",
                    dataset.len(),
                    dataset.metadata.generated_at
                );
                Ok(dataset)
            }
            Err(failure) => {
                error!("Error fetching attendance data from {}: {}", self.source.describe(), failure);
                Err(failure.into())
            }
        }
    }

    fn read_and_validate(&self) -> Result<RawDataset, FetchFailure> {
        let body = self.source.read_snapshot()?;
        RawDataset::from_json(&body)
    }
}
