//! Incremental assembly of the run's dataset.

use std::io;

use ultim_core::{AcquisitionError, AggregateDataset, FetchSpec, SliceDecoder};

/// Decodes fetched files and folds them into an `AggregateDataset`.
///
/// Only the coordinator holds this, so merges are serialized by construction.
pub struct DatasetAggregator<D: SliceDecoder> {
    decoder: D,
    dataset: AggregateDataset<D::Slice>,
}

impl<D: SliceDecoder> std::fmt::Debug for DatasetAggregator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetAggregator")
            .field("slices", &self.dataset.len())
            .finish_non_exhaustive()
    }
}

impl<D: SliceDecoder> DatasetAggregator<D> {
    /// Create an aggregator with an empty dataset.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            dataset: AggregateDataset::new(),
        }
    }

    /// Decode the file behind `spec` and merge it.
    ///
    /// On decode failure the cached file is removed so a later run fetches it
    /// again, and the dataset is left unchanged.
    pub async fn merge_file(&mut self, spec: &FetchSpec) -> Result<(), AcquisitionError> {
        match self.decoder.decode(spec).await {
            Ok(slice) => {
                self.dataset.merge(slice);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    cycle = %spec.cycle,
                    lead_hour = spec.lead_hour,
                    error = %e,
                    "Discarding undecodable forecast file"
                );
                match tokio::fs::remove_file(&spec.local_path).await {
                    Ok(()) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => tracing::warn!(
                        path = %spec.local_path.display(),
                        error = %err,
                        "Failed to remove undecodable file"
                    ),
                }
                Err(AcquisitionError::decode(e.to_string()))
            }
        }
    }

    /// Slices merged so far.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// Whether nothing has been merged.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// The dataset so far.
    pub const fn dataset(&self) -> &AggregateDataset<D::Slice> {
        &self.dataset
    }

    /// Hand the dataset over.
    pub fn into_dataset(self) -> AggregateDataset<D::Slice> {
        self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{FileSliceDecoder, GribFileSlice};
    use chrono::NaiveDate;
    use async_trait::async_trait;
    use mockall::mock;
    use std::path::Path;
    use ultim_core::{DecodeError, ForecastCycle};

    mock! {
        Decoder {}
        #[async_trait]
        impl SliceDecoder for Decoder {
            type Slice = GribFileSlice;
            async fn decode(&self, spec: &FetchSpec) -> Result<GribFileSlice, DecodeError>;
        }
    }

    fn spec(dir: &Path, lead_hour: u16) -> FetchSpec {
        let path = dir.join(format!("f{lead_hour:03}.grib2"));
        std::fs::write(&path, b"GRIB").unwrap();
        FetchSpec {
            cycle: ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 0).unwrap(),
            lead_hour,
            local_path: path,
            remote_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_out_of_order_merges_are_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let mut aggregator = DatasetAggregator::new(FileSliceDecoder);

        for lead in [6, 0, 3] {
            aggregator.merge_file(&spec(temp.path(), lead)).await.unwrap();
        }

        let leads: Vec<u16> = aggregator
            .dataset()
            .slices()
            .iter()
            .map(|s| s.lead_hour)
            .collect();
        assert_eq!(leads, vec![0, 3, 6]);
    }

    #[tokio::test]
    async fn test_decode_failure_removes_file_and_keeps_dataset() {
        let temp = tempfile::tempdir().unwrap();
        let mut decoder = MockDecoder::new();
        decoder
            .expect_decode()
            .times(1)
            .returning(|s| Err(DecodeError::new(s.local_path.display().to_string(), "bad header")));
        let mut aggregator = DatasetAggregator::new(decoder);
        let spec = spec(temp.path(), 3);

        let err = aggregator.merge_file(&spec).await.unwrap_err();

        assert!(matches!(err, AcquisitionError::Decode { .. }));
        assert!(aggregator.is_empty());
        assert!(!spec.local_path.exists());
    }
}
