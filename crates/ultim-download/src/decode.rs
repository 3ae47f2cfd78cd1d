//! Reference decoder.
//!
//! Treats each downloaded file as one opaque time slice. Hosts that parse
//! GRIB2 plug in their own `SliceDecoder`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use ultim_core::{DecodeError, FetchSpec, ForecastCycle, SliceDecoder, TimeIndexed};

/// One cached forecast file positioned on the time axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GribFileSlice {
    /// Cycle the file belongs to.
    pub cycle: ForecastCycle,
    /// Hours after cycle initialization.
    pub lead_hour: u16,
    /// Cycle initialization plus lead.
    pub valid_time: DateTime<Utc>,
    /// Location in the cache.
    pub path: PathBuf,
    /// File size on disk.
    pub size_bytes: u64,
}

impl TimeIndexed for GribFileSlice {
    fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }
}

/// Decoder producing a `GribFileSlice` for every non-empty cached file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSliceDecoder;

#[async_trait]
impl SliceDecoder for FileSliceDecoder {
    type Slice = GribFileSlice;

    async fn decode(&self, spec: &FetchSpec) -> Result<GribFileSlice, DecodeError> {
        let path_str = spec.local_path.display().to_string();
        let metadata = tokio::fs::metadata(&spec.local_path)
            .await
            .map_err(|e| DecodeError::new(&path_str, e.to_string()))?;
        if metadata.len() == 0 {
            return Err(DecodeError::new(path_str, "file is empty"));
        }

        Ok(GribFileSlice {
            cycle: spec.cycle,
            lead_hour: spec.lead_hour,
            valid_time: spec.cycle.init_time() + TimeDelta::hours(i64::from(spec.lead_hour)),
            path: spec.local_path.clone(),
            size_bytes: metadata.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn spec(path: PathBuf, lead_hour: u16) -> FetchSpec {
        FetchSpec {
            cycle: ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 18).unwrap(),
            lead_hour,
            local_path: path,
            remote_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_valid_time_is_init_plus_lead() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("f009.grib2");
        std::fs::write(&path, b"GRIB").unwrap();

        let slice = FileSliceDecoder.decode(&spec(path.clone(), 9)).await.unwrap();

        assert_eq!(
            slice.valid_time,
            Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap()
        );
        assert_eq!(slice.size_bytes, 4);
        assert_eq!(slice.path, path);
    }

    #[tokio::test]
    async fn test_missing_or_empty_file_is_decode_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(
            FileSliceDecoder
                .decode(&spec(temp.path().join("absent"), 0))
                .await
                .is_err()
        );

        let empty = temp.path().join("empty.grib2");
        std::fs::write(&empty, b"").unwrap();
        let err = FileSliceDecoder.decode(&spec(empty, 0)).await.unwrap_err();
        assert_eq!(err.message, "file is empty");
    }
}
