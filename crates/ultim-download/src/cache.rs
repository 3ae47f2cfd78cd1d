//! On-disk cache layout.
//!
//! Each `(resolution, date, cycle hour)` tuple owns one directory under the
//! cache root, and each lead hour one file inside it. The layout doubles as
//! the cache key: a file at the expected path is treated as already fetched.

use std::io;
use std::path::{Path, PathBuf};

use ultim_core::ForecastCycle;

/// Prefix shared by every cycle directory.
const CYCLE_DIR_PREFIX: &str = "gfs.";

/// Deterministic mapping from cycle and lead hour to cache paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name for a cycle, e.g. `gfs.0p50.20240301.t06z`.
    pub fn cycle_dir_name(resolution_tag: &str, cycle: &ForecastCycle) -> String {
        format!(
            "{CYCLE_DIR_PREFIX}{resolution_tag}.{}.t{}z",
            cycle.date_stamp(),
            cycle.hour_stamp()
        )
    }

    /// Directory holding every file of a cycle.
    pub fn cycle_dir(&self, resolution_tag: &str, cycle: &ForecastCycle) -> PathBuf {
        self.root.join(Self::cycle_dir_name(resolution_tag, cycle))
    }

    /// Cache path for one lead hour, e.g. `.../gfs.0p50.20240301.t06z.f003.grib2`.
    pub fn file_path(&self, resolution_tag: &str, cycle: &ForecastCycle, lead_hour: u16) -> PathBuf {
        let dir_name = Self::cycle_dir_name(resolution_tag, cycle);
        self.root
            .join(&dir_name)
            .join(format!("{dir_name}.f{lead_hour:03}.grib2"))
    }

    /// Cycle directories other than `keep`.
    ///
    /// Returns an empty list when the cache root does not exist yet.
    pub async fn stale_cycle_dirs(&self, keep: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut stale = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_cycle_dir = entry.file_type().await?.is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(CYCLE_DIR_PREFIX));
            if is_cycle_dir && path != keep {
                stale.push(path);
            }
        }
        stale.sort();
        Ok(stale)
    }

    /// Report (and optionally delete) cycle directories other than `keep`.
    ///
    /// Returns the directories that were found stale. Failures to delete one
    /// directory are logged and do not stop the sweep.
    pub async fn sweep_stale(&self, keep: &Path, evict: bool) -> io::Result<Vec<PathBuf>> {
        let stale = self.stale_cycle_dirs(keep).await?;
        for dir in &stale {
            if evict {
                match tokio::fs::remove_dir_all(dir).await {
                    Ok(()) => tracing::info!(path = %dir.display(), "Evicted stale cycle directory"),
                    Err(e) => tracing::warn!(
                        path = %dir.display(),
                        error = %e,
                        "Failed to evict stale cycle directory"
                    ),
                }
            } else {
                tracing::info!(path = %dir.display(), "Stale cycle directory left in cache");
            }
        }
        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cycle(h: u8) -> ForecastCycle {
        ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), h).unwrap()
    }

    #[test]
    fn paths_follow_cycle_naming() {
        let layout = CacheLayout::new("/cache");
        assert_eq!(
            layout.cycle_dir("0p50", &cycle(6)),
            PathBuf::from("/cache/gfs.0p50.20240301.t06z")
        );
        assert_eq!(
            layout.file_path("0p25", &cycle(18), 3),
            PathBuf::from("/cache/gfs.0p25.20240301.t18z/gfs.0p25.20240301.t18z.f003.grib2")
        );
        assert_eq!(
            layout.file_path("0p25", &cycle(0), 384),
            PathBuf::from("/cache/gfs.0p25.20240301.t00z/gfs.0p25.20240301.t00z.f384.grib2")
        );
    }

    #[tokio::test]
    async fn stale_dirs_exclude_current_and_foreign_entries() {
        let temp = tempfile::tempdir().unwrap();
        let layout = CacheLayout::new(temp.path());
        let keep = layout.cycle_dir("0p50", &cycle(6));
        let old = layout.cycle_dir("0p50", &cycle(0));
        std::fs::create_dir_all(&keep).unwrap();
        std::fs::create_dir_all(&old).unwrap();
        std::fs::create_dir_all(temp.path().join("unrelated")).unwrap();
        std::fs::write(temp.path().join("gfs.note"), b"x").unwrap();

        let stale = layout.stale_cycle_dirs(&keep).await.unwrap();
        assert_eq!(stale, vec![old]);
    }

    #[tokio::test]
    async fn missing_root_has_no_stale_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let layout = CacheLayout::new(temp.path().join("absent"));
        let stale = layout.stale_cycle_dirs(Path::new("/nowhere")).await.unwrap();
        assert!(stale.is_empty());
    }

    #[tokio::test]
    async fn sweep_only_deletes_when_evicting() {
        let temp = tempfile::tempdir().unwrap();
        let layout = CacheLayout::new(temp.path());
        let keep = layout.cycle_dir("0p50", &cycle(12));
        let old = layout.cycle_dir("0p50", &cycle(6));
        std::fs::create_dir_all(&keep).unwrap();
        std::fs::create_dir_all(&old).unwrap();

        let reported = layout.sweep_stale(&keep, false).await.unwrap();
        assert_eq!(reported, vec![old.clone()]);
        assert!(old.exists());

        layout.sweep_stale(&keep, true).await.unwrap();
        assert!(!old.exists());
        assert!(keep.exists());
    }
}
