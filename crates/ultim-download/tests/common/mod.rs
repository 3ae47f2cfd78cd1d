//! Shared fixtures for acquisition tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::mpsc::UnboundedReceiver;
use ultim_core::{AcquisitionEvent, FileSetProfile};
use ultim_download::AcquisitionConfig;

pub const TEMPLATE: &str = "http://archive.test/{res}/{date}/{hour}/f{lead}";

/// 07:30 UTC, so the first candidate is the 06Z cycle of the same day.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap()
}

pub fn profile(lead_hours: Vec<u16>) -> FileSetProfile {
    FileSetProfile::new("test", lead_hours, TEMPLATE).unwrap()
}

/// Every third hour from 0 through `last`.
pub fn leads_through(last: u16) -> Vec<u16> {
    (0..=last).step_by(3).collect()
}

pub fn config(root: &Path, lead_hours: Vec<u16>) -> AcquisitionConfig {
    AcquisitionConfig::new(root)
        .with_profile(profile(lead_hours))
        .with_retry_delay(Duration::ZERO)
}

pub fn drain(rx: &mut UnboundedReceiver<AcquisitionEvent>) -> Vec<AcquisitionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn tick_count(events: &[AcquisitionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AcquisitionEvent::ProgressTick { .. }))
        .count()
}

/// All cached forecast files under `root`, sorted.
pub fn cached_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(dirs) = std::fs::read_dir(root) else {
        return files;
    };
    for dir in dirs.flatten() {
        if let Ok(entries) = std::fs::read_dir(dir.path()) {
            files.extend(
                entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| p.extension().is_some_and(|ext| ext == "grib2")),
            );
        }
    }
    files.sort();
    files
}
