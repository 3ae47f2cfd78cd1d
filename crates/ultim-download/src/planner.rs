//! Expands a cycle into the ordered list of files to fetch.

use ultim_core::{FetchSpec, FileSetProfile, ForecastCycle};

use crate::cache::CacheLayout;

/// Builds work lists. Pure: no network or filesystem access.
#[derive(Debug, Clone)]
pub struct FileSetPlanner {
    layout: CacheLayout,
}

impl FileSetPlanner {
    /// Create a planner writing into `layout`.
    pub const fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    /// The cache layout used for local paths.
    pub const fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// One spec per lead hour of `profile`, in profile order.
    ///
    /// The first element is always the lead-hour-0 probe.
    pub fn plan(&self, cycle: &ForecastCycle, profile: &FileSetProfile) -> Vec<FetchSpec> {
        let tag = profile.resolution_tag();
        profile
            .lead_hours()
            .iter()
            .map(|&lead_hour| FetchSpec {
                cycle: *cycle,
                lead_hour,
                local_path: self.layout.file_path(tag, cycle, lead_hour),
                remote_url: build_url(profile.url_template(), tag, cycle, lead_hour),
            })
            .collect()
    }
}

/// Substitute cycle and lead hour into an archive URL template.
fn build_url(template: &str, tag: &str, cycle: &ForecastCycle, lead_hour: u16) -> String {
    template
        .replace("{res}", tag)
        .replace("{date}", &cycle.date_stamp())
        .replace("{hour}", &cycle.hour_stamp())
        .replace("{lead}", &format!("{lead_hour:03}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use ultim_core::Resolution;

    fn cycle() -> ForecastCycle {
        ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 6).unwrap()
    }

    fn planner() -> FileSetPlanner {
        FileSetPlanner::new(CacheLayout::new("/cache"))
    }

    #[test]
    fn plan_starts_with_probe_and_follows_profile_order() {
        for resolution in [Resolution::Half, Resolution::Quarter] {
            let profile = FileSetProfile::for_resolution(resolution);
            let specs = planner().plan(&cycle(), &profile);
            assert_eq!(specs.len(), profile.len());
            assert!(specs[0].is_probe());
            let leads: Vec<u16> = specs.iter().map(|s| s.lead_hour).collect();
            assert_eq!(leads, profile.lead_hours());
        }
    }

    #[test]
    fn plan_is_deterministic() {
        let profile = FileSetProfile::for_resolution(Resolution::Half);
        assert_eq!(
            planner().plan(&cycle(), &profile),
            planner().plan(&cycle(), &profile)
        );
    }

    #[test]
    fn half_degree_url_is_fully_substituted() {
        let profile = FileSetProfile::for_resolution(Resolution::Half);
        let specs = planner().plan(&cycle(), &profile);
        let url = &specs[2].remote_url;
        assert_eq!(
            url,
            "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p50.pl?file=gfs.t06z.pgrb2full.0p50.f006&var_UGRD=on&var_VGRD=on&leftlon=0&rightlon=360&toplat=90&bottomlat=-90&dir=%2Fgfs.20240301%2F06%2Fatmos"
        );
    }

    #[test]
    fn custom_template_and_paths() {
        let profile =
            FileSetProfile::new("test", vec![0, 3], "http://archive.test/{res}/{date}/{hour}/f{lead}")
                .unwrap();
        let specs = planner().plan(&cycle(), &profile);
        assert_eq!(specs[1].remote_url, "http://archive.test/test/20240301/06/f003");
        assert_eq!(
            specs[1].local_path,
            PathBuf::from("/cache/gfs.test.20240301.t06z/gfs.test.20240301.t06z.f003.grib2")
        );
        let unique: std::collections::HashSet<_> = specs.iter().map(|s| &s.local_path).collect();
        assert_eq!(unique.len(), specs.len());
    }
}
