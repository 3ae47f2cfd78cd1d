//! Resolution profiles: which lead times make up a complete forecast.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filter URL for the 0.50 degree archive (10 m winds, whole globe).
const HALF_DEGREE_URL_TEMPLATE: &str = "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p50.pl?file=gfs.t{hour}z.pgrb2full.0p50.f{lead}&var_UGRD=on&var_VGRD=on&leftlon=0&rightlon=360&toplat=90&bottomlat=-90&dir=%2Fgfs.{date}%2F{hour}%2Fatmos";

/// Filter URL for the hourly 0.25 degree archive (10 m winds, whole globe).
const QUARTER_DEGREE_URL_TEMPLATE: &str = "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p25_1hr.pl?file=gfs.t{hour}z.pgrb2.0p25.f{lead}&var_UGRD=on&var_VGRD=on&leftlon=0&rightlon=360&toplat=90&bottomlat=-90&dir=%2Fgfs.{date}%2F{hour}%2Fatmos";

/// Grid resolution of the downloaded forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// 0.50 degree grid, every 3 hours out to 144 hours.
    #[default]
    Half,
    /// 0.25 degree grid, hourly to 120 hours then every 3 hours to 384.
    Quarter,
}

impl Resolution {
    /// Tag used in cache paths and archive URLs.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Half => "0p50",
            Self::Quarter => "0p25",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Resolution {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0p50" | "half" => Ok(Self::Half),
            "0p25" | "quarter" => Ok(Self::Quarter),
            other => Err(ProfileError::UnknownResolution(other.to_string())),
        }
    }
}

/// Errors building a [`FileSetProfile`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// The profile has no lead hours at all.
    #[error("profile has no lead hours")]
    Empty,

    /// The first lead hour must be the analysis (probe) file.
    #[error("first lead hour must be 0, got {0}")]
    MissingProbe(u16),

    /// Lead hours must be strictly increasing.
    #[error("lead hours not strictly increasing at {previous} -> {next}")]
    NotIncreasing {
        /// The earlier value.
        previous: u16,
        /// The offending value.
        next: u16,
    },

    /// Unrecognized resolution tag.
    #[error("unknown resolution '{0}'")]
    UnknownResolution(String),
}

/// The set of lead times composing one complete forecast at a resolution.
///
/// Invariant: lead hours are non-empty, start at 0, and strictly increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFileSetProfile")]
pub struct FileSetProfile {
    resolution_tag: String,
    lead_hours: Vec<u16>,
    url_template: String,
}

/// Wire shape of [`FileSetProfile`], validated through `FileSetProfile::new`.
#[derive(Deserialize)]
struct RawFileSetProfile {
    resolution_tag: String,
    lead_hours: Vec<u16>,
    url_template: String,
}

impl TryFrom<RawFileSetProfile> for FileSetProfile {
    type Error = ProfileError;

    fn try_from(raw: RawFileSetProfile) -> Result<Self, Self::Error> {
        Self::new(raw.resolution_tag, raw.lead_hours, raw.url_template)
    }
}

impl FileSetProfile {
    /// Build a custom profile.
    ///
    /// The URL template may contain `{res}`, `{date}`, `{hour}` and `{lead}`
    /// placeholders.
    pub fn new(
        resolution_tag: impl Into<String>,
        lead_hours: Vec<u16>,
        url_template: impl Into<String>,
    ) -> Result<Self, ProfileError> {
        validate_lead_hours(&lead_hours)?;
        Ok(Self {
            resolution_tag: resolution_tag.into(),
            lead_hours,
            url_template: url_template.into(),
        })
    }

    /// The built-in profile for a resolution.
    #[must_use]
    pub fn for_resolution(resolution: Resolution) -> Self {
        let (lead_hours, url_template): (Vec<u16>, _) = match resolution {
            Resolution::Half => ((0..=144).step_by(3).collect(), HALF_DEGREE_URL_TEMPLATE),
            Resolution::Quarter => (
                (0..=120).chain((123..=384).step_by(3)).collect(),
                QUARTER_DEGREE_URL_TEMPLATE,
            ),
        };

        Self {
            resolution_tag: resolution.tag().to_string(),
            lead_hours,
            url_template: url_template.to_string(),
        }
    }

    /// Tag used in cache paths and URLs (e.g. `0p50`).
    pub fn resolution_tag(&self) -> &str {
        &self.resolution_tag
    }

    /// Ordered lead hours; the first one is always 0.
    pub fn lead_hours(&self) -> &[u16] {
        &self.lead_hours
    }

    /// Remote URL template.
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Number of files in a complete set.
    pub fn len(&self) -> usize {
        self.lead_hours.len()
    }

    /// Always false for a validated profile.
    pub fn is_empty(&self) -> bool {
        self.lead_hours.is_empty()
    }
}

impl From<Resolution> for FileSetProfile {
    fn from(resolution: Resolution) -> Self {
        Self::for_resolution(resolution)
    }
}

fn validate_lead_hours(lead_hours: &[u16]) -> Result<(), ProfileError> {
    match lead_hours.first() {
        None => return Err(ProfileError::Empty),
        Some(&first) if first != 0 => return Err(ProfileError::MissingProbe(first)),
        Some(_) => {}
    }

    if let Some(pair) = lead_hours.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(ProfileError::NotIncreasing {
            previous: pair[0],
            next: pair[1],
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_degree_profile_is_every_three_hours() {
        let profile = FileSetProfile::for_resolution(Resolution::Half);
        assert_eq!(profile.resolution_tag(), "0p50");
        assert_eq!(profile.len(), 49);
        assert_eq!(profile.lead_hours()[..3], [0, 3, 6]);
        assert_eq!(profile.lead_hours().last(), Some(&144));
    }

    #[test]
    fn quarter_degree_profile_switches_to_three_hourly_after_120() {
        let profile = FileSetProfile::for_resolution(Resolution::Quarter);
        assert_eq!(profile.len(), 121 + 88);
        let lead = profile.lead_hours();
        assert_eq!(lead[120], 120);
        assert_eq!(lead[121], 123);
        assert_eq!(lead.last(), Some(&384));
    }

    #[test]
    fn built_in_profiles_satisfy_invariant() {
        for resolution in [Resolution::Half, Resolution::Quarter] {
            let profile = FileSetProfile::for_resolution(resolution);
            assert!(validate_lead_hours(profile.lead_hours()).is_ok());
        }
    }

    #[test]
    fn custom_profile_validation() {
        assert_eq!(
            FileSetProfile::new("x", vec![], "u").unwrap_err(),
            ProfileError::Empty
        );
        assert_eq!(
            FileSetProfile::new("x", vec![3, 6], "u").unwrap_err(),
            ProfileError::MissingProbe(3)
        );
        assert_eq!(
            FileSetProfile::new("x", vec![0, 6, 6], "u").unwrap_err(),
            ProfileError::NotIncreasing {
                previous: 6,
                next: 6
            }
        );
        assert!(FileSetProfile::new("x", vec![0, 3, 6], "u").is_ok());
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let profile = FileSetProfile::new("test", vec![0, 3], "http://x/{lead}").unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(
            serde_json::from_str::<FileSetProfile>(&json).unwrap(),
            profile
        );

        let err = serde_json::from_str::<FileSetProfile>(
            r#"{"resolution_tag":"test","lead_hours":[3,6],"url_template":"u"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("first lead hour must be 0"));

        assert!(
            serde_json::from_str::<FileSetProfile>(
                r#"{"resolution_tag":"test","lead_hours":[],"url_template":"u"}"#,
            )
            .is_err()
        );
    }

    #[test]
    fn resolution_parsing() {
        assert_eq!("0p25".parse::<Resolution>(), Ok(Resolution::Quarter));
        assert_eq!("HALF".parse::<Resolution>(), Ok(Resolution::Half));
        assert!("1p00".parse::<Resolution>().is_err());
    }
}
