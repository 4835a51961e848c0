use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::allocine::{CONFIG_DESCRIPTION, CONFIG_NAME, CONFIG_VERSION};
use crate::constants::download::{CACHE_DIR_ENV, DEFAULT_CACHE_DIR, PROGRESS_INTERVAL_SECS};
use crate::errors::LoaderError;
use crate::types::DatasetName;

/// Semantic `major.minor.patch` version of a builder config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = LoaderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(LoaderError::Configuration(format!(
                "version '{raw}' must have the form major.minor.patch"
            )));
        }
        let parse = |part: &str| {
            part.parse::<u32>().map_err(|_| {
                LoaderError::Configuration(format!(
                    "version '{raw}' has non-numeric component '{part}'"
                ))
            })
        };
        Ok(Self {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: parse(parts[2])?,
        })
    }
}

/// Named, versioned configuration of a dataset builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Registration name.
    pub name: DatasetName,
    /// Config version.
    pub version: Version,
    /// Short human-readable description.
    pub description: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            name: CONFIG_NAME.to_string(),
            version: CONFIG_VERSION,
            description: CONFIG_DESCRIPTION.to_string(),
        }
    }
}

/// Settings for `HttpDownloadManager`.
#[derive(Clone, Debug)]
pub struct DownloadConfig {
    /// Directory holding cached archives and their sidecars.
    pub cache_dir: PathBuf,
    /// Ignore cached archives and always fetch again.
    pub force_redownload: bool,
    /// Minimum time between download progress log lines.
    pub progress_interval: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            force_redownload: false,
            progress_interval: Duration::from_secs(PROGRESS_INTERVAL_SECS),
        }
    }
}

impl DownloadConfig {
    /// Create a config caching under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ..Self::default()
        }
    }

    /// Default config with the cache directory taken from `ALLOCINE_CACHE_DIR` when set.
    pub fn from_env() -> Self {
        match env::var_os(CACHE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    /// Override whether cached archives are ignored.
    pub fn with_force_redownload(mut self, force_redownload: bool) -> Self {
        self.force_redownload = force_redownload;
        self
    }

    /// Override the progress log interval.
    pub fn with_progress_interval(mut self, progress_interval: Duration) -> Self {
        self.progress_interval = progress_interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_round_trips_through_display() {
        let version: Version = "1.0.0".parse().unwrap();
        assert_eq!(version, Version::new(1, 0, 0));
        assert_eq!(version.to_string(), "1.0.0");
    }

    #[test]
    fn version_rejects_malformed_strings() {
        assert!("1.0".parse::<Version>().is_err());
        assert!("1.x.0".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn default_builder_config_names_allocine() {
        let config = BuilderConfig::default();
        assert_eq!(config.name, "allocine");
        assert_eq!(config.version, Version::new(1, 0, 0));
        assert!(config.description.contains("French Movie Reviews"));
    }

    #[test]
    fn download_config_builders_override_defaults() {
        let config = DownloadConfig::new("/tmp/allocine")
            .with_force_redownload(true)
            .with_progress_interval(Duration::from_millis(250));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/allocine"));
        assert!(config.force_redownload);
        assert_eq!(config.progress_interval, Duration::from_millis(250));
    }
}
