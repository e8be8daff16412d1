use std::{fs, path::Path, path::PathBuf};

use jiff::civil::{date, Date};
use serde::Deserialize;
use thiserror::Error;

use crate::interval::date_range::{DateRange, DateRangeError};

pub const DEFAULT_BASE_URL: &str = "http://content.caiso.com/green/renewrpt";

/// Environment variable with the base url, used when there is no config file.
pub const BASE_URL_ENV: &str = "CAISO_RENEWABLES_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed reading config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    #[error("base url is empty")]
    EmptyBaseUrl,
}

/// Which files get written at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputVariant {
    /// Only the hourly data, as `caiso_daily_renewables_watch_<start>_<end>.csv`
    #[default]
    Simple,
    /// Hourly data and daily totals
    Extended,
}

/// What to do when the report for a day can't be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the run on the first bad day, nothing gets written.
    #[default]
    FailFast,
    /// Log a warning, leave the day out and keep going.
    SkipMissing,
}

/// Settings given on the command line.  They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub base_url: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub extended: bool,
    pub skip_missing: bool,
    /// 0 means no timeout
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub start_date: Date,
    pub end_date: Date,
    pub base_url: String,
    pub out_dir: PathBuf,
    pub variant: OutputVariant,
    pub policy: FailurePolicy,
    /// Per request timeout, `None` to wait forever.
    pub timeout_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            start_date: date(2020, 1, 1),
            end_date: date(2020, 12, 31),
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from("data"),
            variant: OutputVariant::Simple,
            policy: FailurePolicy::FailFast,
            timeout_secs: Some(60),
        }
    }
}

impl RunConfig {
    /// Load from a json file.  Missing fields take their default value.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the configuration before any download happens.
    pub fn validate(&self) -> Result<DateRange, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(DateRange::checked(self.start_date, self.end_date)?)
    }

    /// Build the configuration of a run.  From highest to lowest precedence:
    /// the overrides, the config file, `env_base_url` (ignored when there is
    /// a config file), the defaults.
    pub fn resolve(
        file: Option<&Path>,
        env_base_url: Option<String>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => RunConfig::from_json_file(path)?,
            None => {
                let mut config = RunConfig::default();
                if let Some(base_url) = env_base_url {
                    config.base_url = base_url;
                }
                config
            }
        };
        config.apply(overrides);
        Ok(config)
    }

    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(start) = overrides.start_date {
            self.start_date = start;
        }
        if let Some(end) = overrides.end_date {
            self.end_date = end;
        }
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.out_dir = out_dir.clone();
        }
        if overrides.extended {
            self.variant = OutputVariant::Extended;
        }
        if overrides.skip_missing {
            self.policy = FailurePolicy::SkipMissing;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = if secs == 0 { None } else { Some(secs) };
        }
    }
}
