use crate::api::ApiSettings;
use crate::audio::DEFAULT_TRACK;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHome,

    #[error("No API key: pass --api-key or set RAPIDAPI_KEY")]
    MissingApiKey,
}

/// Where things live on disk.
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Paths {
    /// Platform directories, with the data directory optionally overridden.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let dirs = directories::ProjectDirs::from("com", "tjs-lounge", "bar-mix");
        match (data_dir, dirs) {
            (Some(data), Some(dirs)) => Ok(Self {
                data_dir: data,
                cache_dir: dirs.cache_dir().to_path_buf(),
            }),
            (Some(data), None) => Ok(Self {
                cache_dir: data.clone(),
                data_dir: data,
            }),
            (None, Some(dirs)) => Ok(Self {
                data_dir: dirs.data_dir().to_path_buf(),
                cache_dir: dirs.cache_dir().to_path_buf(),
            }),
            (None, None) => Err(ConfigError::NoHome),
        }
    }

    pub fn default_track(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_TRACK)
    }

    pub fn log_file(&self) -> PathBuf {
        self.cache_dir.join("bar-mix.log")
    }
}

/// Build API settings, failing early when the key is absent or blank.
pub fn api_settings(
    key: Option<&str>,
    host: &str,
    base_url: &str,
    timeout_secs: Option<u64>,
) -> Result<ApiSettings, ConfigError> {
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(ConfigError::MissingApiKey)?;
    Ok(ApiSettings {
        base_url: base_url.to_string(),
        host: host.to_string(),
        key: key.to_string(),
        timeout: timeout_secs.map(Duration::from_secs),
    })
}

pub fn track_or_default(track: Option<&Path>, paths: &Paths) -> PathBuf {
    track.map(Path::to_path_buf).unwrap_or_else(|| paths.default_track())
}
