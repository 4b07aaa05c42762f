// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::api_client::DEFAULT_BASE_URL;
use crate::logging::{LogConfig, LogLevel};
use crate::session::DEFAULT_PAGE_SIZE;

pub const CONFIG_FILE_NAME: &str = "easel.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("page_size must be at least 1")]
    PageSize,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub log: LogSettings,
    pub colors: ColorConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LogSettings {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}

/// RGB triplets for the table theme.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ColorConfig {
    pub default_bg: [u8; 3],
    pub text: [u8; 3],
    pub header_row: [u8; 3],
    pub checked: [u8; 3],
    pub cursor_fg: [u8; 3],
    pub cursor_bg: [u8; 3],
    pub border: [u8; 3],
    pub border_focus: [u8; 3],
    pub popover_bg: [u8; 3],
    pub status_fg: [u8; 3],
    pub error_fg: [u8; 3],
    pub info_fg: [u8; 3],
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            default_bg:   [ 22,  22,  22],
            text:         [200, 200, 200],
            header_row:   [126, 156, 216],
            checked:      [152, 187, 108],
            cursor_fg:    [ 22,  22,  22],
            cursor_bg:    [149, 127, 184],
            border:       [ 84,  84, 109],
            border_focus: [210, 126, 153],
            popover_bg:   [ 30,  31,  40],
            status_fg:    [230, 195, 132],
            error_fg:     [232,  36,  36],
            info_fg:      [122, 168, 159],
        }
    }
}

impl Config {
    /// First `easel.toml` found next to the executable, then in the
    /// platform config dir. No file at all means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        if cfg.api.page_size == 0 {
            return Err(ConfigError::PageSize);
        }
        Ok(cfg)
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }
        if let Some(dirs) = project_dirs() {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Log target for the TUI: the configured file, else `easel.log` in the
    /// platform data dir.
    pub fn tui_log_config(&self) -> LogConfig {
        let file = self.log.file.clone().or_else(|| {
            project_dirs().map(|d| d.data_local_dir().join("easel.log"))
        });
        LogConfig { level: self.log.level, file }
    }

    pub fn batch_log_config(&self) -> LogConfig {
        LogConfig { level: self.log.level, file: self.log.file.clone() }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "easel")
}
