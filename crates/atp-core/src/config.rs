// Configuration loading and parsing (config/dashboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ranking::TopN;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

/// Top-N choices offered on the individual stats page.
pub const INDIVIDUAL_TOP_N: &[TopN] = &[
    TopN::All,
    TopN::Top(5),
    TopN::Top(10),
    TopN::Top(25),
    TopN::Top(50),
];

/// Top-N choices offered on the win/loss page.
pub const WIN_LOSS_TOP_N: &[TopN] = &[TopN::All, TopN::Top(10), TopN::Top(25), TopN::Top(50)];

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub data: DataPaths,
    pub cache: CacheConfig,
    pub defaults: DefaultsConfig,
    pub thresholds: Thresholds,
}

/// Locations of the source tables. A `.gz` suffix means gzip-compressed CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub serve_ratings: String,
    pub return_ratings: String,
    pub pressure_ratings: String,
    pub player_stats: String,
    pub win_loss: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Seconds before the loaded tables are considered stale and reloaded.
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Players shown when nothing narrows a player chart.
    pub players: Vec<String>,
    pub individual_time: String,
    /// 0 means "All".
    pub individual_top_n: usize,
    /// 0 means "All".
    pub win_loss_top_n: usize,
    pub min_wins: u32,
}

impl DefaultsConfig {
    pub fn individual_top_n(&self) -> TopN {
        top_n_from_count(self.individual_top_n)
    }

    pub fn win_loss_top_n(&self) -> TopN {
        top_n_from_count(self.win_loss_top_n)
    }
}

/// Row-level cut-offs applied while loading.
#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    /// Per-stat rows with fewer matches are dropped.
    pub min_matches: u32,
    /// Win/loss rows with fewer decided matches (wins + losses) are dropped.
    pub min_decisions: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            min_matches: 5,
            min_decisions: 2,
        }
    }
}

fn top_n_from_count(n: usize) -> TopN {
    if n == 0 {
        TopN::All
    } else {
        TopN::Top(n)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<DashboardConfig, ConfigError> {
    let path = base_dir.join("config").join("dashboard.toml");
    let text = read_file(&path)?;
    let config: DashboardConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<DashboardConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &DashboardConfig) -> Result<(), ConfigError> {
    let data = &config.data;
    let path_fields: &[(&str, &str)] = &[
        ("data.serve_ratings", &data.serve_ratings),
        ("data.return_ratings", &data.return_ratings),
        ("data.pressure_ratings", &data.pressure_ratings),
        ("data.player_stats", &data.player_stats),
        ("data.win_loss", &data.win_loss),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "cache.ttl_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.thresholds.min_decisions == 0 {
        return Err(ConfigError::ValidationError {
            field: "thresholds.min_decisions".into(),
            message: "must be greater than 0".into(),
        });
    }

    let defaults = &config.defaults;
    if !INDIVIDUAL_TOP_N.contains(&defaults.individual_top_n()) {
        return Err(ConfigError::ValidationError {
            field: "defaults.individual_top_n".into(),
            message: format!(
                "must be one of 0, 5, 10, 25, 50, got {}",
                defaults.individual_top_n
            ),
        });
    }
    if !WIN_LOSS_TOP_N.contains(&defaults.win_loss_top_n()) {
        return Err(ConfigError::ValidationError {
            field: "defaults.win_loss_top_n".into(),
            message: format!(
                "must be one of 0, 10, 25, 50, got {}",
                defaults.win_loss_top_n
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
