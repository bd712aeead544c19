//! Configuration file discovery and loading

use super::BuilderConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Config file names, in priority order within one directory
pub const CONFIG_FILE_NAMES: &[&str] = &[".weftrc.json", ".weftrc.toml"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Looks for `.weftrc.json`, then `.weftrc.toml`, in each directory until
    /// one is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path.canonicalize().map_err(|source| ConfigError::Io {
            path: start_path.to_path_buf(),
            source,
        })?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// `.json` files may contain comments and trailing commas.
    pub fn load_from_file(path: &Path) -> Result<BuilderConfig> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = Self::read(path)?;
                json5::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            Some("toml") => {
                let content = Self::read(path)?;
                toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load config from `custom_path`, or auto-discover from `start_dir`
    ///
    /// An explicit path that does not exist is an error. When nothing is
    /// discovered the defaults apply.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<BuilderConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(BuilderConfig::default())
            }
        }
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
