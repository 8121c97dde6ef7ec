//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from, in priority order:
//! 1. Command-line arguments
//! 2. Environment variables (`MOCKLOG_ROOT_FOLDER`, then `MOCKLOG_ROOT`)
//! 3. TOML config file (`~/.config/mocklog/<module>.toml` unless overridden)
//! 4. Compiled defaults
//!
//! A missing or unreadable TOML file never stops startup: the defaults are
//! used and the caller is told why.

use crate::taxonomy::{ChapterKeywordTable, ChapterKeywords};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "MOCKLOG_ROOT_FOLDER";
/// Fallback root folder environment variable
pub const ROOT_ENV: &str = "MOCKLOG_ROOT";
/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "mocklog.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the record database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Address the HTTP server binds to
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Largest accepted import upload, in bytes
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Replacement chapter keyword table, in match order
    #[serde(default)]
    pub chapters: Option<Vec<ChapterKeywords>>,
}

/// Where [`TomlConfig::load_or_default`] got its values
#[derive(Debug)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// No config file; defaults used
    Missing,
    /// The file exists but could not be used; defaults used
    Broken(Error),
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file if present, otherwise defaults
    ///
    /// Read or parse failures are reported through [`ConfigOrigin::Broken`]
    /// rather than logged, so callers can load config before tracing exists.
    pub fn load_or_default(path: Option<&Path>) -> (Self, ConfigOrigin) {
        let Some(path) = path.filter(|p| p.exists()) else {
            return (Self::default(), ConfigOrigin::Missing);
        };

        match Self::load(path) {
            Ok(config) => (config, ConfigOrigin::File(path.to_path_buf())),
            Err(e) => (Self::default(), ConfigOrigin::Broken(e)),
        }
    }

    /// Chapter table from `[[chapters]]`, or the built-in table
    pub fn chapter_table(&self) -> Result<ChapterKeywordTable> {
        match &self.chapters {
            Some(entries) => ChapterKeywordTable::from_entries(entries.clone()),
            None => Ok(ChapterKeywordTable::builtin()),
        }
    }
}

/// Default TOML location for a module: `<config dir>/mocklog/<module>.toml`
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mocklog").join(format!("{}.toml", module_name)))
}

/// Built-in fallback values
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub port: u16,
    pub bind_address: String,
    pub max_upload_bytes: usize,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("mocklog"))
            .unwrap_or_else(|| PathBuf::from("./mocklog_data"));

        Self {
            root_folder,
            log_level: default_log_level(),
            log_file: None,
            port: 5790,
            bind_address: "127.0.0.1".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    /// Highest-priority override from the command line
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Use an already loaded TOML config instead of reading the module file
    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        let from_file = config_file_path(&self.module_name)
            .filter(|p| p.exists())
            .and_then(|p| TomlConfig::load(&p).ok())
            .and_then(|c| c.root_folder);
        if let Some(path) = from_file {
            return path;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Prepares the root folder and locates the database inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if missing; idempotent
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}
