//! Persisted run settings.
//!
//! Settings live in a small INI file with a single `General` section:
//!
//! ```ini
//! [General]
//! SkipFileTypes=log,ini
//! OverwriteExistingFiles=False
//! LogLevel=INFO
//! ```
//!
//! The file is created with defaults the first time it is missing, then only read.
//! Keys are matched case-insensitively; absent keys keep their default value.

use ini::Ini;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings file name, resolved against the current working directory.
pub const SETTINGS_FILE: &str = "organize_config.ini";

const SECTION: &str = "General";
const KEY_SKIP: &str = "SkipFileTypes";
const KEY_OVERWRITE: &str = "OverwriteExistingFiles";
const KEY_LOG_LEVEL: &str = "LogLevel";

/// Errors that can occur while loading or initializing the settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The settings file is not valid INI.
    Parse { path: PathBuf, reason: String },
    /// A recognized key holds a value that cannot be interpreted.
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Cannot access settings file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, reason } => {
                write!(f, "Invalid settings file {}: {}", path.display(), reason)
            }
            ConfigError::InvalidValue {
                key,
                value,
                expected,
            } => write!(
                f,
                "Invalid value '{}' for {}: expected {}",
                value, key, expected
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Verbosity of the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The canonical upper-case name written to the settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidValue {
                key: KEY_LOG_LEVEL,
                value: s.to_string(),
                expected: "one of DEBUG, INFO, WARNING, ERROR, CRITICAL",
            }),
        }
    }
}

/// Settings consumed by a single organize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Lower-case extensions, without leading dot, that are never touched.
    pub skip_extensions: BTreeSet<String>,
    /// Replace an existing file at the destination instead of renaming.
    pub overwrite_existing: bool,
    pub log_level: LogLevel,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            skip_extensions: ["log", "ini"].iter().map(|s| s.to_string()).collect(),
            overwrite_existing: false,
            log_level: LogLevel::Info,
        }
    }
}

impl Configuration {
    /// Builds a configuration from a comma-separated skip list.
    ///
    /// Entries are trimmed, lower-cased and stripped of leading dots; empty entries
    /// are dropped.
    pub fn with_skip_list(mut self, list: &str) -> Self {
        self.skip_extensions = parse_skip_list(list);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Returns true if files with this (already normalized) extension are skipped.
    pub fn skips(&self, extension: &str) -> bool {
        self.skip_extensions.contains(extension)
    }

    /// Parses settings from INI text. Missing keys keep their defaults.
    fn from_ini(ini: &Ini) -> ConfigResult<Self> {
        let mut config = Self::default();

        let Some(section) = ini.section(Some(SECTION)) else {
            return Ok(config);
        };

        if let Some(list) = section.get(KEY_SKIP) {
            config.skip_extensions = parse_skip_list(list);
        }
        if let Some(value) = section.get(KEY_OVERWRITE) {
            config.overwrite_existing = parse_bool(KEY_OVERWRITE, value)?;
        }
        if let Some(value) = section.get(KEY_LOG_LEVEL) {
            config.log_level = value.parse()?;
        }

        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let skip = self
            .skip_extensions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let overwrite = if self.overwrite_existing { "True" } else { "False" };

        let mut ini = Ini::new();
        ini.with_section(Some(SECTION))
            .set(KEY_SKIP, skip)
            .set(KEY_OVERWRITE, overwrite)
            .set(KEY_LOG_LEVEL, self.log_level.as_str());
        ini
    }

    /// Writes this configuration to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

/// Loads `organize_config.ini` from the current working directory, creating it
/// with defaults if it does not exist.
pub fn load_config() -> ConfigResult<Configuration> {
    load_config_from(Path::new(SETTINGS_FILE))
}

/// Loads settings from `path`, creating the file with defaults if it is missing.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read or the default file cannot
/// be written, `ConfigError::Parse` for malformed INI, and
/// `ConfigError::InvalidValue` when a recognized key has an unusable value.
pub fn load_config_from(path: &Path) -> ConfigResult<Configuration> {
    if !path.exists() {
        let config = Configuration::default();
        config.save(path)?;
        return Ok(config);
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let ini = Ini::load_from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Configuration::from_ini(&ini)
}

fn parse_skip_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn parse_bool(key: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a boolean (true/false, yes/no, on/off, 1/0)",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(SETTINGS_FILE);

        let config = load_config_from(&path).expect("Failed to load config");

        assert_eq!(config, Configuration::default());
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap().to_lowercase();
        assert!(written.contains("[general]"));
        assert!(written.contains("skipfiletypes=ini,log"));
        assert!(written.contains("overwriteexistingfiles=false"));
        assert!(written.contains("loglevel=info"));
    }

    #[test]
    fn test_written_defaults_reload_identically() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);

        let first = load_config_from(&path).unwrap();
        let second = load_config_from(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reads_lowercase_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            "[General]\nskipfiletypes = TMP, .bak ,\noverwriteexistingfiles = yes\nloglevel = debug\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();

        let expected: BTreeSet<String> = ["bak", "tmp"].iter().map(|s| s.to_string()).collect();
        assert_eq!(config.skip_extensions, expected);
        assert!(config.overwrite_existing);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[General]\nLogLevel=ERROR\n").unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.skip_extensions, Configuration::default().skip_extensions);
        assert!(!config.overwrite_existing);
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_missing_section_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[Other]\nkey=value\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_invalid_boolean_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[General]\nOverwriteExistingFiles=maybe\n").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: KEY_OVERWRITE,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[General]\nLogLevel=LOUD\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("LOUD"));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[General\nLogLevel=INFO\n").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("CRITICAL".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert!("trace".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_skip_list_normalization() {
        let config = Configuration::default().with_skip_list(" .LOG, ini,,Tmp ");
        assert!(config.skips("log"));
        assert!(config.skips("ini"));
        assert!(config.skips("tmp"));
        assert!(!config.skips(""));
        assert_eq!(config.skip_extensions.len(), 3);
    }

    #[test]
    fn test_save_roundtrip_with_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.ini");
        let config = Configuration::default()
            .with_skip_list("bak")
            .with_overwrite(true)
            .with_log_level(LogLevel::Warning);

        config.save(&path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }
}
