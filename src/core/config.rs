//! Configuration module for `course_selection`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the application config directory in path-like values.
const DIR_VARIABLE: &str = "$COURSE_SELECT";

/// Submission attempts when `[submission] attempts` is absent
pub const DEFAULT_ATTEMPTS: u32 = 5;
/// Base backoff when `[submission] base_delay_ms` is absent
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;
/// Jitter bound when `[submission] jitter_ms` is absent
pub const DEFAULT_JITTER_MS: u64 = 100;

const fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

const fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}

const fn default_jitter_ms() -> u64 {
    DEFAULT_JITTER_MS
}

const fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Course catalog source: a JSON file path or an `http(s)://` URL
    #[serde(default)]
    pub catalog: String,
    /// Directory holding persisted selection snapshots
    #[serde(default)]
    pub state_dir: String,
    /// Fixed identifier the snapshot is stored under
    #[serde(default)]
    pub state_key: String,
    /// Directory for exported confirmation documents
    #[serde(default)]
    pub exports_dir: String,
}

/// Remote submission configuration
///
/// Absent numbers take the built-in defaults; an explicit `0` is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Endpoint receiving the JSON POST; empty disables submission
    #[serde(default)]
    pub endpoint: String,
    /// Total number of attempts
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Base backoff delay in milliseconds, doubled per attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound of the random jitter added to each delay, in milliseconds
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            attempts: DEFAULT_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            jitter_ms: DEFAULT_JITTER_MS,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default document format (markdown, html, pdf)
    #[serde(default)]
    pub format: String,
    /// Chrome/Chromium command used for PDF conversion; empty means auto-detect
    #[serde(default)]
    pub pdf_converter: String,
}

/// A fixed set of course ids that must be selected exactly `count` times
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactCategoryConfig {
    /// Human-readable category label used in messages
    #[serde(default)]
    pub label: String,
    /// Member course ids
    #[serde(default)]
    pub course_ids: Vec<String>,
    /// Required number of selected members
    #[serde(default)]
    pub count: usize,
}

/// A fixed set of course ids of which at most `max` may be selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxCategoryConfig {
    /// Human-readable category label used in messages
    #[serde(default)]
    pub label: String,
    /// Member course ids
    #[serde(default)]
    pub course_ids: Vec<String>,
    /// Maximum number of selected members
    #[serde(default)]
    pub max: usize,
}

/// Selection rules
///
/// A category table that is absent is filled from the defaults on load; one
/// written with `course_ids = []` stays empty and disables its rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Reserved group name marking school-designated (mandatory) groups
    #[serde(default)]
    pub mandatory_group: String,
    /// Whether the student identifier must be filled in
    #[serde(default = "default_true")]
    pub require_student_id: bool,
    /// Required credit total per slot, keyed by slot key (e.g. `Y2S1`)
    #[serde(default)]
    pub required_hours: BTreeMap<String, u32>,
    /// Exact-count fixed category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_category: Option<ExactCategoryConfig>,
    /// Max-count fixed category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_category: Option<MaxCategoryConfig>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            mandatory_group: String::new(),
            require_student_id: true,
            required_hours: BTreeMap::new(),
            exact_category: None,
            max_category: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Submission settings
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Selection rules
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override catalog source
    pub catalog: Option<String>,
    /// Override snapshot directory
    pub state_dir: Option<String>,
    /// Override exports directory
    pub exports_dir: Option<String>,
    /// Override submission endpoint
    pub endpoint: Option<String>,
}

fn merge_string(target: &mut String, default: &str) -> bool {
    if target.is_empty() && !default.is_empty() {
        default.clone_into(target);
        true
    } else {
        false
    }
}

fn merge_table<T: Clone>(target: &mut Option<T>, default: Option<&T>) -> bool {
    match (target.as_ref(), default) {
        (None, Some(default)) => {
            *target = Some(default.clone());
            true
        }
        _ => false,
    }
}

impl Config {
    /// Get the `$COURSE_SELECT` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/courseselect`
    /// - macOS: `~/Library/Application Support/courseselect`
    /// - Windows: `%APPDATA%\courseselect`
    #[must_use]
    pub fn get_app_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("courseselect")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used on load so that fields added in newer versions get their default
    /// values while existing user settings are preserved. Only string fields
    /// that are empty here and non-empty in `defaults` are updated. The credit
    /// table is copied when empty, category tables only when absent. Numbers and
    /// flags get their defaults from serde at parse time, so explicit values
    /// such as `jitter_ms = 0` are never touched.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        changed |= merge_string(&mut self.logging.level, &defaults.logging.level);
        changed |= merge_string(&mut self.logging.file, &defaults.logging.file);

        changed |= merge_string(&mut self.paths.catalog, &defaults.paths.catalog);
        changed |= merge_string(&mut self.paths.state_dir, &defaults.paths.state_dir);
        changed |= merge_string(&mut self.paths.state_key, &defaults.paths.state_key);
        changed |= merge_string(&mut self.paths.exports_dir, &defaults.paths.exports_dir);

        changed |= merge_string(&mut self.export.format, &defaults.export.format);

        changed |= merge_string(&mut self.rules.mandatory_group, &defaults.rules.mandatory_group);
        // No slot would be validated without a credit table
        if self.rules.required_hours.is_empty() && !defaults.rules.required_hours.is_empty() {
            self.rules
                .required_hours
                .clone_from(&defaults.rules.required_hours);
            changed = true;
        }
        changed |= merge_table(
            &mut self.rules.exact_category,
            defaults.rules.exact_category.as_ref(),
        );
        changed |= merge_table(
            &mut self.rules.max_category,
            defaults.rules.max_category.as_ref(),
        );

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the config file is not
    /// touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(catalog) = &overrides.catalog {
            self.paths.catalog.clone_from(catalog);
        }
        if let Some(state_dir) = &overrides.state_dir {
            self.paths.state_dir.clone_from(state_dir);
        }
        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir.clone_from(exports_dir);
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.submission.endpoint.clone_from(endpoint);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_app_dir`](Self::get_app_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_app_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$COURSE_SELECT` to the application config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let app_dir = Self::get_app_dir();
            value.replace(DIR_VARIABLE, app_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults; `$COURSE_SELECT` is expanded in
    /// path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog = Self::expand_variables(&config.paths.catalog);
        config.paths.state_dir = Self::expand_variables(&config.paths.state_dir);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults
    /// are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from defaults and
    ///   saves the result when anything was added.
    /// - On first run: creates the config directory and writes the defaults.
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created, the config
    /// cannot be serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `catalog`, `state_dir`,
    /// `state_key`, `exports_dir`, `endpoint`, `attempts`, `base_delay_ms`,
    /// `jitter_ms`, `format`, `pdf_converter`, `mandatory_group`,
    /// `require_student_id`. Rule tables are edited in the TOML file directly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog" => Some(self.paths.catalog.clone()),
            "state_dir" | "state-dir" => Some(self.paths.state_dir.clone()),
            "state_key" | "state-key" => Some(self.paths.state_key.clone()),
            "exports_dir" | "exports-dir" => Some(self.paths.exports_dir.clone()),
            "endpoint" => Some(self.submission.endpoint.clone()),
            "attempts" => Some(self.submission.attempts.to_string()),
            "base_delay_ms" => Some(self.submission.base_delay_ms.to_string()),
            "jitter_ms" => Some(self.submission.jitter_ms.to_string()),
            "format" => Some(self.export.format.clone()),
            "pdf_converter" => Some(self.export.pdf_converter.clone()),
            "mandatory_group" => Some(self.rules.mandatory_group.clone()),
            "require_student_id" => Some(self.rules.require_student_id.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be
    /// parsed for that key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_value(key, value)?,
            "catalog" => self.paths.catalog = value.to_string(),
            "state_dir" | "state-dir" => self.paths.state_dir = value.to_string(),
            "state_key" | "state-key" => self.paths.state_key = value.to_string(),
            "exports_dir" | "exports-dir" => self.paths.exports_dir = value.to_string(),
            "endpoint" => self.submission.endpoint = value.to_string(),
            "attempts" => self.submission.attempts = parse_value(key, value)?,
            "base_delay_ms" => self.submission.base_delay_ms = parse_value(key, value)?,
            "jitter_ms" => self.submission.jitter_ms = parse_value(key, value)?,
            "format" => self.export.format = value.to_string(),
            "pdf_converter" => self.export.pdf_converter = value.to_string(),
            "mandatory_group" => self.rules.mandatory_group = value.to_string(),
            "require_student_id" => self.rules.require_student_id = parse_value(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog" => self.paths.catalog.clone_from(&defaults.paths.catalog),
            "state_dir" | "state-dir" => self.paths.state_dir.clone_from(&defaults.paths.state_dir),
            "state_key" | "state-key" => self.paths.state_key.clone_from(&defaults.paths.state_key),
            "exports_dir" | "exports-dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "endpoint" => self
                .submission
                .endpoint
                .clone_from(&defaults.submission.endpoint),
            "attempts" => self.submission.attempts = defaults.submission.attempts,
            "base_delay_ms" => self.submission.base_delay_ms = defaults.submission.base_delay_ms,
            "jitter_ms" => self.submission.jitter_ms = defaults.submission.jitter_ms,
            "format" => self.export.format.clone_from(&defaults.export.format),
            "pdf_converter" => self
                .export
                .pdf_converter
                .clone_from(&defaults.export.pdf_converter),
            "mandatory_group" => self
                .rules
                .mandatory_group
                .clone_from(&defaults.rules.mandatory_group),
            "require_student_id" => {
                self.rules.require_student_id = defaults.rules.require_student_id;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog = \"{}\"", self.paths.catalog)?;
        writeln!(f, "  state_dir = \"{}\"", self.paths.state_dir)?;
        writeln!(f, "  state_key = \"{}\"", self.paths.state_key)?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        writeln!(f, "\n[submission]")?;
        writeln!(f, "  endpoint = \"{}\"", self.submission.endpoint)?;
        writeln!(f, "  attempts = {}", self.submission.attempts)?;
        writeln!(f, "  base_delay_ms = {}", self.submission.base_delay_ms)?;
        writeln!(f, "  jitter_ms = {}", self.submission.jitter_ms)?;

        writeln!(f, "\n[export]")?;
        writeln!(f, "  format = \"{}\"", self.export.format)?;
        writeln!(f, "  pdf_converter = \"{}\"", self.export.pdf_converter)?;

        writeln!(f, "\n[rules]")?;
        writeln!(f, "  mandatory_group = \"{}\"", self.rules.mandatory_group)?;
        writeln!(f, "  require_student_id = {}", self.rules.require_student_id)?;
        for (slot, hours) in &self.rules.required_hours {
            writeln!(f, "  required_hours.{slot} = {hours}")?;
        }
        match &self.rules.exact_category {
            Some(exact) if !exact.course_ids.is_empty() => writeln!(
                f,
                "  exact_category = \"{}\" (exactly {} of {})",
                exact.label,
                exact.count,
                exact.course_ids.join(", ")
            )?,
            _ => writeln!(f, "  exact_category = (disabled)")?,
        }
        match &self.rules.max_category {
            Some(max) if !max.course_ids.is_empty() => writeln!(
                f,
                "  max_category = \"{}\" (at most {} of {})",
                max.label,
                max.max,
                max.course_ids.join(", ")
            )?,
            _ => writeln!(f, "  max_category = (disabled)")?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_fills_only_empty_fields() {
        let defaults = Config::from_defaults();
        let mut config = Config::from_toml("[logging]\nlevel = \"error\"\n").unwrap();

        assert!(config.merge_defaults(&defaults));
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.paths.state_key, defaults.paths.state_key);
        assert_eq!(config.submission.attempts, defaults.submission.attempts);
        assert_eq!(config.rules.required_hours, defaults.rules.required_hours);

        // A second merge has nothing left to add
        assert!(!config.merge_defaults(&defaults));
    }

    #[test]
    fn test_merge_keeps_explicit_zero_and_empty_categories() {
        let defaults = Config::from_defaults();
        let mut config = Config::from_toml(
            r#"
[submission]
base_delay_ms = 0
jitter_ms = 0

[rules]
require_student_id = false

[rules.exact_category]
label = "Art/Music"
course_ids = []
count = 2
"#,
        )
        .unwrap();

        assert!(config.merge_defaults(&defaults));
        assert_eq!(config.submission.base_delay_ms, 0);
        assert_eq!(config.submission.jitter_ms, 0);
        assert_eq!(config.submission.attempts, DEFAULT_ATTEMPTS);
        assert!(!config.rules.require_student_id);
        assert_eq!(config.rules.required_hours, defaults.rules.required_hours);
        assert_eq!(
            config.rules.exact_category.as_ref().map(|exact| exact.course_ids.len()),
            Some(0)
        );
        assert_eq!(config.rules.max_category, defaults.rules.max_category);
    }

    #[test]
    fn test_explicit_values_survive_save_round_trip() {
        let mut config = Config::from_toml(
            "[submission]\njitter_ms = 0\n\n[rules.max_category]\ncourse_ids = []\n",
        )
        .unwrap();
        config.merge_defaults(&Config::from_defaults());

        let reparsed = Config::from_toml(&toml::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(reparsed.submission.jitter_ms, 0);
        assert_eq!(
            reparsed.rules.max_category.map(|max| max.course_ids),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_set_rejects_bad_numbers() {
        let mut config = Config::from_defaults();
        assert!(config.set("attempts", "three").is_err());
        assert!(config.set("require_student_id", "maybe").is_err());
        config.set("attempts", "3").unwrap();
        assert_eq!(config.submission.attempts, 3);
    }
}
