use crate::linter::Severity;
use crate::rules::CalloutCategory;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for by [`LintConfig::find_and_load`]
pub const CONFIG_FILE_NAME: &str = ".apidocs-lint.toml";

/// Configuration for apidocs-lint loaded from .apidocs-lint.toml
#[derive(Debug, Default, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
    #[serde(default)]
    pub color: ColorConfig,
    #[serde(default)]
    pub lint: LintSettings,
    #[serde(default)]
    pub callouts: CalloutConfig,
    #[serde(default)]
    pub glossary: GlossaryConfig,
}

/// Color output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ColorConfig {
    /// Color mode: "auto" (default), "always", or "never"
    #[serde(default)]
    pub ui: ColorMode,
    #[serde(default = "default_error_color")]
    pub error: Color,
    #[serde(default = "default_warning_color")]
    pub warning: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            ui: ColorMode::Auto,
            error: default_error_color(),
            warning: default_warning_color(),
        }
    }
}

fn default_error_color() -> Color {
    Color::Red
}

fn default_warning_color() -> Color {
    Color::Yellow
}

/// Color mode for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Automatically detect (default) - respects NO_COLOR env and terminal detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl<'de> Deserialize<'de> for ColorMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(D::Error::custom(format!(
                "invalid color mode '{}', expected 'auto', 'always', or 'never'",
                s
            ))),
        }
    }
}

/// Terminal colors available for severity labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    pub const NAMES: &'static [&'static str] = &[
        "black",
        "red",
        "green",
        "yellow",
        "blue",
        "magenta",
        "cyan",
        "white",
        "bright_black",
        "bright_red",
        "bright_green",
        "bright_yellow",
        "bright_blue",
        "bright_magenta",
        "bright_cyan",
        "bright_white",
    ];
}

/// Configuration for a specific lint rule
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Report this rule's violations with a different severity
    pub severity: Option<Severity>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Settings for the file-level run
#[derive(Debug, Clone, Deserialize)]
pub struct LintSettings {
    /// Per-file time limit in milliseconds
    pub timeout_ms: Option<u64>,
    /// File extensions picked up when a directory is given
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

/// Callout glyph table and keyword heuristics
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalloutConfig {
    /// Replaces the built-in glyph table when set
    pub glyphs: Option<BTreeMap<String, CalloutCategory>>,
    /// Replaces the built-in severe keyword list when set
    pub severe_keywords: Option<Vec<String>>,
}

/// Glossary cross-reference settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlossaryConfig {
    /// When non-empty, only these type names are expected to be linked
    #[serde(default)]
    pub known_types: Vec<String>,
    /// Replaces the built-in list of words that look like types but are not
    pub ignore_words: Option<Vec<String>>,
}

/// A problem found by [`LintConfig::validate_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownField { path: String },
    UnknownRule { name: String },
    InvalidValue { path: String, message: String },
}

impl ValidationError {
    /// Top-level table the problem belongs to
    pub fn section(&self) -> &str {
        match self {
            ValidationError::UnknownRule { .. } => "rules",
            ValidationError::UnknownField { path } | ValidationError::InvalidValue { path, .. } => {
                path.split('.').next().unwrap_or(path)
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownField { path } => write!(f, "unknown field '{}'", path),
            ValidationError::UnknownRule { name } => write!(f, "unknown rule '{}'", name),
            ValidationError::InvalidValue { path, message } => {
                write!(f, "invalid value for '{}': {}", path, message)
            }
        }
    }
}

const TOP_LEVEL_KEYS: &[&str] = &["rules", "color", "lint", "callouts", "glossary"];
const RULE_KEYS: &[&str] = &["enabled", "severity"];
const COLOR_KEYS: &[&str] = &["ui", "error", "warning"];
const LINT_KEYS: &[&str] = &["timeout_ms", "extensions"];
const CALLOUT_KEYS: &[&str] = &["glyphs", "severe_keywords"];
const GLOSSARY_KEYS: &[&str] = &["known_types", "ignore_words"];

/// Commented default configuration written by `apidocs-lint config init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# apidocs-lint configuration

[color]
# "auto", "always" or "never"
ui = "auto"
error = "red"
warning = "yellow"

[lint]
# Give up on a single file after this many milliseconds
# timeout_ms = 5000
extensions = ["md", "mdx"]

# Disable a rule or change its severity:
#
# [rules.glossary-missing-link]
# enabled = false
#
# [rules.callout-glyph-mismatch]
# severity = "error"

[callouts]
# Glyph table. Categories: breaking, tip, config, destructive, optional
# glyphs = { "⚠️" = "breaking", "💡" = "tip", "⚙️" = "config", "💣" = "destructive", "🧩" = "optional" }
# severe_keywords = ["invalidated", "cancelled", "deleted", "irreversible"]

[glossary]
# Only these type names are expected to link to the glossary
# known_types = ["PassengerInfo", "BookingRequest"]
# ignore_words = ["JavaScript", "TypeScript", "GitHub"]
"#;

impl LintConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_str_at(&content, path)
    }

    fn from_str_at(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Find and load .apidocs-lint.toml from the given directory or its parents
    ///
    /// A config file that exists but cannot be loaded is an error.
    pub fn find_and_load(dir: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::find_path(dir) {
            Some(config_path) => Self::from_file(&config_path).map(Some),
            None => Ok(None),
        }
    }

    /// Path of the .apidocs-lint.toml governing `dir`, searching upward
    pub fn find_path(dir: &Path) -> Option<PathBuf> {
        let mut current = dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.rules.get(name).map(|r| r.enabled).unwrap_or(true)
    }

    /// Get the configuration for a specific rule
    pub fn get_rule_config(&self, name: &str) -> Option<&RuleConfig> {
        self.rules.get(name)
    }

    /// Get the color mode setting
    pub fn color_mode(&self) -> ColorMode {
        self.color.ui
    }

    /// Check a config file for unknown fields, unknown rules and bad values.
    ///
    /// Returns `Err` only if the file cannot be read or is not valid TOML.
    pub fn validate_file(path: &Path) -> Result<Vec<ValidationError>, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut errors = Vec::new();
        let known_rules = crate::docs::all_rule_names();

        for (key, item) in &value {
            if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
                errors.push(ValidationError::UnknownField { path: key.clone() });
                continue;
            }
            let Some(table) = item.as_table() else {
                errors.push(ValidationError::InvalidValue {
                    path: key.clone(),
                    message: "expected a table".to_string(),
                });
                continue;
            };
            match key.as_str() {
                "rules" => validate_rules(table, &known_rules, &mut errors),
                "color" => {
                    check_keys(table, COLOR_KEYS, key, &mut errors);
                    validate_colors(table, &mut errors);
                }
                "lint" => check_keys(table, LINT_KEYS, key, &mut errors),
                "callouts" => {
                    check_keys(table, CALLOUT_KEYS, key, &mut errors);
                    validate_glyphs(table, &mut errors);
                }
                "glossary" => check_keys(table, GLOSSARY_KEYS, key, &mut errors),
                _ => {}
            }
        }

        // Catch type errors (e.g. `enabled = "yes"`) the key checks above miss
        if errors.is_empty() {
            if let Err(e) = Self::from_str_at(&content, path) {
                errors.push(ValidationError::InvalidValue {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }

        Ok(errors)
    }
}

fn check_keys(table: &toml::Table, allowed: &[&str], prefix: &str, errors: &mut Vec<ValidationError>) {
    for key in table.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(ValidationError::UnknownField {
                path: format!("{}.{}", prefix, key),
            });
        }
    }
}

fn validate_rules(table: &toml::Table, known_rules: &[&str], errors: &mut Vec<ValidationError>) {
    for (name, rule) in table {
        if !known_rules.contains(&name.as_str()) {
            errors.push(ValidationError::UnknownRule { name: name.clone() });
            continue;
        }
        if let Some(rule_table) = rule.as_table() {
            check_keys(rule_table, RULE_KEYS, &format!("rules.{}", name), errors);
            if let Some(severity) = rule_table.get("severity").and_then(|s| s.as_str()) {
                if severity != "error" && severity != "warning" {
                    errors.push(ValidationError::InvalidValue {
                        path: format!("rules.{}.severity", name),
                        message: format!("'{}', expected 'error' or 'warning'", severity),
                    });
                }
            }
        }
    }
}

fn validate_colors(table: &toml::Table, errors: &mut Vec<ValidationError>) {
    for key in ["error", "warning"] {
        if let Some(color) = table.get(key).and_then(|c| c.as_str()) {
            if !Color::NAMES.contains(&color) {
                errors.push(ValidationError::InvalidValue {
                    path: format!("color.{}", key),
                    message: format!("unknown color '{}'", color),
                });
            }
        }
    }
}

fn validate_glyphs(table: &toml::Table, errors: &mut Vec<ValidationError>) {
    let Some(glyphs) = table.get("glyphs").and_then(|g| g.as_table()) else {
        return;
    };
    for (glyph, category) in glyphs {
        let valid = category
            .as_str()
            .is_some_and(|c| CalloutCategory::NAMES.contains(&c));
        if !valid {
            errors.push(ValidationError::InvalidValue {
                path: format!("callouts.glyphs.{}", glyph),
                message: format!(
                    "expected one of: {}",
                    CalloutCategory::NAMES.join(", ")
                ),
            });
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = LintConfig::default();
        assert!(config.is_rule_enabled("any-rule"));
        assert_eq!(config.lint.extensions, vec!["md", "mdx"]);
        assert_eq!(config.lint.timeout_ms, None);
    }

    #[test]
    fn test_parse_config() {
        let file = write_config(
            r#"
[rules.glossary-missing-link]
enabled = false

[rules.callout-glyph-mismatch]
severity = "error"

[lint]
timeout_ms = 2500
"#,
        );

        let config = LintConfig::from_file(file.path()).unwrap();

        assert!(!config.is_rule_enabled("glossary-missing-link"));
        assert!(config.is_rule_enabled("callout-glyph-mismatch"));
        assert!(config.is_rule_enabled("unknown-rule"));
        assert_eq!(
            config
                .get_rule_config("callout-glyph-mismatch")
                .unwrap()
                .severity,
            Some(Severity::Error)
        );
        assert_eq!(config.lint.timeout_ms, Some(2500));
    }

    #[test]
    fn test_empty_config() {
        let file = write_config("");
        let config = LintConfig::from_file(file.path()).unwrap();
        assert!(config.is_rule_enabled("any-rule"));
    }

    #[test]
    fn test_color_config() {
        let file = write_config("[color]\nui = \"never\"\nerror = \"bright_red\"\n");
        let config = LintConfig::from_file(file.path()).unwrap();
        assert_eq!(config.color_mode(), ColorMode::Never);
        assert_eq!(config.color.error, Color::BrightRed);
        assert_eq!(config.color.warning, Color::Yellow);
    }

    #[test]
    fn test_invalid_color_mode() {
        let file = write_config("[color]\nui = \"sometimes\"\n");
        let err = LintConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid color mode"));
    }

    #[test]
    fn test_callout_glyphs() {
        let file = write_config("[callouts]\nglyphs = { \"🚨\" = \"breaking\", \"📝\" = \"tip\" }\n");
        let config = LintConfig::from_file(file.path()).unwrap();
        let glyphs = config.callouts.glyphs.unwrap();
        assert_eq!(glyphs.get("🚨"), Some(&CalloutCategory::Breaking));
        assert_eq!(glyphs.get("📝"), Some(&CalloutCategory::Tip));
    }

    #[test]
    fn test_find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[rules.code-block-language]\nenabled = false\n",
        )
        .unwrap();
        let nested = dir.path().join("pages").join("v5");
        fs::create_dir_all(&nested).unwrap();

        let config = LintConfig::find_and_load(&nested).unwrap().unwrap();
        assert!(!config.is_rule_enabled("code-block-language"));
    }

    #[test]
    fn test_find_path() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pages");
        fs::create_dir_all(&nested).unwrap();
        assert!(LintConfig::find_path(&nested).is_none_or(|p| !p.starts_with(dir.path())));

        fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        assert_eq!(
            LintConfig::find_path(&nested),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn test_validation_error_section() {
        let unknown_rule = ValidationError::UnknownRule { name: "x".to_string() };
        assert_eq!(unknown_rule.section(), "rules");
        let glyph = ValidationError::InvalidValue {
            path: "callouts.glyphs.🔥".to_string(),
            message: "m".to_string(),
        };
        assert_eq!(glyph.section(), "callouts");
        let top = ValidationError::UnknownField { path: "theme".to_string() };
        assert_eq!(top.section(), "theme");
    }

    #[test]
    fn test_find_and_load_broken_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[rules\n").unwrap();
        assert!(LintConfig::find_and_load(dir.path()).is_err());
    }

    #[test]
    fn test_validate_file_reports_unknowns() {
        let file = write_config(
            r#"
unknown_section = 1

[rules.no-such-rule]
enabled = false

[rules.code-block-language]
enabeld = false

[rules.callout-icon-valid]
severity = "fatal"

[color]
error = "purple"

[callouts]
glyphs = { "🚨" = "scary" }
"#,
        );

        let errors = LintConfig::validate_file(file.path()).unwrap();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

        assert!(messages.contains(&"unknown field 'unknown_section'".to_string()));
        assert!(messages.contains(&"unknown rule 'no-such-rule'".to_string()));
        assert!(messages.contains(&"unknown field 'rules.code-block-language.enabeld'".to_string()));
        assert!(messages.iter().any(|m| m.contains("rules.callout-icon-valid.severity")));
        assert!(messages.iter().any(|m| m.contains("unknown color 'purple'")));
        assert!(messages.iter().any(|m| m.contains("callouts.glyphs.🚨")));
    }

    #[test]
    fn test_validate_default_template() {
        let file = write_config(DEFAULT_CONFIG_TEMPLATE);
        let errors = LintConfig::validate_file(file.path()).unwrap();
        assert!(errors.is_empty(), "template should validate: {:?}", errors);
    }
}
