//! Configuration management for mathdir.
//!
//! Parses `mathdir.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [equations]
//! default_direction = "rtl"
//!
//! [numerals]
//! script = "arabic-indic"
//! transliterate_ltr = true
//!
//! [operators]
//! force_limits = true
//! limit_operators = ["sum", "int", "prod", "bigcup", "bigcap"]
//!
//! [artifact]
//! edit_hint = "Click to edit"
//! tooltip = "Double-click to edit"
//!
//! [templates]
//! path = "${MATHDIR_HOME:-.}/templates.toml"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `templates.path` supports `~`, `${VAR}` (errors if unset) and
//! `${VAR:-default}`, and is resolved relative to the config file.

mod expand;

use std::path::{Path, PathBuf};

use mathdir_glyph::{DEFAULT_LIMIT_OPERATORS, Direction};
use mathdir_layout::NumeralScript;
use mathdir_unit::{MaterializerConfig, TemplateError, TemplateSet, UnitLabels};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override default unit direction.
    pub direction: Option<Direction>,
    /// Override numeral script.
    pub numeral_script: Option<NumeralScript>,
    /// Override operator-limit forcing.
    pub force_limits: Option<bool>,
    /// Override templates file.
    pub templates_path: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mathdir.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Equation defaults (direction as a string from TOML).
    equations: EquationsConfigRaw,
    /// Numeral settings (script as a string from TOML).
    numerals: NumeralsConfigRaw,
    /// Operator-limit forcing.
    pub operators: OperatorsConfig,
    /// Hints written on artifacts.
    pub artifact: ArtifactConfig,
    /// Extra templates (path as a string from TOML).
    templates: TemplatesConfigRaw,

    /// Resolved equation defaults (set after loading).
    #[serde(skip)]
    pub equations_resolved: EquationsConfig,
    /// Resolved numeral settings (set after loading).
    #[serde(skip)]
    pub numerals_resolved: NumeralsConfig,
    /// Resolved templates file (set after loading).
    #[serde(skip)]
    pub templates_path: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EquationsConfigRaw {
    default_direction: Option<String>,
}

/// Resolved equation defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EquationsConfig {
    /// Direction for new and imported units.
    pub default_direction: Direction,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct NumeralsConfigRaw {
    script: Option<String>,
    transliterate_ltr: Option<bool>,
}

/// Resolved numeral settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumeralsConfig {
    /// Target digit glyphs.
    pub script: NumeralScript,
    /// Transliterate LTR units too.
    pub transliterate_ltr: bool,
}

impl Default for NumeralsConfig {
    fn default() -> Self {
        Self {
            script: NumeralScript::default(),
            transliterate_ltr: true,
        }
    }
}

/// Operator-limit forcing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OperatorsConfig {
    /// Insert `\limits` after big operators.
    pub force_limits: bool,
    /// Operator names, without backslash.
    pub limit_operators: Vec<String>,
}

impl Default for OperatorsConfig {
    fn default() -> Self {
        Self {
            force_limits: true,
            limit_operators: DEFAULT_LIMIT_OPERATORS.iter().map(|&op| op.to_owned()).collect(),
        }
    }
}

/// Artifact hints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub edit_hint: String,
    pub tooltip: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        let labels = UnitLabels::default();
        Self {
            edit_hint: labels.edit_hint,
            tooltip: labels.tooltip,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    path: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`templates.path`").
        field: String,
        /// Error message (e.g., "${`MATHDIR_HOME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mathdir.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir().ok().and_then(|cwd| discover_from(&cwd)) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(direction) = settings.direction {
            self.equations_resolved.default_direction = direction;
        }
        if let Some(script) = settings.numeral_script {
            self.numerals_resolved.script = script;
        }
        if let Some(force_limits) = settings.force_limits {
            self.operators.force_limits = force_limits;
        }
        if let Some(path) = &settings.templates_path {
            self.templates_path = Some(path.clone());
        }
    }

    /// Materializer settings derived from this configuration.
    #[must_use]
    pub fn materializer_config(&self) -> MaterializerConfig {
        MaterializerConfig {
            default_direction: self.equations_resolved.default_direction,
            numeral_script: self.numerals_resolved.script,
            transliterate_ltr: self.numerals_resolved.transliterate_ltr,
            force_limits: self.operators.force_limits,
            limit_operators: self.operators.limit_operators.clone(),
            labels: UnitLabels {
                edit_hint: self.artifact.edit_hint.clone(),
                tooltip: self.artifact.tooltip.clone(),
            },
        }
    }

    /// Built-in templates, extended from the configured file if any.
    pub fn template_set(&self) -> Result<TemplateSet, TemplateError> {
        match &self.templates_path {
            Some(path) => TemplateSet::with_file(path),
            None => Ok(TemplateSet::builtin()),
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_operators()?;
        require_non_empty(&self.artifact.edit_hint, "artifact.edit_hint")?;
        require_non_empty(&self.artifact.tooltip, "artifact.tooltip")?;
        Ok(())
    }

    fn validate_operators(&self) -> Result<(), ConfigError> {
        for op in &self.operators.limit_operators {
            require_non_empty(op, "operators.limit_operators")?;
            if !op.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::Validation(format!(
                    "operators.limit_operators: '{op}' must be a command name without backslash"
                )));
            }
        }
        if self.operators.force_limits && self.operators.limit_operators.is_empty() {
            return Err(ConfigError::Validation(
                "operators.limit_operators cannot be empty when force_limits is enabled".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.templates.path {
            self.templates.path = Some(expand::expand_env(path, "templates.path")?);
        }
        Ok(())
    }

    /// Parse raw values and resolve paths relative to the config directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let default_direction = match self.equations.default_direction.as_deref() {
            Some(raw) => raw
                .parse::<Direction>()
                .map_err(|e| ConfigError::Validation(format!("equations.default_direction: {e}")))?,
            None => Direction::default(),
        };
        self.equations_resolved = EquationsConfig { default_direction };

        let script = match self.numerals.script.as_deref() {
            Some(raw) => raw
                .parse::<NumeralScript>()
                .map_err(|e| ConfigError::Validation(format!("numerals.script: {e}")))?,
            None => NumeralScript::default(),
        };
        self.numerals_resolved = NumeralsConfig {
            script,
            transliterate_ltr: self.numerals.transliterate_ltr.unwrap_or(true),
        };

        self.templates_path = self.templates.path.as_deref().map(|p| config_dir.join(p));

        Ok(())
    }
}

/// Search for a config file in `start` and its parents.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(toml)?;
        config.expand_env_vars()?;
        config.resolve(Path::new("/project"))?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.equations_resolved.default_direction, Direction::Rtl);
        assert_eq!(config.numerals_resolved.script, NumeralScript::ArabicIndic);
        assert!(config.numerals_resolved.transliterate_ltr);
        assert!(config.operators.force_limits);
        assert_eq!(config.operators.limit_operators, vec!["sum", "int", "prod", "bigcup", "bigcap"]);
        assert!(config.templates_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_matches_materializer_default() {
        assert_eq!(Config::default().materializer_config(), MaterializerConfig::default());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("").unwrap();
        assert_eq!(config.materializer_config(), MaterializerConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[equations]
default_direction = "ltr"

[numerals]
script = "eastern-arabic-indic"
transliterate_ltr = false

[operators]
force_limits = true
limit_operators = ["sum", "lim"]

[artifact]
edit_hint = "Edit"
tooltip = "Double-click"

[templates]
path = "palette/templates.toml"
"#,
        )
        .unwrap();

        let materializer = config.materializer_config();
        assert_eq!(materializer.default_direction, Direction::Ltr);
        assert_eq!(materializer.numeral_script, NumeralScript::EasternArabicIndic);
        assert!(!materializer.transliterate_ltr);
        assert_eq!(materializer.limit_operators, vec!["sum", "lim"]);
        assert_eq!(materializer.labels.edit_hint, "Edit");
        assert_eq!(
            config.templates_path,
            Some(PathBuf::from("/project/palette/templates.toml"))
        );
    }

    #[test]
    fn test_invalid_direction() {
        let err = parse("[equations]\ndefault_direction = \"up\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("equations.default_direction"));
    }

    #[test]
    fn test_invalid_numeral_script() {
        let err = parse("[numerals]\nscript = \"roman\"\n").unwrap_err();
        assert!(err.to_string().contains("numerals.script"));
    }

    #[test]
    fn test_invalid_limit_operator() {
        let err = parse("[operators]\nlimit_operators = [\"\\\\sum\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("without backslash"));
    }

    #[test]
    fn test_empty_operators_with_forcing() {
        let err = parse("[operators]\nlimit_operators = []\n").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        let config = parse("[operators]\nforce_limits = false\nlimit_operators = []\n").unwrap();
        assert!(!config.operators.force_limits);
    }

    #[test]
    fn test_empty_edit_hint() {
        let err = parse("[artifact]\nedit_hint = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("artifact.edit_hint"));
    }

    #[test]
    fn test_templates_path_expanded() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MATHDIR_CONFIG_TEST_PALETTE", "shared");
        }

        let config = parse("[templates]\npath = \"${MATHDIR_CONFIG_TEST_PALETTE}/t.toml\"\n").unwrap();
        assert_eq!(config.templates_path, Some(PathBuf::from("/project/shared/t.toml")));

        unsafe {
            std::env::remove_var("MATHDIR_CONFIG_TEST_PALETTE");
        }
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            direction: Some(Direction::Ltr),
            numeral_script: Some(NumeralScript::Western),
            force_limits: Some(false),
            templates_path: Some(PathBuf::from("/tmp/t.toml")),
        });

        assert_eq!(config.equations_resolved.default_direction, Direction::Ltr);
        assert_eq!(config.numerals_resolved.script, NumeralScript::Western);
        assert!(!config.operators.force_limits);
        assert_eq!(config.templates_path, Some(PathBuf::from("/tmp/t.toml")));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.materializer_config(), MaterializerConfig::default());
    }

    #[test]
    fn test_load_explicit_missing() {
        let err = Config::load(Some(Path::new("/nonexistent/mathdir.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[templates]\npath = \"t.toml\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path, Some(path.clone()));
        assert_eq!(config.templates_path, Some(dir.path().join("t.toml")));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[equations]\ndefault_direction = \"rtl\"\n").unwrap();

        let settings = CliSettings {
            direction: Some(Direction::Ltr),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.equations_resolved.default_direction, Direction::Ltr);
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_from(&nested), Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_template_set_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("t.toml");
        std::fs::write(
            &templates,
            "[[template]]\nkey = \"binomial\"\nlabel = \"Binomial\"\nlatex = \"\\\\binom{#0}{#?}\"\n",
        )
        .unwrap();

        let config = Config {
            templates_path: Some(templates),
            ..Config::default()
        };
        assert!(config.template_set().unwrap().find("binomial").is_some());
        assert_eq!(Config::default().template_set().unwrap(), TemplateSet::builtin());
    }
}
