//! Configuration loading.
//!
//! A workspace may contain a `.storelintrc.json` (comments allowed):
//!
//! ```json
//! {
//!     "rules": {
//!         // "off", "warn", "error", an options object, or [level, options]
//!         "no-array-mutations-on-state": ["warn", { "enableFix": true }]
//!     },
//!     "ignore": ["legacy/**"],
//!     "extensions": [".js", ".ts"]
//! }
//! ```

use camino::Utf8Path;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use store_lint::rules::{self, no_array_mutations_on_state};
use store_lint::{LintOptions, NoArrayMutationsOptions, Severity};
use thiserror::Error;

/// File name looked up in the workspace root.
pub const CONFIG_FILE: &str = ".storelintrc.json";

/// Extensions linted when the config lists none.
const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".jsx", ".ts", ".mts", ".cts", ".tsx"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown rule `{0}`")]
    UnknownRule(String),

    #[error("invalid options for `{rule}`: {source}")]
    InvalidOptions {
        rule: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How strongly a rule is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    /// Severity of diagnostics reported at this level.
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

/// One entry of the `rules` table, as written in the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleEntry {
    Level(RuleLevel),
    WithOptions(RuleLevel, serde_json::Value),
    Options(serde_json::Value),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    rules: BTreeMap<String, RuleEntry>,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    extensions: Vec<String>,
}

/// Resolved settings for `no-array-mutations-on-state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    pub level: RuleLevel,
    pub options: NoArrayMutationsOptions,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            level: RuleLevel::Error,
            options: NoArrayMutationsOptions::default(),
        }
    }
}

/// Project configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreLintConfig {
    pub no_array_mutations_on_state: RuleConfig,

    /// Extra glob patterns to skip, relative to the workspace.
    pub ignore: Vec<String>,

    /// File extensions to process.
    pub extensions: Vec<String>,
}

impl StoreLintConfig {
    /// Loads `.storelintrc.json` from the workspace root.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is
    /// reported and also falls back to the defaults.
    pub fn load(project_root: &Utf8Path) -> Self {
        let config_path = project_root.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!(path = %config_path, "no config file, using defaults");
            return Self::default();
        }

        match Self::read(&config_path) {
            Ok(config) => {
                tracing::debug!(path = %config_path, ?config, "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", config_path, e);
                Self::default()
            }
        }
    }

    fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses the contents of a config file.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(&remove_json_comments(content))?;
        let mut config = StoreLintConfig {
            ignore: raw.ignore,
            extensions: raw.extensions,
            ..Default::default()
        };

        for (name, entry) in raw.rules {
            if rules::find(&name).is_none() {
                return Err(ConfigError::UnknownRule(name));
            }

            let (level, options) = match entry {
                RuleEntry::Level(level) => (level, None),
                RuleEntry::WithOptions(level, options) => (level, Some(options)),
                RuleEntry::Options(options) => (RuleLevel::Error, Some(options)),
            };

            if name == no_array_mutations_on_state::NAME {
                let options = match options {
                    Some(value) => serde_json::from_value(value).map_err(|source| {
                        ConfigError::InvalidOptions {
                            rule: name.clone(),
                            source,
                        }
                    })?,
                    None => NoArrayMutationsOptions::default(),
                };
                config.no_array_mutations_on_state = RuleConfig { level, options };
            }
        }

        Ok(config)
    }

    /// Builds the lint options for a run; `force_fix` turns fixes on regardless
    /// of the configured options.
    pub fn lint_options(&self, force_fix: bool) -> LintOptions {
        let rule = self.no_array_mutations_on_state;
        let options = match rule.level {
            RuleLevel::Off => LintOptions::default(),
            RuleLevel::Warn | RuleLevel::Error => LintOptions {
                no_array_mutations_on_state: Some(rule.options),
            },
        };
        if force_fix {
            options.with_fix(true)
        } else {
            options
        }
    }

    /// Returns the file extensions to process.
    pub fn file_extensions(&self) -> Vec<&str> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.to_vec()
        } else {
            self.extensions.iter().map(|s| s.as_str()).collect()
        }
    }
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {
                    result.push(c);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
