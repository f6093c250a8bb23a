use std::{
  fmt,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
};

use chanspan_markup::{ParserSettings, Theme};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Commented default configuration, written by `chanspan init`.
const DEFAULT_TOML: &str = include_str!("../templates/default.toml");

/// Configuration for chanspan.
///
/// [`Config`] bundles the settings consulted while parsing posts and the
/// colour scheme used for spans. It is usually loaded from one or more TOML
/// or JSON files, with `KEY=VALUE` overrides from the command line applied
/// last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Parser flags.
  pub parser: ParserSettings,

  /// Span colours.
  pub theme: Theme,
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
  Toml,
  Json,
}

impl ConfigFormat {
  /// Guess the format from a file extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the path has no extension or an unsupported one.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let ext = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
      ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      ))
    })?;

    ext.parse().map_err(|_| {
      ConfigError::Config(format!(
        "Unsupported config file format: {}",
        path.display()
      ))
    })
  }
}

impl FromStr for ConfigFormat {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "toml" => Ok(Self::Toml),
      "json" => Ok(Self::Json),
      other => {
        Err(ConfigError::Config(format!(
          "Unsupported config format: {other}"
        )))
      },
    }
  }
}

impl fmt::Display for ConfigFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Toml => f.write_str("toml"),
      Self::Json => f.write_str("json"),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let value = read_value(path.as_ref())?;
    Self::from_value(value)
  }

  /// Load configuration files in order, later files overriding earlier ones,
  /// then apply `KEY=VALUE` overrides such as `parser.font_size=14`.
  ///
  /// With no files and no overrides this is [`Config::default`].
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed or
  /// names an unknown key, or the merged result has invalid values.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut merged = Value::Object(Map::new());

    for path in config_files {
      let value = read_value(path).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load config from {}: {}",
          path.display(),
          e
        ))
      })?;
      merge_values(&mut merged, value);
      log::debug!("Loaded configuration from {}", path.display());
    }

    if !config_overrides.is_empty() {
      let known = serde_json::to_value(Self::default())?;
      for spec in config_overrides {
        apply_override(&mut merged, &known, spec)?;
      }
    }

    Self::from_value(merged)
  }

  fn from_value(value: Value) -> Result<Self, ConfigError> {
    serde_json::from_value(value)
      .map_err(|e| ConfigError::Config(format!("Invalid configuration: {e}")))
  }

  /// Render the default configuration in `format`.
  ///
  /// # Errors
  ///
  /// Returns an error if the defaults cannot be serialized.
  pub fn generate_default(format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
      ConfigFormat::Toml => Ok(DEFAULT_TOML.to_string()),
      ConfigFormat::Json => {
        let mut json = serde_json::to_string_pretty(&Self::default())?;
        json.push('\n');
        Ok(json)
      },
    }
  }

  /// Write the default configuration to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the file exists and `force` is not set, or the file
  /// cannot be written.
  pub fn write_default(
    format: ConfigFormat,
    path: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    if path.exists() && !force {
      return Err(ConfigError::Config(format!(
        "Configuration file already exists: {}. Use --force to overwrite.",
        path.display()
      )));
    }

    fs::write(path, Self::generate_default(format)?).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn read_value(path: &Path) -> Result<Value, ConfigError> {
  let format = ConfigFormat::from_path(path)?;
  let content = fs::read_to_string(path)?;

  let value = match format {
    ConfigFormat::Json => serde_json::from_str(&content)?,
    ConfigFormat::Toml => toml::from_str(&content)?,
  };
  Ok(value)
}

/// Deep-merge `overlay` into `base`. Tables merge key by key; anything else
/// replaces.
fn merge_values(base: &mut Value, overlay: Value) {
  match (base, overlay) {
    (Value::Object(base), Value::Object(overlay)) => {
      for (key, value) in overlay {
        match base.get_mut(&key) {
          Some(existing) => merge_values(existing, value),
          None => {
            base.insert(key, value);
          },
        }
      }
    },
    (base, overlay) => *base = overlay,
  }
}

/// Apply one `section.key=value` override. The value is read as JSON when
/// possible (`true`, `14`, `"x"`) and as a bare string otherwise.
fn apply_override(
  target: &mut Value,
  known: &Value,
  spec: &str,
) -> Result<(), ConfigError> {
  let (key, raw) = spec.split_once('=').ok_or_else(|| {
    ConfigError::Config(format!(
      "Invalid override `{spec}`, expected KEY=VALUE"
    ))
  })?;
  let path: Vec<&str> = key.trim().split('.').collect();

  let mut probe = known;
  for segment in &path {
    probe = probe.get(*segment).ok_or_else(|| {
      ConfigError::Config(format!("Unknown configuration key: {key}"))
    })?;
  }

  let raw = raw.trim();
  let value = serde_json::from_str(raw)
    .unwrap_or_else(|_| Value::String(raw.to_string()));

  let overlay = path.iter().rev().fold(value, |inner, segment| {
    let mut table = Map::new();
    table.insert((*segment).to_string(), inner);
    Value::Object(table)
  });
  merge_values(target, overlay);

  log::debug!("Applied configuration override {key}");
  Ok(())
}
