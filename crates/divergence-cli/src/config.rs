//! Layered configuration: built-in defaults, then the optional TOML file, then
//! `DIVERGENCE_*` environment variables.
//!
//! ```toml
//! store_path = "~/.local/share/divergence/divergence.db"
//!
//! [completion]
//! endpoint    = "https://example.openai.azure.com"
//! deployment  = "gpt-4o"
//! api_version = "2024-08-01-preview"
//! api_key     = "..."
//!
//! [alert]
//! webhook_url = "https://school.example/hooks/panic"
//! ```
//!
//! Nested keys come from the environment with a double underscore, e.g.
//! `DIVERGENCE_COMPLETION__API_KEY`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/divergence/config.toml";
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/divergence/divergence.db";
pub const DEFAULT_API_VERSION: &str = "2024-08-01-preview";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path: PathBuf,
  #[serde(default)]
  pub completion: CompletionSettings,
  #[serde(default)]
  pub alert:      AlertSettings,
}

/// Azure OpenAI chat-completions deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
  pub endpoint:    Option<String>,
  pub deployment:  Option<String>,
  #[serde(default = "default_api_version")]
  pub api_version: String,
  pub api_key:     Option<String>,
}

impl Default for CompletionSettings {
  fn default() -> Self {
    Self {
      endpoint:    None,
      deployment:  None,
      api_version: default_api_version(),
      api_key:     None,
    }
  }
}

fn default_api_version() -> String { DEFAULT_API_VERSION.to_owned() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertSettings {
  /// Where panic alerts are POSTed. Alerts are only logged when unset.
  pub webhook_url: Option<String>,
}

impl Settings {
  /// Load settings from `path` (or the default location). A missing file is
  /// not an error.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let path = path.map_or_else(|| expand_tilde(Path::new(DEFAULT_CONFIG_PATH)), expand_tilde);
    tracing::debug!(path = %path.display(), "loading configuration");
    Self::from_builder(Config::builder().add_source(File::from(path).required(false)))
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
    let raw = builder
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(
        Environment::with_prefix("DIVERGENCE")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read configuration")?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise configuration")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> Settings {
    Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
      .unwrap()
  }

  #[test]
  fn defaults_apply_without_a_file() {
    let settings = from_toml("");
    assert!(settings.store_path.ends_with(".local/share/divergence/divergence.db"));
    assert_eq!(settings.completion.api_version, DEFAULT_API_VERSION);
    assert!(settings.completion.api_key.is_none());
    assert!(settings.alert.webhook_url.is_none());
  }

  #[test]
  fn file_values_override_defaults() {
    let settings = from_toml(
      r#"
        store_path = "/tmp/timetable.db"

        [completion]
        endpoint = "https://example.openai.azure.com"
        deployment = "gpt-4o"
        api_key = "secret"

        [alert]
        webhook_url = "https://school.example/hook"
      "#,
    );
    assert_eq!(settings.store_path, PathBuf::from("/tmp/timetable.db"));
    assert_eq!(settings.completion.deployment.as_deref(), Some("gpt-4o"));
    assert_eq!(settings.completion.api_version, DEFAULT_API_VERSION);
    assert_eq!(settings.alert.webhook_url.as_deref(), Some("https://school.example/hook"));
  }

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x/y.db")), PathBuf::from(home).join("x/y.db"));
    assert_eq!(expand_tilde(Path::new("/abs/y.db")), PathBuf::from("/abs/y.db"));
  }
}
