use std::{
  path::Path,
  time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::scroll::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config: {0}")]
  Read(#[from] std::io::Error),
  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Documentation URL template with `{port}` and `{path}` placeholders.
  pub localhost: String,
  pub feedback:  Feedback,
  pub scroll:    ScrollConfig,
  pub popup:     PopupConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Feedback {
  /// Uses `{tag}` and `{version}`.
  pub handler_not_implemented: String,
  /// Uses `{url}`.
  pub manual_doc:              String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
  pub attempts: u32,
  pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopupConfig {
  pub max_width: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      localhost: "http://127.0.0.1:{port}/{path}".into(),
      feedback:  Feedback::default(),
      scroll:    ScrollConfig::default(),
      popup:     PopupConfig::default(),
    }
  }
}

impl Default for Feedback {
  fn default() -> Self {
    Self {
      handler_not_implemented: "The handler for {tag} is not implemented for ENSIME server \
                                version {version}."
        .into(),
      manual_doc:              "Could not open a browser. Open the documentation manually: \
                                {url}"
        .into(),
    }
  }
}

impl Default for ScrollConfig {
  fn default() -> Self {
    let policy = RetryPolicy::default();
    Self {
      attempts: policy.attempts,
      delay_ms: policy.delay.as_millis() as u64,
    }
  }
}

impl Default for PopupConfig {
  fn default() -> Self {
    Self { max_width: 512 }
  }
}

impl Config {
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(source)?)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    Self::from_toml_str(&source)
  }

  pub fn doc_url(&self, port: u16, path: &str) -> String {
    self
      .localhost
      .replace("{port}", &port.to_string())
      .replace("{path}", path.trim_start_matches('/'))
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      attempts: self.scroll.attempts,
      delay:    Duration::from_millis(self.scroll.delay_ms),
    }
  }
}

impl Feedback {
  pub fn handler_not_implemented(&self, tag: &str, version: &str) -> String {
    self
      .handler_not_implemented
      .replace("{tag}", tag)
      .replace("{version}", version)
  }

  pub fn manual_doc(&self, url: &str) -> String {
    self.manual_doc.replace("{url}", url)
  }
}
