// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::cli::ResolveArgs;
use crate::command::CommandSpec;
use crate::command::ResolvedCommand;
use crate::error::CmdSpecError;
use crate::error::ConfigError;
use crate::error::LoadError;
use crate::value::Value;
use clap::ValueEnum;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Serialized;
use figment::providers::Toml;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "cmdspec.toml";

/// Prefix for settings taken from the environment (`CMDSPEC_FORMAT=text`).
pub const ENV_PREFIX: &str = "CMDSPEC_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// `{"argv": [...], "env": [...], "doc": "..."}`
  #[default]
  Json,
  /// Environment entries, one per line, followed by the display line.
  Text,
}

/// Output settings, layered from defaults, `cmdspec.toml` and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub format: OutputFormat,
  pub pretty: bool,
}

impl Settings {
  pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(Settings::default()))
      .merge(Toml::file(SETTINGS_FILE))
      .merge(Env::prefixed(ENV_PREFIX))
  }

  pub fn load() -> Result<Self, ConfigError> {
    Self::figment()
      .extract()
      .map_err(|e| ConfigError::Settings(Box::new(e)))
  }

  pub fn render(&self, resolved: &ResolvedCommand) -> Result<String, serde_json::Error> {
    match self.format {
      OutputFormat::Json if self.pretty => serde_json::to_string_pretty(resolved),
      OutputFormat::Json => serde_json::to_string(resolved),
      OutputFormat::Text => {
        let mut lines = resolved.env.clone();
        lines.push(resolved.doc.clone());
        Ok(lines.join("\n"))
      }
    }
  }
}

/// Where the command spec document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
  Stdin,
  Json(PathBuf),
  Toml(PathBuf),
}

impl TryFrom<PathBuf> for SpecSource {
  type Error = LoadError;

  fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
    if path.as_os_str() == "-" {
      return Ok(SpecSource::Stdin);
    }
    match path.extension().and_then(|ext| ext.to_str()) {
      Some("json") => Ok(SpecSource::Json(path)),
      Some("toml") => Ok(SpecSource::Toml(path)),
      _ => Err(LoadError::UnknownFormat { path }),
    }
  }
}

impl fmt::Display for SpecSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SpecSource::Stdin => f.write_str("<stdin>"),
      SpecSource::Json(path) | SpecSource::Toml(path) => write!(f, "{}", path.display()),
    }
  }
}

/// Fully validated configuration for one `resolve` run.
#[derive(Debug)]
pub struct Config {
  pub source: SpecSource,
  pub path: String,
  pub settings: Settings,
}

impl TryFrom<ResolveArgs> for Config {
  type Error = CmdSpecError;

  fn try_from(
    ResolveArgs {
      spec,
      path,
      format,
      pretty,
    }: ResolveArgs,
  ) -> Result<Self, Self::Error> {
    let mut settings = Settings::load()?;
    if let Some(format) = format {
      settings.format = format;
    }
    settings.pretty |= pretty;

    Ok(Config {
      source: SpecSource::try_from(spec)?,
      path,
      settings,
    })
  }
}

impl Config {
  /// Reads the document and picks out the command spec at `self.path`.
  pub async fn load_spec(&self) -> Result<CommandSpec, LoadError> {
    let document: Value = match &self.source {
      SpecSource::Stdin => {
        let mut text = String::new();
        tokio::io::stdin()
          .read_to_string(&mut text)
          .await
          .map_err(LoadError::Stdin)?;
        serde_json::from_str(&text)?
      }
      SpecSource::Json(path) => serde_json::from_str(&read_document(path).await?)?,
      SpecSource::Toml(path) => toml::from_str(&read_document(path).await?)?,
    };
    tracing::debug!(source = %self.source, path = %self.path, "Loaded command spec document");

    spec_at(&document, &self.path)
  }
}

async fn read_document(path: &Path) -> Result<String, LoadError> {
  tokio::fs::read_to_string(path)
    .await
    .map_err(|source| LoadError::Read {
      path: path.to_path_buf(),
      source,
    })
}

/// Selects the command spec at a dotted `path` inside `document`.
pub fn spec_at(document: &Value, path: &str) -> Result<CommandSpec, LoadError> {
  let node = document.lookup(path).ok_or_else(|| LoadError::MissingPath {
    path: path.to_string(),
  })?;
  CommandSpec::try_from(node).map_err(|source| LoadError::InvalidSpec {
    path: path.to_string(),
    source,
  })
}
