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
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error enum for the cmdspec library.
#[derive(Error, Debug)]
pub enum CmdSpecError {
  #[error("Failed to load command spec")]
  Load(#[from] LoadError),

  #[error("Configuration error")]
  Config(#[from] ConfigError),
}

/// Why a configuration value did not reduce to the shape a caller asked for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
  #[error("incomplete value {0}")]
  Incomplete(String),

  #[error("unresolved disjunction: {candidates} candidates and no default")]
  NoDefault { candidates: usize },

  #[error("default index {index} out of range for {candidates} candidates")]
  DefaultOutOfRange { index: usize, candidates: usize },

  #[error("missing field {0}")]
  MissingField(String),

  #[error("expected {expected}, found {found}")]
  Mismatch {
    expected: &'static str,
    found: &'static str,
  },
}

/// A configuration value failed to resolve, together with the field path
/// (`env.HOW`, `cmd[1]`) where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
  path: String,
  reason: Unresolved,
}

impl EvaluationError {
  pub fn new(reason: Unresolved) -> Self {
    Self {
      path: String::new(),
      reason,
    }
  }

  /// Dotted/indexed path of the failing node, empty at the root.
  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn reason(&self) -> &Unresolved {
    &self.reason
  }

  /// Prefixes the path with a struct field name.
  pub(crate) fn in_field(mut self, key: &str) -> Self {
    self.path = match self.path.chars().next() {
      None => key.to_string(),
      Some('[') => format!("{key}{}", self.path),
      Some(_) => format!("{key}.{}", self.path),
    };
    self
  }

  /// Prefixes the path with a list index.
  pub(crate) fn at_index(mut self, index: usize) -> Self {
    self.path = match self.path.chars().next() {
      None | Some('[') => format!("[{index}]{}", self.path),
      Some(_) => format!("[{index}].{}", self.path),
    };
    self
  }
}

impl fmt::Display for EvaluationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.path.is_empty() {
      write!(f, "{}", self.reason)
    } else {
      write!(f, "{}: {}", self.path, self.reason)
    }
  }
}

impl std::error::Error for EvaluationError {}

impl From<Unresolved> for EvaluationError {
  fn from(reason: Unresolved) -> Self {
    Self::new(reason)
  }
}

/// Errors related to building a command (src/command.rs, src/shell.rs).
#[derive(Error, Debug)]
pub enum CommandError {
  #[error(transparent)]
  Evaluation(#[from] EvaluationError),

  #[error("empty command")]
  Empty,

  #[error("Failed to split command line {line:?}")]
  Split {
    line: String,
    #[source]
    source: shell_words::ParseError,
  },
}

/// Errors related to reading a command spec document (src/config.rs).
#[derive(Error, Debug)]
pub enum LoadError {
  #[error("Failed to read command spec: {path}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to read command spec from stdin")]
  Stdin(#[source] std::io::Error),

  #[error("Failed to parse command spec JSON")]
  Json(#[from] serde_json::Error),

  #[error("Failed to parse command spec TOML")]
  Toml(#[from] toml::de::Error),

  #[error("Unsupported command spec format: {path} (expected .json or .toml)")]
  UnknownFormat { path: PathBuf },

  #[error("No struct field at path '{path}'")]
  MissingPath { path: String },

  #[error("Invalid command spec at '{path}'")]
  InvalidSpec {
    path: String,
    #[source]
    source: EvaluationError,
  },
}

/// Errors related to settings resolution (src/config.rs).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to extract settings")]
  Settings(#[source] Box<figment::Error>),
}
