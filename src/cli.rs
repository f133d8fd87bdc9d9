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
use crate::config::OutputFormat;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
  version,
  about = "Resolve declarative command specs into argv, environment and a display line"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Resolve a command spec document and print the result.
  Resolve(ResolveArgs),

  /// Split a command line into arguments, printed as a JSON array.
  Split {
    /// The command line to split, e.g. 'bash -c "echo hi"'.
    line: String,
  },

  /// Quote arguments into a single display line.
  Quote {
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
  },
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
  /// Path to a `.json` or `.toml` command spec, or `-` to read JSON from stdin.
  pub spec: PathBuf,

  /// Dotted path to the command spec inside the document (e.g. `tasks.build`).
  #[arg(long, default_value = "")]
  pub path: String,

  /// Output format. Overrides `format` from cmdspec.toml and CMDSPEC_FORMAT.
  #[arg(long, value_enum)]
  pub format: Option<OutputFormat>,

  /// Pretty-print JSON output.
  #[arg(long)]
  pub pretty: bool,
}
