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
use Commands::Quote;
use Commands::Resolve;
use Commands::Split;
use anyhow::Result;
use clap::Parser;
use cmdspec::cli::Cli;
use cmdspec::cli::Commands;
use cmdspec::config::Config;
use cmdspec::logging::setup_tracing;
use cmdspec::shell;
use tracing::Instrument;

#[tokio::main]
async fn main() -> Result<()> {
  let _guard = setup_tracing()?;

  let Cli { command } = Cli::parse();

  run(command).instrument(tracing::info_span!("cmdspec")).await
}

async fn run(command: Commands) -> Result<()> {
  match command {
    Resolve(resolve_args) => {
      let config = Config::try_from(resolve_args)?;
      tracing::info!(source = %config.source, "Resolving command spec");

      let spec = config.load_spec().await?;
      let resolved = spec.resolve()?;

      println!("{}", config.settings.render(&resolved)?);
    }
    Split { line } => {
      let argv = shell::split(&line)?;
      println!("{}", serde_json::to_string(&argv)?);
    }
    Quote { args } => {
      println!("{}", shell::join(&args));
    }
  }

  Ok(())
}
