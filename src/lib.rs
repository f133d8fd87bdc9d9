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

//! # cmdspec
//!
//! `cmdspec` turns a declarative command specification (a command line or
//! argument list plus environment variables, possibly carrying
//! default-marked alternatives) into what a process launcher needs: an
//! argument vector, an ordered list of `KEY=VALUE` entries and a shell-quoted
//! one-line rendering for logs.
//!
//! ```
//! use cmdspec::command::CommandSpec;
//! use cmdspec::value::Value;
//!
//! let spec = CommandSpec::new(Value::string(r#"bash -c "echo hello world""#))
//!   .with_env(Value::structure([("WHO", Value::string("World"))]));
//! let resolved = spec.resolve().unwrap();
//! assert_eq!(resolved.argv, ["bash", "-c", "echo hello world"]);
//! assert_eq!(resolved.doc, "bash -c 'echo hello world'");
//! assert_eq!(resolved.env, ["WHO=World"]);
//! ```
//!
//! ## Core Modules
//!
//! * [`value`]: The `Value` tree, default selection, and `resolve_scalar` /
//!   `resolve_sequence`.
//! * [`shell`]: Word splitting and quoting of single command lines.
//! * [`command`]: `CommandSpec` and its resolution into a `ResolvedCommand`.
//! * [`config`]: Settings layering and loading of spec documents for the CLI.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod shell;
pub mod value;
