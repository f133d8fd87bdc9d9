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
use crate::error::CommandError;
use crate::error::EvaluationError;
use crate::error::Unresolved;
use crate::shell;
use crate::value::Value;
use crate::value::resolve_scalar;
use crate::value::resolve_sequence;
use serde::Serialize;

/// A declarative process invocation: the command plus its environment.
///
/// This is the input "contract" handed over by the configuration evaluator.
/// Fields other than `cmd` and `env` are ignored.
#[derive(Debug, Clone)]
pub struct CommandSpec {
  /// A single command line, or a list of already split arguments.
  pub cmd: Value,

  /// A struct of variables, or a list of `KEY=VALUE` entries.
  pub env: Option<Value>,
}

/// The concrete inputs needed to launch a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCommand {
  /// Program followed by its arguments. Never empty.
  pub argv: Vec<String>,

  /// `KEY=VALUE` entries in declaration order.
  pub env: Vec<String>,

  /// Shell-quoted one-line rendering of `argv`, for display only.
  pub doc: String,
}

impl CommandSpec {
  pub fn new(cmd: Value) -> Self {
    Self { cmd, env: None }
  }

  pub fn with_env(mut self, env: Value) -> Self {
    self.env = Some(env);
    self
  }

  /// Resolves the spec into argv, environment and display line.
  pub fn resolve(&self) -> Result<ResolvedCommand, CommandError> {
    let env = match &self.env {
      Some(env) => resolve_sequence(env).map_err(|e| e.in_field("env"))?,
      None => Vec::new(),
    };
    for entry in env.iter().filter(|entry| !entry.contains('=')) {
      tracing::warn!(%entry, "Environment entry has no '='");
    }

    let argv = resolve_argv(&self.cmd)?;
    let doc = shell::join(&argv);

    tracing::debug!(?argv, ?env, %doc, "Resolved command");
    Ok(ResolvedCommand { argv, env, doc })
  }
}

impl TryFrom<&Value> for CommandSpec {
  type Error = EvaluationError;

  fn try_from(node: &Value) -> Result<Self, Self::Error> {
    match node.concrete()? {
      node @ Value::Struct(_) => {
        let cmd = node
          .get("cmd")
          .ok_or_else(|| Unresolved::MissingField("cmd".into()))?;
        Ok(Self {
          cmd: cmd.clone(),
          env: node.get("env").filter(|env| **env != Value::Null).cloned(),
        })
      }
      other => Err(
        Unresolved::Mismatch {
          expected: "struct",
          found: other.kind(),
        }
        .into(),
      ),
    }
  }
}

/// Splits a command line, or takes a list of arguments verbatim.
fn resolve_argv(cmd: &Value) -> Result<Vec<String>, CommandError> {
  let in_cmd = |e: EvaluationError| e.in_field("cmd");

  let argv = match cmd.concrete().map_err(in_cmd)? {
    Value::String(line) => shell::split(line)?,
    Value::List(items) => items
      .iter()
      .enumerate()
      .map(|(i, item)| resolve_scalar(item).map_err(|e| in_cmd(e.at_index(i))))
      .collect::<Result<_, _>>()?,
    other => {
      return Err(
        in_cmd(
          Unresolved::Mismatch {
            expected: "string or list",
            found: other.kind(),
          }
          .into(),
        )
        .into(),
      );
    }
  };

  if argv.first().is_none_or(String::is_empty) {
    return Err(CommandError::Empty);
  }
  Ok(argv)
}

impl ResolvedCommand {
  pub fn program(&self) -> &str {
    self.argv.first().map_or("", String::as_str)
  }

  pub fn args(&self) -> &[String] {
    self.argv.get(1..).unwrap_or_default()
  }

  /// Builds a process descriptor for this command without spawning it.
  ///
  /// A non-empty `env` replaces the inherited environment entirely.
  pub fn to_command(&self) -> tokio::process::Command {
    let mut command = tokio::process::Command::new(self.program());
    command.args(self.args());

    if !self.env.is_empty() {
      command.env_clear();
      for entry in &self.env {
        match entry.split_once('=') {
          Some((key, value)) => {
            command.env(key, value);
          }
          None => tracing::warn!(%entry, "Skipping environment entry without '='"),
        }
      }
    }
    command
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::ffi::OsStr;

  fn s(text: &str) -> Value {
    Value::string(text)
  }

  fn string_type() -> Value {
    Value::Type("string".into())
  }

  #[test]
  fn test_string_cmd_is_split() {
    let resolved = CommandSpec::new(s(r#"bash -c "echo hello world""#))
      .resolve()
      .unwrap();
    assert_eq!(resolved.argv, vec!["bash", "-c", "echo hello world"]);
    assert_eq!(resolved.doc, "bash -c 'echo hello world'");
    assert!(resolved.env.is_empty());
  }

  #[test]
  fn test_list_cmd_is_taken_verbatim() {
    let resolved = CommandSpec::new(Value::list([s("bash"), s("-c"), s("echo hello world")]))
      .resolve()
      .unwrap();
    assert_eq!(resolved.argv, vec!["bash", "-c", "echo hello world"]);
    assert_eq!(resolved.doc, "bash -c 'echo hello world'");
  }

  #[test]
  fn test_hash_argument_is_not_a_comment() {
    let resolved = CommandSpec::new(s("git commit -m #123 --amend"))
      .resolve()
      .unwrap();
    assert_eq!(resolved.argv, vec!["git", "commit", "-m", "#123", "--amend"]);
    assert_eq!(resolved.doc, "git commit -m '#123' --amend");
  }

  #[test]
  fn test_leading_space() {
    let resolved = CommandSpec::new(s(" abc")).resolve().unwrap();
    assert_eq!(resolved.argv, vec!["abc"]);
    assert_eq!(resolved.doc, "abc");
  }

  #[test]
  fn test_empty_commands() {
    let cases = [
      s(""),
      s("   "),
      s("''"),
      Value::List(vec![]),
      Value::list([s("")]),
      Value::list([s(""), s("arg")]),
    ];
    for cmd in cases {
      let err = CommandSpec::new(cmd.clone()).resolve().unwrap_err();
      assert_eq!(err.to_string(), "empty command", "cmd = {cmd:?}");
    }
  }

  #[test]
  fn test_empty_later_argument_is_kept() {
    let resolved = CommandSpec::new(Value::list([s("bash"), s("")]))
      .resolve()
      .unwrap();
    assert_eq!(resolved.argv, vec!["bash", ""]);
    assert_eq!(resolved.doc, "bash ''");
  }

  #[test]
  fn test_cmd_default_is_selected() {
    let cmd = Value::list([s("echo"), Value::with_default(s("hi"), [string_type()])]);
    let resolved = CommandSpec::new(Value::with_default(cmd, [string_type()]))
      .resolve()
      .unwrap();
    assert_eq!(resolved.argv, vec!["echo", "hi"]);
  }

  #[test]
  fn test_cmd_errors_carry_path() {
    let err = CommandSpec::new(Value::list([s("echo"), string_type()]))
      .resolve()
      .unwrap_err();
    assert_eq!(err.to_string(), "cmd[1]: incomplete value string");

    let err = CommandSpec::new(Value::Int(3)).resolve().unwrap_err();
    assert_eq!(err.to_string(), "cmd: expected string or list, found int");
  }

  #[test]
  fn test_env_struct_order() {
    let env = Value::structure([("WHO", s("World")), ("WHAT", s("Hello")), ("WHEN", s("Now!"))]);
    let resolved = CommandSpec::new(s("echo")).with_env(env).resolve().unwrap();
    assert_eq!(resolved.env, vec!["WHO=World", "WHAT=Hello", "WHEN=Now!"]);
  }

  #[test]
  fn test_env_duplicates_are_kept() {
    let env = Value::list([s("A=1"), s("A=2")]);
    let resolved = CommandSpec::new(s("env")).with_env(env).resolve().unwrap();
    assert_eq!(resolved.env, vec!["A=1", "A=2"]);
  }

  #[test]
  fn test_env_error_carries_path() {
    let env = Value::structure([("HOW", string_type())]);
    let err = CommandSpec::new(s("echo")).with_env(env).resolve().unwrap_err();
    assert!(matches!(err, CommandError::Evaluation(_)));
    assert_eq!(err.to_string(), "env.HOW: incomplete value string");
  }

  #[test]
  fn test_env_is_resolved_before_cmd() {
    let env = Value::list([string_type()]);
    let err = CommandSpec::new(s("")).with_env(env).resolve().unwrap_err();
    assert_eq!(err.to_string(), "env[0]: incomplete value string");
  }

  #[test]
  fn test_spec_from_document() {
    let document: Value =
      serde_json::from_str(r#"{"cmd": ["echo", "hi"], "env": {"A": "1"}, "dir": "/tmp"}"#).unwrap();
    let resolved = CommandSpec::try_from(&document).unwrap().resolve().unwrap();
    assert_eq!(resolved.argv, vec!["echo", "hi"]);
    assert_eq!(resolved.env, vec!["A=1"]);

    let document: Value = serde_json::from_str(r#"{"cmd": "true", "env": null}"#).unwrap();
    assert!(CommandSpec::try_from(&document).unwrap().env.is_none());
  }

  #[test]
  fn test_spec_requires_cmd() {
    let document: Value = serde_json::from_str(r#"{"env": {}}"#).unwrap();
    let err = CommandSpec::try_from(&document).unwrap_err();
    assert_eq!(err.to_string(), "missing field cmd");

    let err = CommandSpec::try_from(&Value::string("echo")).unwrap_err();
    assert_eq!(err.to_string(), "expected struct, found string");
  }

  #[test]
  fn test_to_command() {
    let resolved = ResolvedCommand {
      argv: vec!["bash".into(), "-c".into(), "echo $WHO".into()],
      env: vec!["WHO=World".into(), "EQ=a=b".into(), "BARE".into()],
      doc: String::new(),
    };
    let command = resolved.to_command();
    let inner = command.as_std();
    assert_eq!(inner.get_program(), "bash");
    assert_eq!(
      inner.get_args().collect::<Vec<_>>(),
      vec![OsStr::new("-c"), OsStr::new("echo $WHO")]
    );
    let envs: Vec<_> = inner.get_envs().collect();
    assert_eq!(
      envs,
      vec![
        (OsStr::new("EQ"), Some(OsStr::new("a=b"))),
        (OsStr::new("WHO"), Some(OsStr::new("World"))),
      ]
    );
  }
}
