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
use assert_cmd::cargo;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use assert_cmd::Command;
use tempfile::TempDir;
use tempfile::tempdir;

use fs_extra::dir::CopyOptions;
use fs_extra::dir::copy;
use std::fs;

use serde_json::Value;

/// A temp working dir holding a copy of ./tests/fixtures.
fn fixtures_dir() -> TempDir {
  let temp = tempdir().unwrap();
  copy("tests/fixtures", temp.path(), &CopyOptions::new()).unwrap();
  temp
}

fn cmdspec(dir: &TempDir) -> Command {
  let mut cmd = Command::new(cargo::cargo_bin!("cmdspec"));
  cmd
    .current_dir(dir.path())
    .env_remove("CMDSPEC_FORMAT")
    .env_remove("CMDSPEC_PRETTY")
    .env_remove("CMDSPEC_LOG_FILE")
    .env_remove("RUST_LOG")
    .env("CLICOLOR", "0");
  cmd
}

#[test]
fn test_resolve_json_output() {
  let temp = fixtures_dir();

  let output = cmdspec(&temp)
    .arg("resolve")
    .arg("fixtures/string_cmd.toml")
    .assert()
    .success()
    .stderr(predicate::str::contains("Resolving command spec"))
    .get_output()
    .stdout
    .clone();

  let json: Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(json["argv"], serde_json::json!(["bash", "-c", "echo hello world"]));
  assert_eq!(json["env"], serde_json::json!([]));
  assert_eq!(json["doc"], "bash -c 'echo hello world'");
}

#[test]
fn test_resolve_text_output_keeps_env_order() {
  let temp = fixtures_dir();

  cmdspec(&temp)
    .arg("resolve")
    .arg("fixtures/env_mapped.toml")
    .arg("--format")
    .arg("text")
    .assert()
    .success()
    .stdout("WHO=World\nWHAT=Hello\nWHEN=Now!\necho\n");
}

#[test]
fn test_resolve_nested_path() {
  let temp = fixtures_dir();

  cmdspec(&temp)
    .arg("resolve")
    .arg("fixtures/tasks.toml")
    .arg("--path")
    .arg("tasks.greet")
    .arg("--format")
    .arg("text")
    .assert()
    .success()
    .stdout(predicate::str::ends_with(
      "GREETING=Hello\nPORT=8080\nsh -c 'echo \"$GREETING, $WHO\"'\n",
    ));
}

#[test]
fn test_settings_file_selects_format() {
  let temp = fixtures_dir();
  fs::write(temp.path().join("cmdspec.toml"), "format = \"text\"\n").unwrap();

  cmdspec(&temp)
    .arg("resolve")
    .arg("fixtures/list_cmd.json")
    .assert()
    .success()
    .stdout("bash -c 'echo hello world'\n");

  cmdspec(&temp)
    .arg("resolve")
    .arg("fixtures/list_cmd.json")
    .env("CMDSPEC_FORMAT", "json")
    .assert()
    .success()
    .stdout(predicate::str::starts_with(r#"{"argv":["bash","#));
}

#[test]
fn test_resolve_from_stdin() {
  let temp = tempdir().unwrap();

  cmdspec(&temp)
    .arg("resolve")
    .arg("-")
    .write_stdin(r#"{"cmd": ["ls", "-la"], "env": ["A=1"]}"#)
    .assert()
    .success()
    .stdout(predicate::str::contains(
      r#"{"argv":["ls","-la"],"env":["A=1"],"doc":"ls -la"}"#,
    ));
}

#[test]
fn test_resolve_empty_command_fails() {
  let temp = tempdir().unwrap();

  cmdspec(&temp)
    .arg("resolve")
    .arg("-")
    .write_stdin(r#"{"cmd": ""}"#)
    .assert()
    .failure()
    .stderr(predicate::str::contains("empty command"));
}

#[test]
fn test_resolve_unresolved_value_fails() {
  let temp = fixtures_dir();

  cmdspec(&temp)
    .arg("resolve")
    .arg("fixtures/unresolved.json")
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "cmd[1]: unresolved disjunction: 2 candidates and no default",
    ));
}

#[test]
fn test_resolve_unknown_format_fails() {
  let temp = tempdir().unwrap();

  cmdspec(&temp)
    .arg("resolve")
    .arg("spec.yaml")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unsupported command spec format"));
}

#[test]
fn test_split_and_quote() {
  let temp = tempdir().unwrap();

  cmdspec(&temp)
    .arg("split")
    .arg(r#"bash -c "echo hello world""#)
    .assert()
    .success()
    .stdout("[\"bash\",\"-c\",\"echo hello world\"]\n");

  cmdspec(&temp)
    .arg("quote")
    .arg("bash")
    .arg("-c")
    .arg("echo hello world")
    .assert()
    .success()
    .stdout("bash -c 'echo hello world'\n");
}
