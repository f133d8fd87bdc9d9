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

//! Configuration values and the default-selection rules that reduce them to
//! concrete strings.

use crate::error::EvaluationError;
use crate::error::Unresolved;
use serde::Deserialize;
use serde::Deserializer;
use serde::de;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;
use std::fmt;

/// A node of an evaluated (but not necessarily concrete) configuration tree.
///
/// Struct fields are kept as an ordered list of pairs: declaration order is
/// part of the value and flows straight into the resolved environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  Int(i64),
  /// An integer above `i64::MAX`.
  UInt(u64),
  Float(f64),
  String(String),
  List(Vec<Value>),
  Struct(Vec<(String, Value)>),
  /// A set of candidates, optionally with one marked as the default
  /// (`*"a" | "b"`).
  Disjunction {
    candidates: Vec<Value>,
    default: Option<usize>,
  },
  /// A type constraint with no concrete value, such as `string`.
  Type(String),
}

impl Value {
  pub fn string(s: impl Into<String>) -> Self {
    Value::String(s.into())
  }

  pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
    Value::List(items.into_iter().collect())
  }

  pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
    Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }

  /// Builds `*default | others...`.
  pub fn with_default(default: Value, others: impl IntoIterator<Item = Value>) -> Self {
    let candidates = std::iter::once(default).chain(others).collect();
    Value::Disjunction {
      candidates,
      default: Some(0),
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::Bool(_) => "bool",
      Value::Int(_) | Value::UInt(_) => "int",
      Value::Float(_) => "float",
      Value::String(_) => "string",
      Value::List(_) => "list",
      Value::Struct(_) => "struct",
      Value::Disjunction { .. } => "disjunction",
      Value::Type(_) => "type",
    }
  }

  /// Returns the first struct field named `key`.
  pub fn get(&self, key: &str) -> Option<&Value> {
    match self {
      Value::Struct(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
      _ => None,
    }
  }

  /// Follows a dotted path of struct fields (`tasks.build`). An empty path
  /// returns `self`; empty segments (`a..b`, `.a`) match nothing.
  pub fn lookup(&self, path: &str) -> Option<&Value> {
    if path.is_empty() {
      return Some(self);
    }
    path.split('.').try_fold(self, |value, segment| {
      if segment.is_empty() {
        None
      } else {
        value.get(segment)
      }
    })
  }

  /// Applies default selection until a concrete node is reached.
  pub fn concrete(&self) -> Result<&Value, EvaluationError> {
    match self {
      Value::Disjunction { candidates, default } => {
        let chosen = match (default, candidates.as_slice()) {
          (Some(index), _) => candidates.get(*index).ok_or(Unresolved::DefaultOutOfRange {
            index: *index,
            candidates: candidates.len(),
          })?,
          (None, [only]) => only,
          (None, _) => {
            return Err(
              Unresolved::NoDefault {
                candidates: candidates.len(),
              }
              .into(),
            );
          }
        };
        tracing::trace!(kind = chosen.kind(), "selected disjunction default");
        chosen.concrete()
      }
      Value::Type(name) => Err(Unresolved::Incomplete(name.clone()).into()),
      other => Ok(other),
    }
  }
}

fn mismatch(expected: &'static str, found: &Value) -> EvaluationError {
  Unresolved::Mismatch {
    expected,
    found: found.kind(),
  }
  .into()
}

/// Reduces `value` to a single string.
pub fn resolve_scalar(value: &Value) -> Result<String, EvaluationError> {
  match value.concrete()? {
    Value::String(s) => Ok(s.clone()),
    other => Err(mismatch("string", other)),
  }
}

/// Reduces `value` to a string, rendering booleans and numbers as text.
pub fn resolve_text(value: &Value) -> Result<String, EvaluationError> {
  match value.concrete()? {
    Value::String(s) => Ok(s.clone()),
    Value::Bool(b) => Ok(b.to_string()),
    Value::Int(i) => Ok(i.to_string()),
    Value::UInt(u) => Ok(u.to_string()),
    Value::Float(f) => Ok(f.to_string()),
    other => Err(mismatch("string", other)),
  }
}

/// Reduces `value` to an ordered list of strings.
///
/// Lists resolve element by element. Structs yield `key=value` entries in
/// declaration order, with boolean and numeric field values rendered as text.
pub fn resolve_sequence(value: &Value) -> Result<Vec<String>, EvaluationError> {
  match value.concrete()? {
    Value::List(items) => items
      .iter()
      .enumerate()
      .map(|(i, item)| resolve_scalar(item).map_err(|e| e.at_index(i)))
      .collect(),
    Value::Struct(fields) => fields
      .iter()
      .map(|(key, field)| {
        resolve_text(field)
          .map(|text| format!("{key}={text}"))
          .map_err(|e| e.in_field(key))
      })
      .collect(),
    other => Err(mismatch("list or struct", other)),
  }
}

const ONEOF: &str = "$oneof";
const DEFAULT: &str = "$default";
const TYPE: &str = "$type";

/// Interprets a map whose keys carry the `$` directive prefix.
fn directive(fields: Vec<(String, Value)>) -> Result<Value, String> {
  let mut candidates = None;
  let mut default = None;
  let mut type_name = None;

  for (key, value) in fields {
    match (key.as_str(), value) {
      (ONEOF, Value::List(items)) => candidates = Some(items),
      (DEFAULT, Value::Int(index)) => {
        let index = usize::try_from(index).map_err(|_| format!("negative {DEFAULT} index {index}"))?;
        default = Some(index);
      }
      (TYPE, Value::String(name)) => type_name = Some(name),
      (ONEOF | DEFAULT | TYPE, other) => {
        return Err(format!("invalid {key} directive: unexpected {}", other.kind()));
      }
      (key, _) if key.starts_with('$') => return Err(format!("unknown directive {key}")),
      (key, _) => return Err(format!("field '{key}' mixed with directive keys")),
    }
  }

  match (candidates, default, type_name) {
    (Some(candidates), default, None) => Ok(Value::Disjunction { candidates, default }),
    (None, None, Some(name)) => Ok(Value::Type(name)),
    _ => Err(format!(
      "expected either {ONEOF} (with optional {DEFAULT}) or {TYPE}"
    )),
  }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
  type Value = Value;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("a configuration value")
  }

  fn visit_unit<E>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_none<E>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
    Value::deserialize(deserializer)
  }

  fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
    Ok(Value::Bool(v))
  }

  fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
    Ok(Value::Int(v))
  }

  fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
    Ok(i64::try_from(v).map_or(Value::UInt(v), Value::Int))
  }

  fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
    Ok(Value::Float(v))
  }

  fn visit_str<E>(self, v: &str) -> Result<Value, E> {
    Ok(Value::String(v.to_string()))
  }

  fn visit_string<E>(self, v: String) -> Result<Value, E> {
    Ok(Value::String(v))
  }

  fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
    let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
    while let Some(item) = seq.next_element()? {
      items.push(item);
    }
    Ok(Value::List(items))
  }

  fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
    let mut fields: Vec<(String, Value)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
    while let Some((key, value)) = map.next_entry()? {
      fields.push((key, value));
    }

    if fields.iter().any(|(key, _)| key.starts_with('$')) {
      return directive(fields).map_err(de::Error::custom);
    }
    Ok(Value::Struct(fields))
  }
}

impl<'de> Deserialize<'de> for Value {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(ValueVisitor)
  }
}
