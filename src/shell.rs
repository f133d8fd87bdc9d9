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

//! Shell-style word splitting and quoting for single command lines.
//!
//! Only whitespace separation and quoting are understood; pipes,
//! redirections, globs and variable expansion are left to a real shell.

use crate::error::CommandError;
use std::borrow::Cow;

/// Splits a command line into words, stripping quotes.
///
/// A `#` is an ordinary character, also at the start of a word.
pub fn split(line: &str) -> Result<Vec<String>, CommandError> {
  shell_words::split(&escape_comments(line)).map_err(|source| CommandError::Split {
    line: line.to_string(),
    source,
  })
}

/// Backslash-escapes every unquoted `#` that starts a word, so `shell_words`
/// does not read it as a comment.
fn escape_comments(line: &str) -> Cow<'_, str> {
  if !line.contains('#') {
    return Cow::Borrowed(line);
  }

  let mut out = String::with_capacity(line.len() + 4);
  let mut quote: Option<char> = None;
  let mut escaped = false;
  let mut word_start = true;

  for c in line.chars() {
    if escaped {
      escaped = false;
    } else {
      match (quote, c) {
        (Some('\''), '\'') => quote = None,
        (Some('\''), _) => {}
        (Some(_), '\\') => escaped = true,
        (Some(_), '"') => quote = None,
        (Some(_), _) => {}
        (None, ' ' | '\t' | '\n') => {
          word_start = true;
          out.push(c);
          continue;
        }
        (None, '#') if word_start => out.push('\\'),
        (None, '\\') => escaped = true,
        (None, '\'' | '"') => quote = Some(c),
        (None, _) => {}
      }
    }
    out.push(c);
    word_start = false;
  }
  Cow::Owned(out)
}

/// Quotes a single word if it cannot be placed bare on a command line.
pub fn quote(word: &str) -> Cow<'_, str> {
  shell_words::quote(word)
}

/// Joins words into one display line, quoting each only where needed.
pub fn join<S: AsRef<str>>(words: &[S]) -> String {
  shell_words::join(words.iter().map(AsRef::as_ref))
}
