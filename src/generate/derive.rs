//! Per-API generator settings read from `BUILD.bazel` rules
//!
//! Only the handful of attributes the generator needs are extracted from the
//! language's `*_gapic_library` call. The format is Starlark; the reader
//! understands strings, booleans, lists of strings and comments, and skips
//! anything else.

use crate::core::config::Language;
use crate::core::error::{LibrarianError, LibrarianResult, ResultExt};
use crate::state::artifact::ApiConfig;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Build rule file read from each API directory
pub const BUILD_FILE: &str = "BUILD.bazel";

/// Read-only access to the build rules of an API directory
pub trait BuildRuleSource {
  /// Contents of the build description for `api_path`, if there is one
  fn read(&self, api_path: &str) -> LibrarianResult<Option<String>>;
}

/// Build rules from a checkout of the API definitions repository
pub struct DirectorySource {
  root: PathBuf,
}

impl DirectorySource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl BuildRuleSource for DirectorySource {
  fn read(&self, api_path: &str) -> LibrarianResult<Option<String>> {
    let file = self.root.join(api_path).join(BUILD_FILE);
    match fs::read_to_string(&file) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(LibrarianError::from(e).context(format!("Failed to read {}", file.display()))),
    }
  }
}

/// Name of the client generation rule for `language`
pub fn rule_name(language: Language) -> Option<&'static str> {
  match language {
    Language::Go => Some("go_gapic_library"),
    Language::Python => Some("py_gapic_library"),
    Language::Rust => Some("rust_gapic_library"),
    Language::Dart => Some("dart_gapic_library"),
    Language::None => None,
  }
}

/// Settings for `api_path`, or `None` when it has no client rule for `language`
pub fn derive_api_config(
  source: &dyn BuildRuleSource,
  api_path: &str,
  language: Language,
) -> LibrarianResult<Option<ApiConfig>> {
  let Some(rule) = rule_name(language) else {
    return Ok(None);
  };
  let Some(content) = source.read(api_path)? else {
    return Ok(None);
  };

  let attributes = find_rule(&content, rule)
    .with_context(|| format!("Failed to read {} rule for {}", rule, api_path))?;
  let Some(attributes) = attributes else {
    return Ok(None);
  };

  let mut api = ApiConfig::bare(api_path);
  for (name, value) in attributes {
    match (name.as_str(), value) {
      ("transport", Value::Str(s)) => api.transport = s,
      ("service_yaml", Value::Str(s)) => api.service_config = strip_label(&s),
      ("grpc_service_config", Value::Str(s)) => api.grpc_service_config = strip_label(&s),
      ("rest_numeric_enums", Value::Bool(b)) => api.numeric_enums = b,
      ("opt_args", Value::List(items)) => api.options = items,
      _ => {}
    }
  }
  Ok(Some(api))
}

/// `:foo.yaml` -> `foo.yaml`
fn strip_label(value: &str) -> String {
  value.strip_prefix(':').unwrap_or(value).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
  Str(String),
  Bool(bool),
  List(Vec<String>),
  Other,
}

/// Attributes of the first call to `rule`, in source order
///
/// Rules are top-level statements, so only a call opening a line counts.
fn find_rule(content: &str, rule: &str) -> LibrarianResult<Option<Vec<(String, Value)>>> {
  let call = regex(&format!(r"(?m)^[ \t]*{}\s*\(", regex::escape(rule)))?;
  let Some(found) = call.find(content) else {
    return Ok(None);
  };
  let Some((close, commas)) = scan_call(content, found.end()) else {
    return Ok(None);
  };

  let attribute = regex(r"(?s)^\s*(?:#[^\n]*\n\s*)*([A-Za-z_]\w*)\s*=\s*(.*?)\s*$")?;
  let strings = regex(r#""([^"]*)"|'([^']*)'"#)?;

  let mut bounds = vec![found.end()];
  bounds.extend(commas.iter().map(|c| c + 1));
  let ends = commas.iter().copied().chain(std::iter::once(close));

  let mut attributes = Vec::new();
  for (start, end) in bounds.into_iter().zip(ends) {
    let Some(caps) = attribute.captures(&content[start..end]) else {
      continue;
    };
    let raw = strip_comments(&caps[2]);
    attributes.push((caps[1].to_string(), parse_value(raw.trim(), &strings)));
  }
  Ok(Some(attributes))
}

fn regex(pattern: &str) -> LibrarianResult<Regex> {
  Regex::new(pattern).map_err(|e| LibrarianError::message(format!("invalid pattern {}: {}", pattern, e)))
}

fn parse_value(raw: &str, strings: &Regex) -> Value {
  match raw {
    "True" => return Value::Bool(true),
    "False" => return Value::Bool(false),
    _ => {}
  }

  if raw.starts_with('[') && raw.ends_with(']') {
    let items = strings
      .captures_iter(raw)
      .filter_map(|c| c.get(1).or_else(|| c.get(2)))
      .map(|m| m.as_str().to_string())
      .collect();
    return Value::List(items);
  }

  if let Some(caps) = strings.captures(raw)
    && caps.get(0).is_some_and(|m| m.start() == 0 && m.end() == raw.len())
    && let Some(m) = caps.get(1).or_else(|| caps.get(2))
  {
    return Value::Str(m.as_str().to_string());
  }

  Value::Other
}

/// Drop `#` comments that are not inside a string literal
fn strip_comments(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut quote = None;
  let mut in_comment = false;
  for ch in raw.chars() {
    if in_comment {
      if ch == '\n' {
        in_comment = false;
        out.push(ch);
      }
      continue;
    }
    match (quote, ch) {
      (None, '#') => in_comment = true,
      (None, '"' | '\'') => {
        quote = Some(ch);
        out.push(ch);
      }
      (Some(q), c) if c == q => {
        quote = None;
        out.push(ch);
      }
      _ => out.push(ch),
    }
  }
  out
}

/// Offsets of the closing paren and the top-level commas of a call body
///
/// `open` is the offset just past the opening paren.
fn scan_call(text: &str, open: usize) -> Option<(usize, Vec<usize>)> {
  let bytes = text.as_bytes();
  let mut depth = 0usize;
  let mut quote: Option<u8> = None;
  let mut commas = Vec::new();
  let mut i = open;

  while i < bytes.len() {
    let b = bytes[i];
    if let Some(q) = quote {
      if b == b'\\' {
        i += 2;
        continue;
      }
      if b == q {
        quote = None;
      }
    } else {
      match b {
        b'"' | b'\'' => quote = Some(b),
        b'#' => {
          while i < bytes.len() && bytes[i] != b'\n' {
            i += 1;
          }
          continue;
        }
        b'(' | b'[' | b'{' => depth += 1,
        b')' | b']' | b'}' => {
          if depth == 0 {
            return Some((i, commas));
          }
          depth -= 1;
        }
        b',' if depth == 0 => commas.push(i),
        _ => {}
      }
    }
    i += 1;
  }
  None
}
