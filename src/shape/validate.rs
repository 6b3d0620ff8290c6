//! Shape checking: walks a JSON value against a shape and collects every issue.

use super::{Issue, IssueCode, ObjectShape, PathSegment, Shape};
use base64::Engine;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub(super) fn check(shape: &Shape, value: &Value) -> Vec<Issue> {
    let mut checker = Checker::default();
    checker.visit(shape, value);
    checker.issues
}

#[derive(Default)]
struct Checker<'s> {
    roots: Vec<&'s Shape>,
    path: Vec<PathSegment>,
    issues: Vec<Issue>,
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("decimal pattern is a valid regex")
    })
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_integer(v: &Value) -> bool {
    match v {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.is_finite() && f.fract() == 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

impl<'s> Checker<'s> {
    fn report(&mut self, code: IssueCode, message: String) {
        self.issues.push(Issue {
            path: self.path.clone(),
            code,
            message,
        });
    }

    fn mismatch(&mut self, shape: &Shape, value: &Value) {
        self.report(
            IssueCode::InvalidType,
            format!("expected {}, received {}", shape.describe(), type_name(value)),
        );
    }

    fn visit(&mut self, shape: &'s Shape, value: &Value) {
        match shape {
            Shape::Open => {}
            Shape::String => {
                if !value.is_string() {
                    self.mismatch(shape, value);
                }
            }
            Shape::Int => {
                if !is_integer(value) {
                    self.mismatch(shape, value);
                }
            }
            Shape::Float => {
                if !value.is_number() {
                    self.mismatch(shape, value);
                }
            }
            Shape::Boolean => {
                if !value.is_boolean() {
                    self.mismatch(shape, value);
                }
            }
            Shape::Null => {
                if !value.is_null() {
                    self.mismatch(shape, value);
                }
            }
            Shape::DateTime => match value {
                Value::String(s) => {
                    if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                        self.report(IssueCode::InvalidFormat, format!("invalid RFC 3339 datetime '{}'", s));
                    }
                }
                _ => self.mismatch(shape, value),
            },
            Shape::Decimal => match value {
                Value::Number(_) => {}
                Value::String(s) => {
                    if !decimal_pattern().is_match(s) {
                        self.report(IssueCode::InvalidFormat, format!("invalid decimal '{}'", s));
                    }
                }
                _ => self.mismatch(shape, value),
            },
            Shape::Bytes => match value {
                Value::String(s) => {
                    if base64::engine::general_purpose::STANDARD.decode(s).is_err() {
                        self.report(IssueCode::InvalidFormat, "invalid base64 bytes".into());
                    }
                }
                Value::Array(items) => {
                    let all_bytes = items
                        .iter()
                        .all(|b| b.as_u64().map(|n| n <= u8::MAX as u64).unwrap_or(false));
                    if !all_bytes {
                        self.report(IssueCode::InvalidFormat, "expected array of byte values (0-255)".into());
                    }
                }
                _ => self.mismatch(shape, value),
            },
            Shape::Enum(values) => match value.as_str() {
                Some(s) if values.iter().any(|v| v == s) => {}
                Some(s) => self.report(
                    IssueCode::InvalidEnumValue,
                    format!("expected one of {:?}, received '{}'", values, s),
                ),
                None => self.mismatch(shape, value),
            },
            Shape::Nullable(inner) => {
                if !value.is_null() {
                    self.visit(inner, value);
                }
            }
            Shape::Array(item) => match value {
                Value::Array(items) => {
                    for (i, v) in items.iter().enumerate() {
                        self.path.push(PathSegment::Index(i));
                        self.visit(item, v);
                        self.path.pop();
                    }
                }
                _ => self.mismatch(shape, value),
            },
            Shape::Object(obj) => self.visit_object(shape, obj, value),
            Shape::Union(options) => self.visit_union(shape, options, value),
            Shape::Recursive(inner) => {
                self.roots.push(&**inner);
                self.visit(inner, value);
                self.roots.pop();
            }
            Shape::SelfRef => {
                if let Some(root) = self.roots.last().copied() {
                    self.visit(root, value);
                }
            }
        }
    }

    fn visit_object(&mut self, shape: &'s Shape, obj: &'s ObjectShape, value: &Value) {
        let Value::Object(map) = value else {
            self.mismatch(shape, value);
            return;
        };
        for (key, prop) in &obj.properties {
            match map.get(key) {
                Some(v) => {
                    self.path.push(PathSegment::Key(key.clone()));
                    self.visit(&prop.shape, v);
                    self.path.pop();
                }
                None if !prop.optional => {
                    self.path.push(PathSegment::Key(key.clone()));
                    self.report(IssueCode::Required, format!("required {}", prop.shape.describe()));
                    self.path.pop();
                }
                None => {}
            }
        }
        if !obj.require_one_of.is_empty() && !obj.require_one_of.iter().any(|k| map.contains_key(k)) {
            self.report(
                IssueCode::MissingUniqueKey,
                format!("expected at least one of {:?}", obj.require_one_of),
            );
        }
    }

    /// Passes if any option passes. Otherwise reports the issues of the first option whose
    /// failures are all nested (it matched structurally), else one union mismatch here.
    fn visit_union(&mut self, shape: &'s Shape, options: &'s [Shape], value: &Value) {
        let outer = std::mem::take(&mut self.issues);
        let depth = self.path.len();
        let mut nested: Option<Vec<Issue>> = None;
        let mut passed = false;
        for option in options {
            self.visit(option, value);
            let attempt = std::mem::take(&mut self.issues);
            if attempt.is_empty() {
                passed = true;
                break;
            }
            if nested.is_none() && attempt.iter().all(|i| i.path.len() > depth) {
                nested = Some(attempt);
            }
        }
        self.issues = outer;
        if passed {
            return;
        }
        match nested {
            Some(issues) => self.issues.extend(issues),
            None => self.report(
                IssueCode::InvalidUnion,
                format!("expected {}, received {}", shape.describe(), type_name(value)),
            ),
        }
    }
}
