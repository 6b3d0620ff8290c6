//! Runtime shape library: the primitive constructors and combinators input validators are built from.
//!
//! A [`Shape`] is plain data, built once and then used to check any number of JSON
//! inputs. Objects are pass-through: undeclared keys are never rejected. [`Shape::Open`]
//! is the explicit "unchecked" variant for sub-documents the generator does not model.

mod error;
mod validate;

pub use error::{Issue, IssueCode, PathSegment, ValidationError};

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    String,
    Int,
    Float,
    Boolean,
    /// RFC 3339 timestamp string.
    DateTime,
    /// Base64 string or array of byte values.
    Bytes,
    /// JSON number or decimal-formatted string.
    Decimal,
    Null,
    /// One of a closed set of strings.
    Enum(Vec<String>),
    Nullable(Box<Shape>),
    Array(Box<Shape>),
    Union(Vec<Shape>),
    Object(ObjectShape),
    /// Intentionally unchecked; accepts any value.
    Open,
    /// Recursion root: [`Shape::SelfRef`] inside refers back to the nearest enclosing root.
    Recursive(Box<Shape>),
    SelfRef,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectShape {
    pub properties: BTreeMap<String, Property>,
    /// When non-empty, at least one of these keys must be present.
    pub require_one_of: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub shape: Shape,
    pub optional: bool,
}

impl Shape {
    pub fn nullable(self) -> Shape {
        match self {
            Shape::Nullable(_) | Shape::Open | Shape::Null => self,
            other => Shape::Nullable(Box::new(other)),
        }
    }

    pub fn array(self) -> Shape {
        Shape::Array(Box::new(self))
    }

    /// `T | T[]`
    pub fn one_or_many(self) -> Shape {
        Shape::Union(vec![self.clone(), self.array()])
    }

    pub fn recursive(self) -> Shape {
        Shape::Recursive(Box::new(self))
    }

    pub fn enumeration<I, S>(values: I) -> Shape
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Shape::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Any object, nothing declared.
    pub fn any_object() -> Shape {
        Shape::Object(ObjectShape::default())
    }

    pub fn object(obj: ObjectShape) -> Shape {
        Shape::Object(obj)
    }

    /// Check `value`; on failure every violated path is reported.
    pub fn parse(&self, value: &serde_json::Value) -> Result<(), ValidationError> {
        let issues = validate::check(self, value);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        self.parse(value).is_ok()
    }

    /// Short type description used in messages.
    pub fn describe(&self) -> String {
        match self {
            Shape::String => "string".into(),
            Shape::Int => "integer".into(),
            Shape::Float => "number".into(),
            Shape::Boolean => "boolean".into(),
            Shape::DateTime => "datetime".into(),
            Shape::Bytes => "bytes".into(),
            Shape::Decimal => "decimal".into(),
            Shape::Null => "null".into(),
            Shape::Enum(values) => format!("one of {:?}", values),
            Shape::Nullable(inner) => format!("{} or null", inner.describe()),
            Shape::Array(_) => "array".into(),
            Shape::Union(options) => options.iter().map(Shape::describe).collect::<Vec<_>>().join(" | "),
            Shape::Object(_) | Shape::Recursive(_) | Shape::SelfRef => "object".into(),
            Shape::Open => "any".into(),
        }
    }
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, key: impl Into<String>, shape: Shape) -> Self {
        self.properties.insert(key.into(), Property { shape, optional: false });
        self
    }

    pub fn optional(mut self, key: impl Into<String>, shape: Shape) -> Self {
        self.properties.insert(key.into(), Property { shape, optional: true });
        self
    }

    pub fn field(self, key: impl Into<String>, shape: Shape, optional: bool) -> Self {
        if optional {
            self.optional(key, shape)
        } else {
            self.required(key, shape)
        }
    }

    pub fn require_one_of(mut self, keys: Vec<String>) -> Self {
        self.require_one_of = keys;
        self
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nullable_is_idempotent() {
        assert_eq!(Shape::String.nullable().nullable(), Shape::Nullable(Box::new(Shape::String)));
        assert_eq!(Shape::Open.nullable(), Shape::Open);
    }

    #[test]
    fn describe_union() {
        assert_eq!(Shape::String.one_or_many().describe(), "string | array");
    }

    #[test]
    fn accepts_helper() {
        let obj = Shape::object(ObjectShape::new().required("name", Shape::String));
        assert!(obj.accepts(&json!({ "name": "a", "extra": 1 })));
        assert!(!obj.accepts(&json!({})));
    }
}
