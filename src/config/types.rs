//! Raw schema metadata types matching the JSON emitted by the ORM metadata provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// Model name -> model metadata. Supplied once at generation time, never mutated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Schema {
    pub models: BTreeMap<String, ModelMeta>,
}

impl Schema {
    pub fn model(&self, name: &str) -> Option<&ModelMeta> {
        self.models.get(name)
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeta {
    pub fields: BTreeMap<String, FieldDef>,
    /// Unique-constraint name -> the field(s) it covers.
    #[serde(default)]
    pub unique_fields: BTreeMap<String, UniqueFieldDef>,
}

/// Scalar type tag. Relation fields carry their target model name in `type`, which parses as `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScalarType {
    String,
    #[strum(to_string = "int", serialize = "bigint")]
    Int,
    Float,
    Boolean,
    DateTime,
    Json,
    Bytes,
    Decimal,
    Unknown,
}

impl ScalarType {
    /// Parse a metadata type name (`"String"`, `"DateTime"`, `"BigInt"`, ...). Never fails.
    pub fn from_type_name(name: &str) -> Self {
        name.parse().unwrap_or(ScalarType::Unknown)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Int | ScalarType::Float | ScalarType::Decimal)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Scalar type name, or the target model name for relation fields.
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default)]
    pub is_updated_at: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub relation: Option<RelationDescriptor>,
}

impl FieldDef {
    pub fn scalar(ty: ScalarType) -> Self {
        Self {
            type_: ty.to_string(),
            is_array: false,
            is_optional: false,
            has_default: false,
            is_id: false,
            is_updated_at: false,
            is_foreign_key: false,
            relation: None,
        }
    }

    pub fn relation(target: &str) -> Self {
        Self {
            relation: Some(RelationDescriptor::default()),
            ..Self::scalar(ScalarType::Unknown)
        }
        .with_type_name(target)
    }

    fn with_type_name(mut self, name: &str) -> Self {
        self.type_ = name.to_string();
        self
    }

    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn updated_at(mut self) -> Self {
        self.is_updated_at = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

/// Marks a field as referencing another model.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDescriptor {
    /// Back-reference field on the target model.
    #[serde(default)]
    pub opposite: Option<String>,
    /// Local foreign-key fields (owning side only).
    #[serde(default)]
    pub fields: Vec<String>,
    /// Referenced fields on the target model.
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniqueFieldDef {
    Single(String),
    Compound(Vec<String>),
}

impl UniqueFieldDef {
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            UniqueFieldDef::Single(s) => vec![s.as_str()],
            UniqueFieldDef::Compound(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_metadata_type_names() {
        assert_eq!(ScalarType::from_type_name("String"), ScalarType::String);
        assert_eq!(ScalarType::from_type_name("DateTime"), ScalarType::DateTime);
        assert_eq!(ScalarType::from_type_name("BigInt"), ScalarType::Int);
        assert_eq!(ScalarType::from_type_name("Post"), ScalarType::Unknown);
    }

    #[test]
    fn deserializes_camel_case_model() {
        let model: ModelMeta = serde_json::from_value(json!({
            "fields": {
                "id": { "type": "String", "isId": true, "hasDefault": true },
                "posts": { "type": "Post", "isArray": true, "relation": { "opposite": "author" } }
            },
            "uniqueFields": {
                "id": "id",
                "org_slug": ["orgId", "slug"]
            }
        }))
        .unwrap();
        assert!(model.fields["id"].is_id);
        assert!(model.fields["posts"].is_relation());
        assert_eq!(model.fields["posts"].type_, "Post");
        assert_eq!(model.unique_fields["id"], UniqueFieldDef::Single("id".into()));
        assert_eq!(model.unique_fields["org_slug"].field_names(), vec!["orgId", "slug"]);
    }
}
