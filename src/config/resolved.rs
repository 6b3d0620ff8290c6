//! Resolved model: raw field metadata flattened into an explicit scalar/relation descriptor.

use crate::config::{ModelMeta, Schema, ScalarType, UniqueFieldDef};

/// A field is a scalar xor a relation, decided by the presence of a relation descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Scalar { ty: ScalarType, is_array: bool },
    Relation { target: String, is_array: bool },
}

#[derive(Clone, Debug)]
pub struct ResolvedField {
    pub name: String,
    pub kind: FieldKind,
    pub is_optional: bool,
    pub has_default: bool,
    pub is_id: bool,
    pub is_updated_at: bool,
    pub is_foreign_key: bool,
}

impl ResolvedField {
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation { .. })
    }

    /// Omittable on create: the store or a relation connect can supply the value.
    pub fn optional_on_create(&self) -> bool {
        self.is_optional || self.has_default || self.is_id || self.is_updated_at || self.is_foreign_key
    }

    /// Never accepted as a validated update value.
    pub fn excluded_from_update(&self) -> bool {
        self.is_id || self.has_default || self.is_updated_at
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UniqueKey {
    Single { name: String, field: String },
    Compound { name: String, fields: Vec<String> },
}

impl UniqueKey {
    pub fn name(&self) -> &str {
        match self {
            UniqueKey::Single { name, .. } | UniqueKey::Compound { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedModel {
    pub name: String,
    /// Declaration order of the metadata map (sorted by name).
    pub fields: Vec<ResolvedField>,
    pub unique_keys: Vec<UniqueKey>,
}

impl ResolvedModel {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn scalars(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(|f| !f.is_relation())
    }

    pub fn relations(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(|f| f.is_relation())
    }

    pub fn scalar_names(&self) -> Vec<String> {
        self.scalars().map(|f| f.name.clone()).collect()
    }
}

/// Resolve one model by name. Returns None when the schema does not declare it.
pub fn resolve_model(schema: &Schema, model_name: &str) -> Option<ResolvedModel> {
    schema.model(model_name).map(|meta| resolve_meta(model_name, meta))
}

fn resolve_meta(model_name: &str, meta: &ModelMeta) -> ResolvedModel {
    let fields: Vec<ResolvedField> = meta
        .fields
        .iter()
        .map(|(name, def)| {
            let kind = match &def.relation {
                Some(_) => FieldKind::Relation {
                    target: def.type_.clone(),
                    is_array: def.is_array,
                },
                None => FieldKind::Scalar {
                    ty: ScalarType::from_type_name(&def.type_),
                    is_array: def.is_array,
                },
            };
            ResolvedField {
                name: name.clone(),
                kind,
                is_optional: def.is_optional,
                has_default: def.has_default,
                is_id: def.is_id,
                is_updated_at: def.is_updated_at,
                is_foreign_key: def.is_foreign_key,
            }
        })
        .collect();

    let mut unique_keys: Vec<UniqueKey> = meta
        .unique_fields
        .iter()
        .map(|(name, def)| match def {
            UniqueFieldDef::Single(field) => UniqueKey::Single {
                name: name.clone(),
                field: field.clone(),
            },
            UniqueFieldDef::Compound(fields) => UniqueKey::Compound {
                name: name.clone(),
                fields: fields.clone(),
            },
        })
        .collect();

    // Identifier fields are always addressable as unique keys.
    for f in fields.iter().filter(|f| f.is_id && !f.is_relation()) {
        if !unique_keys.iter().any(|k| k.name() == f.name) {
            unique_keys.push(UniqueKey::Single {
                name: f.name.clone(),
                field: f.name.clone(),
            });
        }
    }

    ResolvedModel {
        name: model_name.to_string(),
        fields,
        unique_keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldDef;

    fn schema() -> Schema {
        let mut user = ModelMeta::default();
        user.fields.insert("id".into(), FieldDef::scalar(ScalarType::String).id().with_default());
        user.fields.insert("email".into(), FieldDef::scalar(ScalarType::String));
        user.fields.insert("posts".into(), FieldDef::relation("Post").array());
        user.unique_fields.insert("email".into(), UniqueFieldDef::Single("email".into()));
        let mut s = Schema::default();
        s.models.insert("User".into(), user);
        s
    }

    #[test]
    fn classifies_by_relation_descriptor() {
        let m = resolve_model(&schema(), "User").unwrap();
        assert_eq!(
            m.field("posts").unwrap().kind,
            FieldKind::Relation { target: "Post".into(), is_array: true }
        );
        assert_eq!(
            m.field("email").unwrap().kind,
            FieldKind::Scalar { ty: ScalarType::String, is_array: false }
        );
        assert_eq!(m.scalar_names(), vec!["email".to_string(), "id".to_string()]);
    }

    #[test]
    fn id_fields_become_unique_keys() {
        let m = resolve_model(&schema(), "User").unwrap();
        let names: Vec<_> = m.unique_keys.iter().map(UniqueKey::name).collect();
        assert_eq!(names, vec!["email", "id"]);
    }

    #[test]
    fn unknown_model_is_none() {
        assert!(resolve_model(&schema(), "Ghost").is_none());
    }

    #[test]
    fn create_and_update_flags() {
        let m = resolve_model(&schema(), "User").unwrap();
        let id = m.field("id").unwrap();
        assert!(id.optional_on_create());
        assert!(id.excluded_from_update());
        let email = m.field("email").unwrap();
        assert!(!email.optional_on_create());
        assert!(!email.excluded_from_update());
    }
}
