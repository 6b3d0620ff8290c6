//! Schema validation: referential integrity of unique constraints and relations.
//! Only the loader calls this; validator and router generation tolerate any schema.

use crate::config::Schema;
use crate::error::ConfigError;

pub fn validate(schema: &Schema) -> Result<(), ConfigError> {
    for (model_name, model) in &schema.models {
        if model_name.trim().is_empty() {
            return Err(ConfigError::Validation("model name must not be empty".into()));
        }

        for (field_name, field) in &model.fields {
            if field.relation.is_some() && schema.model(&field.type_).is_none() {
                return Err(ConfigError::MissingReference {
                    kind: "relation target",
                    id: format!("{}.{} -> {}", model_name, field_name, field.type_),
                });
            }
            if field.relation.is_some() && (field.is_id || field.is_foreign_key) {
                return Err(ConfigError::Validation(format!(
                    "{}.{}: relation field cannot be an id or foreign key",
                    model_name, field_name
                )));
            }
        }

        for (constraint, def) in &model.unique_fields {
            let names = def.field_names();
            if names.is_empty() {
                return Err(ConfigError::InvalidUniqueConstraint {
                    model: model_name.clone(),
                    constraint: constraint.clone(),
                    reason: "no fields".into(),
                });
            }
            for name in names {
                let field = model.fields.get(name).ok_or_else(|| ConfigError::InvalidUniqueConstraint {
                    model: model_name.clone(),
                    constraint: constraint.clone(),
                    reason: format!("unknown field '{}'", name),
                })?;
                if field.is_relation() {
                    return Err(ConfigError::InvalidUniqueConstraint {
                        model: model_name.clone(),
                        constraint: constraint.clone(),
                        reason: format!("'{}' is a relation", name),
                    });
                }
            }
        }
    }
    Ok(())
}
