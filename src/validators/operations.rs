//! Per-operation request envelopes assembled from the model primitives.

use crate::config::Schema;
use crate::operation::Operation;
use crate::shape::{ObjectShape, Shape};
use crate::validators::Primitives;
use std::collections::BTreeMap;

const AGGREGATE_SELECTORS: [&str; 5] = ["_count", "_avg", "_sum", "_min", "_max"];

/// Operation -> input validator for one model. Always holds all 13 operations.
#[derive(Clone, Debug)]
pub struct OperationValidatorSet {
    pub model: String,
    validators: BTreeMap<Operation, Shape>,
}

impl OperationValidatorSet {
    pub fn get(&self, op: Operation) -> &Shape {
        // Every constructor fills all operations.
        &self.validators[&op]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operation, &Shape)> {
        self.validators.iter().map(|(op, shape)| (*op, shape))
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<Operation, Shape> {
        self.validators
    }
}

/// Build the validator for every operation of `model_name`.
/// A model missing from the schema gets pass-through validators; this never fails.
pub fn operation_validators(schema: &Schema, model_name: &str) -> OperationValidatorSet {
    if schema.model(model_name).is_none() {
        tracing::warn!(model = %model_name, "model not in schema, using pass-through validators");
    }
    let primitives = Primitives::for_model(schema, model_name);
    let validators = Operation::all().map(|op| (op, envelope(&primitives, op))).collect();
    OperationValidatorSet {
        model: model_name.to_string(),
        validators,
    }
}

pub fn input_validator(schema: &Schema, model_name: &str, op: Operation) -> Shape {
    envelope(&Primitives::for_model(schema, model_name), op)
}

fn with_aggregates(obj: ObjectShape) -> ObjectShape {
    AGGREGATE_SELECTORS
        .iter()
        .fold(obj, |obj, sel| obj.optional(*sel, Shape::Open))
}

/// Optional envelope: the whole input may be omitted (null).
fn optional_envelope(obj: ObjectShape) -> Shape {
    Shape::object(obj).nullable()
}

pub fn envelope(p: &Primitives, op: Operation) -> Shape {
    if p.pass_through {
        return Shape::Open;
    }
    match op {
        Operation::FindMany => optional_envelope(
            ObjectShape::new()
                .optional("where", p.where_.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone())
                .optional("orderBy", p.order_by.clone())
                .optional("skip", Shape::Int)
                .optional("take", Shape::Int)
                .optional("cursor", p.unique_where.clone())
                .optional("distinct", p.scalar_field_names.clone()),
        ),
        Operation::FindUnique => Shape::object(
            ObjectShape::new()
                .required("where", p.unique_where.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone()),
        ),
        Operation::FindFirst => optional_envelope(
            ObjectShape::new()
                .optional("where", p.where_.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone())
                .optional("orderBy", p.order_by.clone())
                .optional("skip", Shape::Int)
                .optional("cursor", p.unique_where.clone()),
        ),
        Operation::Create => Shape::object(
            ObjectShape::new()
                .required("data", p.create_data.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone()),
        ),
        Operation::CreateMany => Shape::object(
            ObjectShape::new()
                .required("data", p.create_data.clone().one_or_many())
                .optional("skipDuplicates", Shape::Boolean),
        ),
        Operation::Update => Shape::object(
            ObjectShape::new()
                .required("where", p.unique_where.clone())
                .required("data", p.update_data.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone()),
        ),
        Operation::UpdateMany => Shape::object(
            ObjectShape::new()
                .required("data", p.update_data.clone())
                .optional("where", p.where_.clone())
                .optional("limit", Shape::Int),
        ),
        Operation::Upsert => Shape::object(
            ObjectShape::new()
                .required("where", p.unique_where.clone())
                .required("create", p.create_data.clone())
                .required("update", p.update_data.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone()),
        ),
        Operation::Delete => Shape::object(
            ObjectShape::new()
                .required("where", p.unique_where.clone())
                .optional("select", p.select.clone())
                .optional("include", p.include.clone()),
        ),
        Operation::DeleteMany => optional_envelope(
            ObjectShape::new()
                .optional("where", p.where_.clone())
                .optional("limit", Shape::Int),
        ),
        Operation::Count => optional_envelope(
            ObjectShape::new()
                .optional("where", p.where_.clone())
                .optional("cursor", p.unique_where.clone())
                .optional("skip", Shape::Int)
                .optional("take", Shape::Int)
                .optional("orderBy", p.order_by.clone())
                .optional("select", p.select.clone()),
        ),
        Operation::Aggregate => Shape::object(with_aggregates(
            ObjectShape::new()
                .optional("where", p.where_.clone())
                .optional("cursor", p.unique_where.clone())
                .optional("skip", Shape::Int)
                .optional("take", Shape::Int)
                .optional("orderBy", p.order_by.clone()),
        )),
        Operation::GroupBy => Shape::object(with_aggregates(
            ObjectShape::new()
                .required("by", p.scalar_field_names.clone())
                .optional("where", p.where_.clone())
                .optional("having", Shape::Open)
                .optional("orderBy", p.order_by.clone())
                .optional("skip", Shape::Int)
                .optional("take", Shape::Int),
        )),
    }
}
