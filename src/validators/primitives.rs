//! The seven per-model input primitives every operation envelope is assembled from.

use crate::config::{resolve_model, FieldKind, ResolvedField, ResolvedModel, ScalarType, Schema, UniqueKey};
use crate::shape::{ObjectShape, Shape};

const SORT_ORDER: [&str; 2] = ["asc", "desc"];
const STRING_MODE: [&str; 2] = ["default", "insensitive"];
const CREATE_RELATION_OPS: [&str; 3] = ["create", "connect", "connectOrCreate"];
const UPDATE_RELATION_OPS: [&str; 10] = [
    "create",
    "connect",
    "connectOrCreate",
    "disconnect",
    "delete",
    "update",
    "updateMany",
    "deleteMany",
    "set",
    "upsert",
];
const NUMBER_UPDATE_OPS: [&str; 4] = ["increment", "decrement", "multiply", "divide"];

/// All seven primitives for one model, built together so envelopes can share them.
#[derive(Clone, Debug)]
pub struct Primitives {
    pub where_: Shape,
    pub create_data: Shape,
    pub update_data: Shape,
    pub unique_where: Shape,
    pub select: Shape,
    pub include: Shape,
    pub order_by: Shape,
    /// Scalar field name, or list of them (`distinct`, `groupBy.by`).
    pub scalar_field_names: Shape,
    /// Built for a model the schema does not declare; every envelope is pass-through.
    pub pass_through: bool,
}

impl Primitives {
    pub fn build(model: &ResolvedModel) -> Self {
        Self {
            where_: where_shape(model),
            create_data: create_data_shape(model),
            update_data: update_data_shape(model),
            unique_where: unique_where_shape(model),
            select: select_shape(model),
            include: include_shape(model),
            order_by: order_by_shape(model),
            scalar_field_names: Shape::enumeration(model.scalar_names()).one_or_many(),
            pass_through: false,
        }
    }

    /// Pass-through primitives for a model the schema does not declare.
    pub fn open() -> Self {
        Self {
            where_: Shape::Open,
            create_data: Shape::Open,
            update_data: Shape::Open,
            unique_where: Shape::Open,
            select: Shape::Open,
            include: Shape::Open,
            order_by: Shape::Open,
            scalar_field_names: Shape::Open,
            pass_through: true,
        }
    }

    pub fn for_model(schema: &Schema, model_name: &str) -> Self {
        match resolve_model(schema, model_name) {
            Some(model) => Self::build(&model),
            None => Self::open(),
        }
    }
}

pub fn where_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| where_shape(&m)).unwrap_or(Shape::Open)
}

pub fn create_data_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| create_data_shape(&m)).unwrap_or(Shape::Open)
}

pub fn update_data_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| update_data_shape(&m)).unwrap_or(Shape::Open)
}

pub fn unique_where_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| unique_where_shape(&m)).unwrap_or(Shape::Open)
}

pub fn select_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| select_shape(&m)).unwrap_or(Shape::Open)
}

pub fn include_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| include_shape(&m)).unwrap_or(Shape::Open)
}

pub fn order_by_input(schema: &Schema, model_name: &str) -> Shape {
    resolve_model(schema, model_name).map(|m| order_by_shape(&m)).unwrap_or(Shape::Open)
}

fn scalar_value(ty: ScalarType) -> Shape {
    match ty {
        ScalarType::String => Shape::String,
        ScalarType::Int => Shape::Int,
        ScalarType::Float => Shape::Float,
        ScalarType::Boolean => Shape::Boolean,
        ScalarType::DateTime => Shape::DateTime,
        ScalarType::Bytes => Shape::Bytes,
        ScalarType::Decimal => Shape::Decimal,
        ScalarType::Json | ScalarType::Unknown => Shape::Open,
    }
}

fn field_value(ty: ScalarType, is_array: bool) -> Shape {
    let value = scalar_value(ty);
    if is_array {
        value.array()
    } else {
        value
    }
}

/// Value accepted in create/update data: null allowed only for optional fields.
fn data_value(field: &ResolvedField, ty: ScalarType, is_array: bool) -> Shape {
    let value = field_value(ty, is_array);
    if field.is_optional {
        value.nullable()
    } else {
        value
    }
}

fn open_ops(ops: &[&str]) -> Shape {
    let obj = ops.iter().fold(ObjectShape::new(), |obj, op| obj.optional(*op, Shape::Open));
    Shape::object(obj)
}

fn scalar_filter(ty: ScalarType, is_array: bool) -> Shape {
    let element = scalar_value(ty);
    let filter = if is_array {
        let list = element.clone().array();
        ObjectShape::new()
            .optional("equals", list.clone().nullable())
            .optional("has", element.nullable())
            .optional("hasEvery", list.clone())
            .optional("hasSome", list)
            .optional("isEmpty", Shape::Boolean)
    } else {
        let mut obj = ObjectShape::new()
            .optional("equals", element.clone().nullable())
            .optional("not", Shape::Union(vec![element.clone(), Shape::Null, Shape::SelfRef]))
            .optional("in", element.clone().array())
            .optional("notIn", element.clone().array())
            .optional("lt", element.clone())
            .optional("lte", element.clone())
            .optional("gt", element.clone())
            .optional("gte", element)
            .optional("contains", Shape::String)
            .optional("startsWith", Shape::String)
            .optional("endsWith", Shape::String);
        if ty == ScalarType::String {
            obj = obj.optional("mode", Shape::enumeration(STRING_MODE));
        }
        obj
    };
    Shape::object(filter).recursive()
}

fn where_shape(model: &ResolvedModel) -> Shape {
    let mut obj = ObjectShape::new();
    for field in &model.fields {
        let shape = match &field.kind {
            FieldKind::Scalar { ty, is_array } => Shape::Union(vec![
                field_value(*ty, *is_array),
                Shape::Null,
                scalar_filter(*ty, *is_array),
            ]),
            // Nested relation filters are forwarded unchecked.
            FieldKind::Relation { .. } => Shape::Open,
        };
        obj = obj.optional(field.name.as_str(), shape);
    }
    obj = obj
        .optional("AND", Shape::SelfRef.one_or_many())
        .optional("OR", Shape::SelfRef.array())
        .optional("NOT", Shape::SelfRef.one_or_many());
    Shape::object(obj).recursive()
}

fn create_data_shape(model: &ResolvedModel) -> Shape {
    let mut obj = ObjectShape::new();
    for field in &model.fields {
        obj = match &field.kind {
            FieldKind::Scalar { ty, is_array } => {
                obj.field(field.name.as_str(), data_value(field, *ty, *is_array), field.optional_on_create())
            }
            FieldKind::Relation { .. } => obj.optional(field.name.as_str(), open_ops(&CREATE_RELATION_OPS)),
        };
    }
    Shape::object(obj)
}

fn update_data_shape(model: &ResolvedModel) -> Shape {
    let mut obj = ObjectShape::new();
    for field in model.fields.iter().filter(|f| !f.excluded_from_update()) {
        let shape = match &field.kind {
            FieldKind::Scalar { ty, is_array } => {
                let value = data_value(field, *ty, *is_array);
                let mut ops = ObjectShape::new().optional("set", value.clone());
                if ty.is_numeric() && !is_array {
                    for op in NUMBER_UPDATE_OPS {
                        ops = ops.optional(op, scalar_value(*ty));
                    }
                }
                Shape::Union(vec![value, Shape::object(ops)])
            }
            FieldKind::Relation { .. } => open_ops(&UPDATE_RELATION_OPS),
        };
        obj = obj.optional(field.name.as_str(), shape);
    }
    Shape::object(obj)
}

fn unique_component(model: &ResolvedModel, name: &str) -> Shape {
    match model.field(name).map(|f| &f.kind) {
        Some(FieldKind::Scalar { ty, is_array }) => field_value(*ty, *is_array),
        _ => Shape::Open,
    }
}

fn unique_where_shape(model: &ResolvedModel) -> Shape {
    let mut obj = ObjectShape::new();
    for key in &model.unique_keys {
        obj = match key {
            UniqueKey::Single { name, field } => obj.optional(name.as_str(), unique_component(model, field).nullable()),
            UniqueKey::Compound { name, fields } => {
                let inner = fields
                    .iter()
                    .fold(ObjectShape::new(), |inner, f| inner.required(f.as_str(), unique_component(model, f)));
                obj.optional(name.as_str(), Shape::object(inner))
            }
        };
    }
    let keys: Vec<String> = model.unique_keys.iter().map(|k| k.name().to_string()).collect();
    Shape::object(obj.require_one_of(keys))
}

fn nested_or_flag() -> Shape {
    Shape::Union(vec![Shape::Boolean, Shape::any_object()])
}

fn select_shape(model: &ResolvedModel) -> Shape {
    let obj = model.fields.iter().fold(ObjectShape::new(), |obj, f| {
        let shape = if f.is_relation() { nested_or_flag() } else { Shape::Boolean };
        obj.optional(f.name.as_str(), shape)
    });
    Shape::object(obj)
}

fn include_shape(model: &ResolvedModel) -> Shape {
    let obj = model
        .relations()
        .fold(ObjectShape::new(), |obj, f| obj.optional(f.name.as_str(), nested_or_flag()));
    Shape::object(obj)
}

fn order_by_shape(model: &ResolvedModel) -> Shape {
    let obj = model
        .scalars()
        .fold(ObjectShape::new(), |obj, f| obj.optional(f.name.as_str(), Shape::enumeration(SORT_ORDER)));
    Shape::object(obj).one_or_many()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldDef, ModelMeta, UniqueFieldDef};
    use serde_json::json;

    /// User{id(auto), email(required, unique), name(optional), age(int, optional), posts(relation)}
    fn schema() -> Schema {
        let mut user = ModelMeta::default();
        user.fields.insert("id".into(), FieldDef::scalar(ScalarType::String).id().with_default());
        user.fields.insert("email".into(), FieldDef::scalar(ScalarType::String));
        user.fields.insert("name".into(), FieldDef::scalar(ScalarType::String).optional());
        user.fields.insert("age".into(), FieldDef::scalar(ScalarType::Int).optional());
        user.fields.insert("tags".into(), FieldDef::scalar(ScalarType::String).array().with_default());
        user.fields.insert("updatedAt".into(), FieldDef::scalar(ScalarType::DateTime).updated_at());
        user.fields.insert("posts".into(), FieldDef::relation("Post").array());
        user.unique_fields.insert("email".into(), UniqueFieldDef::Single("email".into()));

        let mut post = ModelMeta::default();
        post.fields.insert("id".into(), FieldDef::scalar(ScalarType::Int).id().with_default());
        post.fields.insert("slug".into(), FieldDef::scalar(ScalarType::String));
        post.fields.insert("authorId".into(), FieldDef::scalar(ScalarType::String).foreign_key());
        post.fields.insert("author".into(), FieldDef::relation("User"));
        post.unique_fields.insert(
            "authorId_slug".into(),
            UniqueFieldDef::Compound(vec!["authorId".into(), "slug".into()]),
        );

        let mut s = Schema::default();
        s.models.insert("User".into(), user);
        s.models.insert("Post".into(), post);
        s
    }

    #[test]
    fn minimal_create() {
        let data = create_data_input(&schema(), "User");
        assert!(data.accepts(&json!({ "email": "a@b.com" })));
        let err = data.parse(&json!({})).unwrap_err();
        assert_eq!(err.paths(), vec!["email".to_string()]);
    }

    #[test]
    fn create_nulls_only_for_optional_fields() {
        let data = create_data_input(&schema(), "User");
        assert!(data.accepts(&json!({ "email": "a@b.com", "name": null })));
        assert!(data.parse(&json!({ "email": null })).unwrap_err().has_path("email"));
    }

    #[test]
    fn foreign_keys_optional_on_create() {
        let data = create_data_input(&schema(), "Post");
        assert!(data.accepts(&json!({ "slug": "hello", "author": { "connect": { "id": "u1" } } })));
        assert!(data.accepts(&json!({ "slug": "hello", "authorId": "u1" })));
    }

    #[test]
    fn update_excludes_id_default_and_updated_at() {
        let update = update_data_input(&schema(), "User");
        let Shape::Object(obj) = &update else { panic!("update data is an object") };
        assert!(!obj.contains("id"));
        assert!(!obj.contains("tags"));
        assert!(!obj.contains("updatedAt"));
        assert!(obj.properties.values().all(|p| p.optional));
        // Excluded fields pass through unvalidated.
        assert!(update.accepts(&json!({ "id": 42 })));
    }

    #[test]
    fn update_value_or_operation() {
        let update = update_data_input(&schema(), "User");
        assert!(update.accepts(&json!({ "age": { "increment": 1 } })));
        assert!(update.accepts(&json!({ "name": { "set": null } })));
        assert!(update.accepts(&json!({ "posts": { "disconnect": [{ "id": 1 }] } })));
        assert!(!update.accepts(&json!({ "age": "old" })));
    }

    #[test]
    fn unique_lookup() {
        let unique = unique_where_input(&schema(), "User");
        assert!(unique.accepts(&json!({ "id": "123" })));
        assert!(unique.accepts(&json!({ "email": "a@b.com" })));
        assert!(!unique.accepts(&json!({ "name": "x" })));
    }

    #[test]
    fn compound_unique_validates_components() {
        let unique = unique_where_input(&schema(), "Post");
        assert!(unique.accepts(&json!({ "authorId_slug": { "authorId": "u1", "slug": "s" } })));
        let err = unique.parse(&json!({ "authorId_slug": { "slug": "s" } })).unwrap_err();
        assert!(err.has_path("authorId_slug.authorId"));
    }

    #[test]
    fn logical_filters() {
        let w = where_input(&schema(), "User");
        assert!(w.accepts(&json!({ "AND": [{ "email": "a@b.com" }, { "name": "Alice" }] })));
        let err = w.parse(&json!({ "AND": [{ "age": "twelve" }] })).unwrap_err();
        assert!(err.has_path("AND.0.age"));
    }

    #[test]
    fn operator_filters() {
        let w = where_input(&schema(), "User");
        assert!(w.accepts(&json!({ "email": { "contains": "@", "mode": "insensitive" } })));
        assert!(w.accepts(&json!({ "age": { "gte": 18, "not": { "in": [30, 40] } } })));
        assert!(w.accepts(&json!({ "name": null, "tags": { "has": "x" } })));
        assert!(w.accepts(&json!({ "posts": { "some": { "title": { "contains": "rust" } } } })));
        assert!(!w.accepts(&json!({ "age": { "in": ["a"] } })));
    }

    #[test]
    fn create_value_round_trips_into_where() {
        let data = create_data_input(&schema(), "User");
        let w = where_input(&schema(), "User");
        let email = json!("a@b.com");
        assert!(data.accepts(&json!({ "email": email })));
        assert!(w.accepts(&json!({ "email": email })));
        assert!(w.accepts(&json!({ "email": { "equals": email } })));
    }

    #[test]
    fn include_and_select() {
        let include = include_input(&schema(), "User");
        assert!(include.accepts(&json!({ "posts": true })));
        assert!(include.accepts(&json!({ "posts": { "where": { "slug": "x" } } })));
        let Shape::Object(obj) = &include else { panic!("include is an object") };
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["posts"]);

        let select = select_input(&schema(), "User");
        assert!(select.accepts(&json!({ "email": true, "posts": { "select": { "id": true } } })));
        assert!(!select.accepts(&json!({ "email": { "select": {} } })));
    }

    #[test]
    fn order_by_scalars_only() {
        let order = order_by_input(&schema(), "User");
        assert!(order.accepts(&json!({ "email": "asc" })));
        assert!(order.accepts(&json!([{ "email": "asc" }, { "age": "desc" }])));
        assert!(!order.accepts(&json!({ "email": "up" })));
        let Shape::Union(options) = &order else { panic!("order by is a union") };
        let Shape::Object(obj) = &options[0] else { panic!("ordering object") };
        assert!(!obj.contains("posts"));
    }

    #[test]
    fn unknown_model_is_pass_through() {
        assert_eq!(where_input(&schema(), "Ghost"), Shape::Open);
        assert!(create_data_input(&schema(), "Ghost").accepts(&json!("anything")));
    }
}
