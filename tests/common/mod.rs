#![allow(dead_code)]

use async_trait::async_trait;
use crud_router::{load_from_str, AccessorError, AccessorResult, ModelDelegate, Operation, Schema};
use serde_json::{json, Value};
use std::sync::Mutex;

pub const SCHEMA: &str = r#"{
    "models": {
        "User": {
            "fields": {
                "id": { "type": "String", "isId": true, "hasDefault": true },
                "email": { "type": "String" },
                "name": { "type": "String", "isOptional": true },
                "age": { "type": "Int", "isOptional": true },
                "posts": { "type": "Post", "isArray": true, "relation": { "opposite": "author" } }
            },
            "uniqueFields": { "email": "email" }
        },
        "Post": {
            "fields": {
                "id": { "type": "Int", "isId": true, "hasDefault": true },
                "title": { "type": "String" },
                "authorId": { "type": "String", "isForeignKey": true },
                "author": {
                    "type": "User",
                    "relation": { "opposite": "posts", "fields": ["authorId"], "references": ["id"] }
                }
            }
        }
    }
}"#;

pub fn schema() -> Schema {
    load_from_str(SCHEMA).expect("test schema is valid")
}

/// Records every call; implements the read operations plus create and delete.
#[derive(Default)]
pub struct Recorder {
    pub calls: Mutex<Vec<(Operation, Value)>>,
}

impl Recorder {
    fn record(&self, op: Operation, args: &Value) {
        self.calls.lock().unwrap().push((op, args.clone()));
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }
}

#[async_trait]
impl ModelDelegate for Recorder {
    async fn find_many(&self, args: Value) -> AccessorResult {
        self.record(Operation::FindMany, &args);
        Ok(json!([{ "id": "u1", "email": "a@b.com" }]))
    }

    async fn find_unique(&self, args: Value) -> AccessorResult {
        self.record(Operation::FindUnique, &args);
        if args["where"]["id"] == "missing" {
            return Err(AccessorError::NotFound("user missing".into()));
        }
        Ok(json!({ "id": args["where"]["id"], "email": "a@b.com" }))
    }

    async fn create(&self, args: Value) -> AccessorResult {
        self.record(Operation::Create, &args);
        if args["data"]["email"] == "taken@b.com" {
            return Err(AccessorError::UniqueViolation("email".into()));
        }
        let mut row = args["data"].clone();
        row["id"] = json!("u2");
        Ok(row)
    }

    async fn delete(&self, args: Value) -> AccessorResult {
        self.record(Operation::Delete, &args);
        Ok(json!({ "id": args["where"]["id"] }))
    }

    async fn count(&self, args: Value) -> AccessorResult {
        self.record(Operation::Count, &args);
        Ok(json!(1))
    }
}
