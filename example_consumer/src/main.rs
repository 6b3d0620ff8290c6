//! Example consumer: serves every model in `schema.json` from an in-memory table.
//!
//! Run from repo root: `SCHEMA_PATH=example_consumer/schema.json cargo run -p example-consumer`
//! Or from this directory: `cargo run`

use async_trait::async_trait;
use crud_router::{
    app, load_from_path, AccessorError, AccessorRegistry, AccessorResult, AppState, ModelDelegate, RouterBuilder,
    Settings,
};
use serde_json::{json, Map, Value};
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;

/// Rows keyed by `id`. Filters only on top-level equality.
#[derive(Default)]
struct MemoryTable {
    rows: RwLock<Vec<Map<String, Value>>>,
}

fn matches(row: &Map<String, Value>, filter: &Value) -> bool {
    match filter.as_object() {
        Some(conds) => conds
            .iter()
            .filter(|(_, v)| !v.is_object())
            .all(|(k, v)| row.get(k) == Some(v)),
        None => true,
    }
}

fn poisoned<T>(_: T) -> AccessorError {
    AccessorError::other(std::io::Error::new(std::io::ErrorKind::Other, "table lock poisoned"))
}

#[async_trait]
impl ModelDelegate for MemoryTable {
    async fn find_many(&self, args: Value) -> AccessorResult {
        let rows = self.rows.read().map_err(poisoned)?;
        let skip = args["skip"].as_u64().unwrap_or(0) as usize;
        let take = args["take"].as_u64().map(|t| t as usize).unwrap_or(usize::MAX);
        let out: Vec<Value> = rows
            .iter()
            .filter(|r| matches(r, &args["where"]))
            .skip(skip)
            .take(take)
            .cloned()
            .map(Value::Object)
            .collect();
        Ok(Value::Array(out))
    }

    async fn find_unique(&self, args: Value) -> AccessorResult {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .iter()
            .find(|r| matches(r, &args["where"]))
            .cloned()
            .map(Value::Object)
            .unwrap_or(Value::Null))
    }

    async fn create(&self, args: Value) -> AccessorResult {
        let mut row = match args["data"].as_object() {
            Some(data) => data.clone(),
            None => Map::new(),
        };
        // Nested relation writes are not supported here.
        row.retain(|_, v| !v.is_object());
        row.entry("id")
            .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.iter().any(|r| r.get("id") == row.get("id")) {
            return Err(AccessorError::UniqueViolation("id".into()));
        }
        rows.push(row.clone());
        Ok(Value::Object(row))
    }

    async fn delete(&self, args: Value) -> AccessorResult {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let pos = rows
            .iter()
            .position(|r| matches(r, &args["where"]))
            .ok_or_else(|| AccessorError::NotFound("record to delete does not exist".into()))?;
        Ok(Value::Object(rows.remove(pos)))
    }

    async fn count(&self, args: Value) -> AccessorResult {
        let rows = self.rows.read().map_err(poisoned)?;
        let n = rows.iter().filter(|r| matches(r, &args["where"])).count();
        Ok(json!(n))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crud_router=info,example_consumer=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let schema = load_from_path(&settings.schema_path).await?;

    let mut accessor = AccessorRegistry::new();
    for name in schema.model_names() {
        accessor = accessor.with_model(name, Arc::new(MemoryTable::default()));
    }
    let router = RouterBuilder::new(&schema).build();
    let state = AppState::new(router, Arc::new(accessor));

    let app = app(state, &settings);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("Example consumer listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
