//! The closed set of CRUD operations every model exposes, and their endpoint kind.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// One of the 13 canonical CRUD operations. Names serialize as camelCase (`findMany`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    FindMany,
    FindUnique,
    FindFirst,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Upsert,
    Delete,
    DeleteMany,
    Count,
    Aggregate,
    GroupBy,
}

/// Whether an endpoint is read-only (safe to cache/retry, GET) or side-effecting (POST).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EndpointKind {
    Query,
    Mutation,
}

impl Operation {
    pub fn all() -> impl Iterator<Item = Operation> {
        Operation::iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FindMany => "findMany",
            Operation::FindUnique => "findUnique",
            Operation::FindFirst => "findFirst",
            Operation::Create => "create",
            Operation::CreateMany => "createMany",
            Operation::Update => "update",
            Operation::UpdateMany => "updateMany",
            Operation::Upsert => "upsert",
            Operation::Delete => "delete",
            Operation::DeleteMany => "deleteMany",
            Operation::Count => "count",
            Operation::Aggregate => "aggregate",
            Operation::GroupBy => "groupBy",
        }
    }

    pub fn kind(&self) -> EndpointKind {
        match self {
            Operation::FindMany
            | Operation::FindUnique
            | Operation::FindFirst
            | Operation::Count
            | Operation::Aggregate
            | Operation::GroupBy => EndpointKind::Query,
            Operation::Create
            | Operation::CreateMany
            | Operation::Update
            | Operation::UpdateMany
            | Operation::Upsert
            | Operation::Delete
            | Operation::DeleteMany => EndpointKind::Mutation,
        }
    }

    pub fn is_query(&self) -> bool {
        self.kind() == EndpointKind::Query
    }
}
