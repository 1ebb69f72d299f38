//! Document store seam.
//!
//! Records are JSON objects grouped in named collections. Each record has a
//! store-generated id; everything else is addressed through equality filters
//! on business keys (`regNo`, staff `id`, `dept`).

mod memory;
mod mysql;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Field holding the store id when a record is rendered as JSON.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Students,
    Advisors,
    Hods,
    Management,
    LeaveApplications,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Students,
        Collection::Advisors,
        Collection::Hods,
        Collection::Management,
        Collection::LeaveApplications,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Advisors => "advisors",
            Collection::Hods => "hods",
            Collection::Management => "management",
            Collection::LeaveApplications => "leave_applications",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored record: its id plus the JSON body (without the id).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    /// Body with the id folded in under `_id`.
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert(ID_FIELD.to_string(), Value::String(self.id));
        Value::Object(body)
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.into_json())?)
    }
}

/// Serializes a typed record into a store body, dropping any `_id`.
pub fn encode<T: Serialize>(record: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(mut body) => {
            body.remove(ID_FIELD);
            Ok(body)
        }
        _ => Err(StoreError::NotAnObject),
    }
}

/// Conjunction of equality constraints. An empty filter matches everything;
/// a record lacking a constrained field never matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    id: Option<String>,
    fields: BTreeMap<String, Value>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: BTreeMap::new(),
        }
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub fn matches(&self, document: &Document) -> bool {
        if let Some(id) = &self.id {
            if *id != document.id {
                return false;
            }
        }
        self.fields
            .iter()
            .all(|(field, value)| document.body.get(field) == Some(value))
    }
}

/// Fields to overwrite on every matching record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(BTreeMap<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn set_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(field, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub fn apply(&self, body: &mut Map<String, Value>) {
        for (field, value) in &self.0 {
            body.insert(field.clone(), value.clone());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("document body must be a JSON object")]
    NotAnObject,
}

/// The five logical operations the service needs from a document database.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    /// Matching records in insertion order.
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    /// Stores a new record and returns its generated id.
    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> Result<String, StoreError>;

    async fn update(&self, collection: Collection, filter: &Filter, patch: &Patch) -> Result<u64, StoreError>;

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Releases connections. Called once on shutdown.
    async fn close(&self) {}
}
