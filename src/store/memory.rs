use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Collection, Document, Filter, Patch, RecordStore, StoreError};

/// In-process store used by tests and `STORE_BACKEND=memory`.
///
/// `set_unavailable(true)` makes every call fail the way a dropped database
/// connection would; `set_collection_unavailable` does the same for one
/// collection only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    unavailable: AtomicBool,
    unavailable_collections: RwLock<HashSet<Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_collection_unavailable(&self, collection: Collection, unavailable: bool) {
        if let Ok(mut switched_off) = self.unavailable_collections.write() {
            if unavailable {
                switched_off.insert(collection);
            } else {
                switched_off.remove(&collection);
            }
        }
    }

    fn check_available(&self, collection: Collection) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        let switched_off = self
            .unavailable_collections
            .read()
            .map_err(|_| Self::poisoned())?;
        if switched_off.contains(&collection) {
            return Err(StoreError::Unavailable(format!("{collection} switched off")));
        }
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        self.check_available(collection)?;
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> Result<String, StoreError> {
        self.check_available(collection)?;
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections.entry(collection).or_default().push(Document {
            id: id.clone(),
            body,
        });
        Ok(id)
    }

    async fn update(&self, collection: Collection, filter: &Filter, patch: &Patch) -> Result<u64, StoreError> {
        self.check_available(collection)?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let mut touched = 0;
        if let Some(documents) = collections.get_mut(&collection) {
            for document in documents.iter_mut().filter(|document| filter.matches(document)) {
                patch.apply(&mut document.body);
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        self.check_available(collection)?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|document| !filter.matches(document));
        Ok((before - documents.len()) as u64)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        Ok(self.find(collection, filter).await?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[actix_web::test]
    async fn find_returns_matches_in_insertion_order() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Students, body(json!({"regNo": "B", "dept": "CSC"})))
            .await
            .expect("insert");
        store
            .insert(Collection::Students, body(json!({"regNo": "A", "dept": "ECE"})))
            .await
            .expect("insert");
        store
            .insert(Collection::Students, body(json!({"regNo": "C", "dept": "CSC"})))
            .await
            .expect("insert");

        let found = store
            .find(Collection::Students, &Filter::all().eq("dept", "CSC"))
            .await
            .expect("find");
        let reg_nos: Vec<_> = found.iter().filter_map(|doc| doc.field_str("regNo")).collect();
        assert_eq!(reg_nos, vec!["B", "C"]);
        assert_eq!(
            store.count(Collection::Advisors, &Filter::all()).await.expect("count"),
            0
        );
    }

    #[actix_web::test]
    async fn update_and_delete_report_touched_records() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Students, body(json!({"regNo": "A"})))
            .await
            .expect("insert");

        let updated = store
            .update(
                Collection::Students,
                &Filter::by_id(&id),
                &Patch::new().set("email", "a@example.edu"),
            )
            .await
            .expect("update");
        assert_eq!(updated, 1);

        let stored = store
            .find_one(Collection::Students, &Filter::by_id(&id))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.field_str("email"), Some("a@example.edu"));

        let deleted = store
            .delete(Collection::Students, &Filter::all().eq("regNo", "A"))
            .await
            .expect("delete");
        assert_eq!(deleted, 1);
        assert_eq!(
            store.count(Collection::Students, &Filter::all()).await.expect("count"),
            0
        );
    }

    #[actix_web::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.find(Collection::Students, &Filter::all()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.insert(Collection::Students, Map::new()).await.is_err());
    }

    #[actix_web::test]
    async fn one_collection_can_be_switched_off() {
        let store = MemoryStore::new();
        store.set_collection_unavailable(Collection::Students, true);
        assert!(store.insert(Collection::Students, Map::new()).await.is_err());
        store
            .insert(Collection::LeaveApplications, Map::new())
            .await
            .expect("other collections still work");

        store.set_collection_unavailable(Collection::Students, false);
        store
            .insert(Collection::Students, Map::new())
            .await
            .expect("switched back on");
    }
}
