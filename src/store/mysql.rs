use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::{Map, Value};
use sqlx::MySqlPool;
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Collection, Document, Filter, Patch, RecordStore, StoreError};
use crate::db::init_db;
use crate::utils::db_utils::{build_patch, build_where};

/// MySQL-backed store keeping each record as a JSON body in `documents`.
pub struct MySqlStore {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct DocumentRow {
    doc_id: String,
    body: Json<Value>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, StoreError> {
        match self.body.0 {
            Value::Object(body) => Ok(Document {
                id: self.doc_id,
                body,
            }),
            _ => Err(StoreError::NotAnObject),
        }
    }
}

impl MySqlStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = init_db(database_url).await?;
        info!("Connected to MySQL document store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    fn backend_tag(&self) -> &'static str {
        "mysql"
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let filter_sql = build_where(filter);
        let sql = format!(
            "SELECT doc_id, body FROM documents WHERE collection = ?{} ORDER BY seq",
            filter_sql.sql
        );
        debug!(%collection, sql = %sql, "find");

        let mut query = sqlx::query_as::<_, DocumentRow>(&sql).bind(collection.name());
        for value in filter_sql.values {
            query = query.bind(value);
        }

        let mut rows = query.fetch(&self.pool);
        let mut documents = Vec::new();
        while let Some(row) = rows.next().await {
            documents.push(row?.into_document()?);
        }
        Ok(documents)
    }

    async fn insert(&self, collection: Collection, body: Map<String, Value>) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let encoded = serde_json::to_string(&Value::Object(body))?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_id, body)
            VALUES (?, ?, CAST(? AS JSON))
            "#,
        )
        .bind(collection.name())
        .bind(&id)
        .bind(encoded)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, collection: Collection, filter: &Filter, patch: &Patch) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return self.count(collection, filter).await;
        }

        let set_sql = build_patch(patch);
        let filter_sql = build_where(filter);
        let sql = format!(
            "UPDATE documents SET {} WHERE collection = ?{}",
            set_sql.sql, filter_sql.sql
        );
        debug!(%collection, sql = %sql, "update");

        let mut query = sqlx::query(&sql);
        for value in set_sql.values {
            query = query.bind(value);
        }
        query = query.bind(collection.name());
        for value in filter_sql.values {
            query = query.bind(value);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let filter_sql = build_where(filter);
        let sql = format!(
            "DELETE FROM documents WHERE collection = ?{}",
            filter_sql.sql
        );

        let mut query = sqlx::query(&sql).bind(collection.name());
        for value in filter_sql.values {
            query = query.bind(value);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let filter_sql = build_where(filter);
        let sql = format!(
            "SELECT COUNT(*) FROM documents WHERE collection = ?{}",
            filter_sql.sql
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(collection.name());
        for value in filter_sql.values {
            query = query.bind(value);
        }

        let total = query.fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("MySQL document store closed");
    }
}
