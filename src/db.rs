use sqlx::MySqlPool;

/// One table holds every collection; `seq` preserves insertion order.
const DOCUMENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    collection VARCHAR(64) NOT NULL,
    doc_id CHAR(36) NOT NULL,
    body JSON NOT NULL,
    UNIQUE KEY uq_documents_doc (collection, doc_id),
    KEY ix_documents_collection (collection, seq)
)
"#;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    sqlx::query(DOCUMENTS_DDL).execute(&pool).await?;
    Ok(pool)
}
