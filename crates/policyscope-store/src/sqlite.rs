//! SQLite-backed page store and embedding-record persistence.
//!
//! One database file holds both the page text and the precomputed index
//! records. The engine only ever reads; the write methods exist for the
//! offline indexer and for tests.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::quant::{decode_vector, encode_vector};
use crate::schema::SCHEMA_SQL;
use crate::types::{EmbeddingRecord, PageRow, PageStore};
use policyscope_core::{Error, Result};

/// SQLite store keyed by (document_id, page).
pub struct SqlitePageStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqlitePageStore {
    /// Open or create the store.
    ///
    /// `db_dir` is a directory; the file will be `db_dir/policyscope.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("policyscope.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -65536;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let page_count = store.count_pages()?;
        let record_count = store.count_embeddings()?;
        info!(
            "SqlitePageStore opened: {} pages, {} embedding records, path={}",
            page_count,
            record_count,
            store.db_path.display()
        );

        Ok(store)
    }

    /// Insert or replace one page of text.
    pub fn put_page(&self, document_id: &str, page: u32, text: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT OR REPLACE INTO pages (document_id, page, text) VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![document_id, page, text])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert or replace one index record, quantized for storage.
    pub fn put_embedding(&self, document_id: &str, page: u32, vector: &[f32]) -> Result<()> {
        let (bytes, scale, offset) = encode_vector(vector);
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT OR REPLACE INTO page_embeddings (document_id, page, vector, scale, offset)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![document_id, page, bytes, scale as f64, offset as f64])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Record which model produced the index and at what dimension.
    pub fn set_index_meta(&self, model_id: &str, dimension: usize) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO index_meta (id, model_id, dimension) VALUES (1, ?1, ?2)",
            params![model_id, dimension as i64],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Model identifier and dimension of the stored index, if any.
    pub fn index_meta(&self) -> Result<Option<(String, usize)>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT model_id, dimension FROM index_meta WHERE id = 1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row([], |row| {
                let model_id: String = row.get(0)?;
                let dimension: i64 = row.get(1)?;
                Ok((model_id, dimension as usize))
            })
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Load and dequantize every index record.
    pub fn load_embedding_records(&self) -> Result<Vec<EmbeddingRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT document_id, page, vector, scale, offset
                 FROM page_embeddings ORDER BY document_id, page",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let document_id: String = row.get(0)?;
                let page: i64 = row.get(1)?;
                let bytes: Vec<u8> = row.get(2)?;
                let scale: f64 = row.get(3)?;
                let offset: f64 = row.get(4)?;
                Ok((document_id, page as u32, bytes, scale as f32, offset as f32))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (document_id, page, bytes, scale, offset) =
                row.map_err(|e| Error::Database(e.to_string()))?;
            records.push(EmbeddingRecord {
                document_id,
                page,
                vector: decode_vector(&bytes, scale, offset),
            });
        }
        Ok(records)
    }

    /// Count stored pages.
    pub fn count_pages(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Count stored index records.
    pub fn count_embeddings(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM page_embeddings", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }
}

impl PageStore for SqlitePageStore {
    fn get_page(&self, document_id: &str, page: u32) -> Result<Option<PageRow>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT text FROM pages WHERE document_id = ?1 AND page = ?2")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![document_id, page], |row| row.get::<_, String>(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row.map(|text| PageRow {
            document_id: document_id.to_string(),
            page,
            text,
        }))
    }
}
