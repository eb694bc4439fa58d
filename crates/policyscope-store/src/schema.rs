//! SQLite schema for the page store and embedding records.

pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS pages (
    document_id TEXT NOT NULL,
    page INTEGER NOT NULL,
    text TEXT NOT NULL,
    PRIMARY KEY (document_id, page)
);

CREATE TABLE IF NOT EXISTS page_embeddings (
    document_id TEXT NOT NULL,
    page INTEGER NOT NULL,
    vector BLOB NOT NULL,
    scale REAL NOT NULL,
    offset REAL NOT NULL,
    PRIMARY KEY (document_id, page)
);

CREATE TABLE IF NOT EXISTS index_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    model_id TEXT NOT NULL,
    dimension INTEGER NOT NULL
);
";
