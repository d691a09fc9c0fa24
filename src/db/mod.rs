pub mod persist;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::types::ToSql;
use rusqlite::Connection;
use tracing::{debug, info, warn};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sellers (
        id                INTEGER PRIMARY KEY,
        name              TEXT,
        phone_number      TEXT,
        rating            TEXT,
        registration_date TEXT,
        last_online       TEXT,
        location          TEXT,
        created_at        TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS listings (
        id               INTEGER PRIMARY KEY,
        seller_id        INTEGER REFERENCES sellers(id),
        page_url         TEXT UNIQUE NOT NULL,
        olx_id           TEXT,
        title            TEXT,
        price            TEXT,
        options          TEXT,
        description      TEXT,
        publication_date TEXT,
        views            TEXT,
        created_at       TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_listings_page_url ON listings(page_url);

    CREATE TABLE IF NOT EXISTS listing_pictures (
        id          INTEGER PRIMARY KEY,
        listing_id  INTEGER NOT NULL REFERENCES listings(id),
        picture_url TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_pictures_listing ON listing_pictures(listing_id);
";

/// SQLite-backed store. Every call opens its own connection, so no
/// connection outlives the statement that needed it.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("Failed to open database at {}", self.path.display()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(conn)
    }

    /// Create the three tables if missing
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert one row and return its generated id. Failures are logged and
    /// swallowed: `None` means no row was written.
    pub fn insert(&self, table: &str, columns: &[&str], values: &[&dyn ToSql]) -> Option<i64> {
        debug!("Trying to insert {} fields into the database...", table);
        match self.try_insert(table, columns, values) {
            Ok(id) => {
                info!("Inserted into {} (id {})", table, id);
                Some(id)
            }
            Err(e) => {
                warn!("Insert into {} failed: {:#}", table, e);
                None
            }
        }
    }

    fn try_insert(&self, table: &str, columns: &[&str], values: &[&dyn ToSql]) -> Result<i64> {
        let conn = self.open()?;
        let sql = if columns.is_empty() {
            // Still has to yield a generated id; all attribute columns are nullable
            format!("INSERT INTO {table} DEFAULT VALUES RETURNING id")
        } else {
            let placeholders = (1..=columns.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING id",
                columns.join(", ")
            )
        };
        let id = conn.query_row(&sql, rusqlite::params_from_iter(values.iter()), |row| {
            row.get(0)
        })?;
        Ok(id)
    }

    /// Dedup gate. A storage failure answers `false` so the listing is
    /// still extracted rather than silently dropped; duplicates are then
    /// caught by the unique URL constraint at insert time.
    pub fn listing_exists(&self, page_url: &str) -> bool {
        debug!("Checking whether the url {} is in the db already...", page_url);
        match self.try_exists(page_url) {
            Ok(found) => found,
            Err(e) => {
                warn!("Dedup check failed for {}: {:#}", page_url, e);
                false
            }
        }
    }

    fn try_exists(&self, page_url: &str) -> Result<bool> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT 1 FROM listings WHERE page_url = ?1 LIMIT 1")?;
        Ok(stmt.exists([page_url])?)
    }
}

#[cfg(test)]
impl Store {
    /// Direct connection for assertions against the store's file
    pub(crate) fn test_conn(&self) -> Connection {
        Connection::open(&self.path).unwrap()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::Store;

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Fresh file-backed store under the system temp dir
    pub fn temp_store(name: &str) -> Store {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "listing_scout_{}_{}_{}.sqlite",
            name,
            std::process::id(),
            n
        ));
        let _ = std::fs::remove_file(&path);
        let store = Store::new(&path);
        store.init_schema().unwrap();
        store
    }
}

#[cfg(test)]
mod tests {
    use super::testing::temp_store;

    #[test]
    fn insert_returns_generated_ids_in_sequence() {
        let store = temp_store("insert_ids");
        let first = store
            .insert("sellers", &["name"], &[&"Alice"])
            .expect("first insert");
        let second = store
            .insert("sellers", &["name"], &[&"Bob"])
            .expect("second insert");
        assert_ne!(first, second);
    }

    #[test]
    fn empty_column_insert_still_yields_an_id() {
        let store = temp_store("empty_insert");
        assert!(store.insert("sellers", &[], &[]).is_some());
    }

    #[test]
    fn failed_insert_returns_none() {
        let store = temp_store("bad_insert");
        // NOT NULL page_url violated
        assert!(store.insert("listings", &["title"], &[&"no url"]).is_none());
    }

    #[test]
    fn listing_exists_after_insert() {
        let store = temp_store("exists");
        let url = "https://example.com/ad/42";
        assert!(!store.listing_exists(url));
        store.insert("listings", &["page_url"], &[&url]).unwrap();
        assert!(store.listing_exists(url));
    }

    #[test]
    fn unreachable_store_reports_not_present() {
        // A directory path can never be opened as a database
        let store = super::Store::new(std::env::temp_dir());
        assert!(!store.listing_exists("https://example.com/ad/1"));
    }

    #[test]
    fn duplicate_url_insert_is_rejected() {
        let store = temp_store("dup_url");
        let url = "https://example.com/ad/7";
        assert!(store.insert("listings", &["page_url"], &[&url]).is_some());
        assert!(store.insert("listings", &["page_url"], &[&url]).is_none());
    }
}
