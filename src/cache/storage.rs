//! SQLite implementation of the breed and settings stores.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::traits::{BreedStore, CatalogStore, SettingsStore};
use crate::dogs::Breed;

/// SQLite-based storage for breeds and settings.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open or create the database at `path`.
  pub fn open(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Open a private in-memory database.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;

    Self::with_connection(conn)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("breedcache").join("breeds.db"))
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  fn run_migrations(&self) -> Result<()> {
    self
      .lock()?
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS breed (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    favorite INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);
"#;

/// Delete all breed rows and insert `breeds` within `tx`.
fn replace_rows(tx: &Transaction<'_>, breeds: &[Breed]) -> Result<()> {
  tx.execute("DELETE FROM breed", [])
    .map_err(|e| eyre!("Failed to delete old breeds: {}", e))?;

  let mut insert = tx
    .prepare("INSERT INTO breed (name, favorite) VALUES (?, ?)")
    .map_err(|e| eyre!("Failed to prepare breed insert: {}", e))?;

  for breed in breeds {
    insert
      .execute(params![breed.name, breed.favorite])
      .map_err(|e| eyre!("Failed to insert breed '{}': {}", breed.name, e))?;
  }

  Ok(())
}

fn breed_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Breed> {
  Ok(Breed {
    id: row.get(0)?,
    name: row.get(1)?,
    favorite: row.get(2)?,
  })
}

impl BreedStore for SqliteStorage {
  fn list_all(&self) -> Result<Vec<Breed>> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare("SELECT id, name, favorite FROM breed ORDER BY name")
      .map_err(|e| eyre!("Failed to prepare breed query: {}", e))?;

    let breeds = stmt
      .query_map([], breed_from_row)
      .map_err(|e| eyre!("Failed to query breeds: {}", e))?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read breed row: {}", e))?;

    Ok(breeds)
  }

  fn find_by_name(&self, name: &str) -> Result<Option<Breed>> {
    let conn = self.lock()?;
    conn
      .query_row(
        "SELECT id, name, favorite FROM breed WHERE name = ?",
        params![name],
        breed_from_row,
      )
      .optional()
      .map_err(|e| eyre!("Failed to look up breed '{}': {}", name, e))
  }

  fn replace_all(&self, breeds: &[Breed]) -> Result<()> {
    let mut conn = self.lock()?;
    let tx = conn
      .transaction()
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    replace_rows(&tx, breeds)?;

    // Dropping an uncommitted transaction rolls it back
    tx.commit()
      .map_err(|e| eyre!("Failed to commit transaction: {}", e))?;

    Ok(())
  }

  fn update(&self, breed: &Breed) -> Result<()> {
    let conn = self.lock()?;
    let changed = conn
      .execute(
        "UPDATE breed SET name = ?, favorite = ? WHERE id = ?",
        params![breed.name, breed.favorite, breed.id],
      )
      .map_err(|e| eyre!("Failed to update breed '{}': {}", breed.name, e))?;

    if changed == 0 {
      return Err(eyre!("Breed not found: {} (id {})", breed.name, breed.id));
    }

    Ok(())
  }

  fn delete_all(&self) -> Result<()> {
    self
      .lock()?
      .execute("DELETE FROM breed", [])
      .map_err(|e| eyre!("Failed to delete breeds: {}", e))?;
    Ok(())
  }
}

impl SettingsStore for SqliteStorage {
  fn get_long(&self, key: &str) -> Result<Option<i64>> {
    let conn = self.lock()?;
    conn
      .query_row(
        "SELECT value FROM settings WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read setting '{}': {}", key, e))
  }

  fn put_long(&self, key: &str, value: i64) -> Result<()> {
    self
      .lock()?
      .execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
        params![key, value],
      )
      .map_err(|e| eyre!("Failed to write setting '{}': {}", key, e))?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self
      .lock()?
      .execute("DELETE FROM settings WHERE key = ?", params![key])
      .map_err(|e| eyre!("Failed to remove setting '{}': {}", key, e))?;
    Ok(())
  }
}

impl CatalogStore for SqliteStorage {
  fn replace_all_stamped(&self, breeds: &[Breed], key: &str, value: i64) -> Result<()> {
    let mut conn = self.lock()?;
    let tx = conn
      .transaction()
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    replace_rows(&tx, breeds)?;
    tx.execute(
      "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
      params![key, value],
    )
    .map_err(|e| eyre!("Failed to write setting '{}': {}", key, e))?;

    tx.commit()
      .map_err(|e| eyre!("Failed to commit transaction: {}", e))?;

    Ok(())
  }
}
