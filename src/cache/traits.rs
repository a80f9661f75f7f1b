//! Storage traits the breed model is written against.

use color_eyre::Result;

use crate::dogs::Breed;

/// Settings key holding the epoch millis of the last successful refresh.
pub const DB_TIMESTAMP_KEY: &str = "DbTimestampKey";

/// Persistent breed rows.
pub trait BreedStore: Send + Sync {
  /// All rows, ordered by name.
  fn list_all(&self) -> Result<Vec<Breed>>;

  /// Look up a row by its unique name.
  fn find_by_name(&self, name: &str) -> Result<Option<Breed>>;

  /// Atomically replace every row. Incoming ids are ignored; the store assigns new ones.
  fn replace_all(&self, breeds: &[Breed]) -> Result<()>;

  /// Update an existing row in place, matched by id.
  fn update(&self, breed: &Breed) -> Result<()>;

  /// Remove every row.
  fn delete_all(&self) -> Result<()>;
}

/// Single-value integer settings.
pub trait SettingsStore: Send + Sync {
  fn get_long(&self, key: &str) -> Result<Option<i64>>;

  fn put_long(&self, key: &str, value: i64) -> Result<()>;

  fn remove(&self, key: &str) -> Result<()>;
}

/// Breed rows and settings living in one backend, so a refresh can commit
/// both in a single transaction.
pub trait CatalogStore: BreedStore + SettingsStore {
  /// Replace every row and set `key` to `value` atomically. On error neither
  /// the rows nor the setting change.
  fn replace_all_stamped(&self, breeds: &[Breed], key: &str, value: i64) -> Result<()>;
}
