//! Local persistence for the breed catalog.
//!
//! This module provides:
//! - `BreedStore` / `SettingsStore` / `CatalogStore`: the storage seams the model depends on
//! - `SqliteStorage`: a rusqlite-backed implementation of all three
//! - `merge_favorites`: name-based reconciliation of fetched breeds with stored favorites

mod merge;
mod storage;
mod traits;

pub use merge::merge_favorites;
pub use storage::SqliteStorage;
pub use traits::{BreedStore, CatalogStore, SettingsStore, DB_TIMESTAMP_KEY};
