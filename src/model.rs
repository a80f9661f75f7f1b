//! Read-through breed catalog with local favorites.
//!
//! `BreedModel` decides when the cached catalog is stale, refreshes it from
//! the network, merges stored favorite flags into the fresh rows and streams
//! the result as `DataState`s.

use chrono::{DateTime, Duration, Utc};
use color_eyre::{eyre::eyre, Result};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use crate::cache::{merge_favorites, BreedStore, CatalogStore, SettingsStore, DB_TIMESTAMP_KEY};
use crate::clock::Clock;
use crate::dogs::{Breed, BreedApi, ItemDataSummary};
use crate::state::DataState;

/// Message for any failed download, and for a skipped refresh of a fresh cache.
pub const DOWNLOAD_ERROR: &str = "Unable to download breed list";

/// Message for local storage failures.
pub const STORE_ERROR: &str = "Unable to access breed cache";

/// Message when the API answered with no breeds.
pub const EMPTY_CATALOG_ERROR: &str = "Breed list was empty";

/// Default age after which the catalog is refreshed.
pub const DEFAULT_STALE_MINUTES: i64 = 60;

/// Pending states per feed before the producer waits on the consumer.
const FEED_CAPACITY: usize = 16;

/// Breed catalog backed by a remote API and a local store.
///
/// Clones share the same collaborators, write lock and change notifications.
#[derive(Clone)]
pub struct BreedModel {
  api: Arc<dyn BreedApi>,
  /// Breed rows and the last refresh time
  store: Arc<dyn CatalogStore>,
  clock: Arc<dyn Clock>,
  stale_time: Duration,
  default_breed: Option<String>,
  /// Serializes refresh merges and favorite toggles
  write_lock: Arc<Mutex<()>>,
  /// Bumped after every successful store write
  changes: Arc<watch::Sender<u64>>,
}

impl BreedModel {
  pub fn new(api: Arc<dyn BreedApi>, store: Arc<dyn CatalogStore>, clock: Arc<dyn Clock>) -> Self {
    let (changes, _) = watch::channel(0);
    Self {
      api,
      store,
      clock,
      stale_time: Duration::minutes(DEFAULT_STALE_MINUTES),
      default_breed: None,
      write_lock: Arc::new(Mutex::new(())),
      changes: Arc::new(changes),
    }
  }

  /// Set how long the cached catalog stays fresh.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  /// Breed to select in summaries when it is present in the catalog.
  pub fn with_default_breed(mut self, name: Option<String>) -> Self {
    self.default_breed = name;
    self
  }

  /// Stream the catalog: `Loading`, then `Success` or `Error`.
  ///
  /// The network is only hit when `force_refresh` is set, the cache is stale,
  /// or the store is empty. After the terminal state the feed stays open and
  /// emits a new `Success` whenever the store changes (favorite toggles,
  /// refreshes by other callers). Drop the feed to stop it.
  ///
  /// Must be called from within a tokio runtime.
  pub fn get_breeds(&self, force_refresh: bool) -> BreedFeed {
    let (tx, rx) = mpsc::channel(FEED_CAPACITY);

    // Fresh channel, cannot be full
    let _ = tx.try_send(DataState::Loading);

    let model = self.clone();
    tokio::spawn(async move { model.run_feed(tx, force_refresh).await });

    BreedFeed { rx }
  }

  /// Refresh from the network only if the cache is stale at `reference_ms`.
  ///
  /// `reference_ms` is epoch millis; 0 means "now" per the model's clock. A
  /// fresh cache yields `Error(DOWNLOAD_ERROR)` without any network call.
  pub async fn refresh_if_stale(&self, reference_ms: i64) -> DataState<ItemDataSummary> {
    let now_ms = if reference_ms == 0 {
      self.now_ms()
    } else {
      reference_ms
    };

    match self.is_stale_at(now_ms) {
      Ok(true) => self.refresh(now_ms, None).await,
      Ok(false) => {
        debug!("Breed list is fresh, skipping download");
        DataState::Error(DOWNLOAD_ERROR.to_string())
      }
      Err(e) => {
        warn!(error = %e, "Failed to read last refresh time");
        DataState::Error(STORE_ERROR.to_string())
      }
    }
  }

  /// Toggle the favorite flag of the stored breed with `breed.name`.
  ///
  /// Unfavorited breeds get `now` as their favorite timestamp; favorited ones
  /// are reset to 0. Live feeds re-emit the updated catalog.
  pub async fn set_favorite(&self, breed: &Breed, now: DateTime<Utc>) -> Result<Breed> {
    let _guard = self.write_lock.lock().await;

    let mut stored = self
      .store
      .find_by_name(&breed.name)?
      .ok_or_else(|| eyre!("Breed not found: {}", breed.name))?;

    stored.favorite = if stored.is_favorite() {
      0
    } else {
      // 0 means "not a favorite", so never store it as a timestamp
      now.timestamp_millis().max(1)
    };
    self.store.update(&stored)?;
    self.notify();

    info!(breed = %stored.name, favorite = stored.is_favorite(), "Updated favorite");
    Ok(stored)
  }

  /// Toggle a favorite using the model's clock.
  pub async fn update_breed_favorite(&self, breed: &Breed) -> Result<Breed> {
    self.set_favorite(breed, self.clock.now()).await
  }

  /// The stored catalog, or None if nothing has been downloaded yet.
  pub fn get_breeds_from_cache(&self) -> Result<Option<ItemDataSummary>> {
    let breeds = self.store.list_all()?;
    Ok(ItemDataSummary::from_breeds(
      breeds,
      self.default_breed.as_deref(),
    ))
  }

  /// Remove all breeds and forget the last refresh time.
  pub async fn delete_all(&self) -> Result<()> {
    let _guard = self.write_lock.lock().await;
    self.store.delete_all()?;
    self.store.remove(DB_TIMESTAMP_KEY)?;
    self.notify();
    info!("Cleared breed cache");
    Ok(())
  }

  /// When the catalog was last downloaded successfully.
  pub fn last_refresh(&self) -> Result<Option<DateTime<Utc>>> {
    let last = self.store.get_long(DB_TIMESTAMP_KEY)?.unwrap_or(0);
    if last == 0 {
      return Ok(None);
    }
    Ok(DateTime::from_timestamp_millis(last))
  }

  /// Whether the next `get_breeds(false)` would hit the network for staleness.
  pub fn is_stale(&self) -> Result<bool> {
    self.is_stale_at(self.now_ms())
  }

  pub fn now(&self) -> DateTime<Utc> {
    self.clock.now()
  }

  fn now_ms(&self) -> i64 {
    self.clock.now().timestamp_millis()
  }

  fn is_stale_at(&self, now_ms: i64) -> Result<bool> {
    let last = self.store.get_long(DB_TIMESTAMP_KEY)?.unwrap_or(0);
    Ok(last == 0 || now_ms - last > self.stale_time.num_milliseconds())
  }

  fn notify(&self) {
    self.changes.send_modify(|version| *version = version.wrapping_add(1));
  }

  /// Producer side of a feed.
  async fn run_feed(self, tx: mpsc::Sender<DataState<ItemDataSummary>>, force_refresh: bool) {
    let mut changes = self.changes.subscribe();

    let terminal = tokio::select! {
      _ = tx.closed() => {
        debug!("Breed feed dropped before load finished");
        return;
      }
      state = self.load(force_refresh, &mut changes) => state,
    };

    if tx.send(terminal).await.is_err() {
      return;
    }

    loop {
      tokio::select! {
        _ = tx.closed() => break,
        changed = changes.changed() => {
          if changed.is_err() {
            break;
          }
          match self.get_breeds_from_cache() {
            Ok(Some(summary)) => {
              if tx.send(DataState::Success(summary)).await.is_err() {
                break;
              }
            }
            Ok(None) => debug!("Breed cache emptied, nothing to emit"),
            Err(e) => {
              warn!(error = %e, "Failed to re-read breed cache");
              if tx.send(DataState::Error(STORE_ERROR.to_string())).await.is_err() {
                break;
              }
            }
          }
        }
      }
    }
  }

  /// One load cycle: serve from the store or refresh. Always ends in a terminal state.
  async fn load(
    &self,
    force_refresh: bool,
    changes: &mut watch::Receiver<u64>,
  ) -> DataState<ItemDataSummary> {
    let now_ms = self.now_ms();

    let stale = match self.is_stale_at(now_ms) {
      Ok(stale) => stale,
      Err(e) => {
        warn!(error = %e, "Failed to read last refresh time");
        return DataState::Error(STORE_ERROR.to_string());
      }
    };

    if !force_refresh && !stale {
      changes.borrow_and_update();
      match self.get_breeds_from_cache() {
        Ok(Some(summary)) => {
          debug!(count = summary.all_items.len(), "Serving breeds from cache");
          return DataState::Success(summary);
        }
        Ok(None) => debug!("Breed cache is empty, refreshing"),
        Err(e) => {
          warn!(error = %e, "Failed to read breed cache");
          return DataState::Error(STORE_ERROR.to_string());
        }
      }
    }

    self.refresh(now_ms, Some(changes)).await
  }

  /// Download, merge and persist the catalog.
  ///
  /// Nothing is written unless the download succeeds. All writes happen after
  /// the last await, so a dropped caller never leaves a partial refresh behind.
  async fn refresh(
    &self,
    now_ms: i64,
    seen: Option<&mut watch::Receiver<u64>>,
  ) -> DataState<ItemDataSummary> {
    let result = match self.api.get_json_from_api().await {
      Ok(result) => result,
      Err(e) => {
        warn!(error = %e, "Failed to download breed list");
        return DataState::Error(DOWNLOAD_ERROR.to_string());
      }
    };

    let names = result.breed_names();
    if names.is_empty() {
      warn!("Breed list download returned no breeds");
      return DataState::Error(EMPTY_CATALOG_ERROR.to_string());
    }

    let _guard = self.write_lock.lock().await;

    if let Err(e) = self.store_refresh(&names, now_ms) {
      warn!(error = %e, "Failed to store breed list");
      return DataState::Error(STORE_ERROR.to_string());
    }
    self.notify();

    // The caller's own write is not a change it needs to hear about
    if let Some(rx) = seen {
      rx.borrow_and_update();
    }

    match self.get_breeds_from_cache() {
      Ok(Some(summary)) => DataState::Success(summary),
      Ok(None) => DataState::Error(EMPTY_CATALOG_ERROR.to_string()),
      Err(e) => {
        warn!(error = %e, "Failed to read breed cache");
        DataState::Error(STORE_ERROR.to_string())
      }
    }
  }

  fn store_refresh(&self, names: &[String], now_ms: i64) -> Result<()> {
    let existing = self.store.list_all()?;
    let merged = merge_favorites(names, &existing);
    // Rows and timestamp commit together or not at all
    self.store.replace_all_stamped(&merged, DB_TIMESTAMP_KEY, now_ms)?;

    info!(
      count = merged.len(),
      favorites = merged.iter().filter(|b| b.is_favorite()).count(),
      "Refreshed breed list"
    );
    Ok(())
  }
}

/// Consumer side of `BreedModel::get_breeds`.
pub struct BreedFeed {
  rx: mpsc::Receiver<DataState<ItemDataSummary>>,
}

impl BreedFeed {
  /// Receive the next state. None once the producer has stopped.
  pub async fn next_state(&mut self) -> Option<DataState<ItemDataSummary>> {
    self.rx.recv().await
  }

  /// Skip ahead to the first terminal state.
  pub async fn terminal(&mut self) -> Option<DataState<ItemDataSummary>> {
    while let Some(state) = self.rx.recv().await {
      if state.is_terminal() {
        return Some(state);
      }
    }
    None
  }
}

impl Stream for BreedFeed {
  type Item = DataState<ItemDataSummary>;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    self.rx.poll_recv(cx)
  }
}
