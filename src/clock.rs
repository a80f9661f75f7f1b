//! Injectable time source.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Supplies the current instant.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Manually driven clock for tests. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct MockClock {
  current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self {
      current: Arc::new(Mutex::new(start)),
    }
  }

  pub fn set(&self, instant: DateTime<Utc>) {
    *self.lock() = instant;
  }

  pub fn advance(&self, by: Duration) {
    let mut current = self.lock();
    *current += by;
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
    // A poisoned clock still holds a valid instant
    self.current.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl Clock for MockClock {
  fn now(&self) -> DateTime<Utc> {
    *self.lock()
  }
}

/// Format the age of a timestamp for display ("just now", "5m ago", "2h ago", "3d ago").
pub fn age_display(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let minutes = (now - then).num_minutes();
  if minutes < 1 {
    // Also covers clock skew
    "just now".to_string()
  } else if minutes < 60 {
    format!("{}m ago", minutes)
  } else if minutes < 1440 {
    format!("{}h ago", minutes / 60)
  } else {
    format!("{}d ago", minutes / 1440)
  }
}
