//! Load states emitted while fetching the breed catalog.
//!
//! Every request produces `Loading` first and then exactly one terminal
//! state, `Success` or `Error`.
//!
//! ```ignore
//! match state {
//!     DataState::Loading => render_spinner(),
//!     DataState::Success(summary) => render_breeds(&summary.all_items),
//!     DataState::Error(msg) => render_error(&msg),
//! }
//! ```

/// The state of a catalog request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataState<T> {
  /// Request is in flight
  Loading,
  /// Request completed successfully
  Success(T),
  /// Request failed with a user-facing message
  Error(String),
}

impl<T> DataState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, DataState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, DataState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, DataState::Error(_))
  }

  /// Whether this state ends a request cycle.
  pub fn is_terminal(&self) -> bool {
    !self.is_loading()
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      DataState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn into_data(self) -> Option<T> {
    match self {
      DataState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      DataState::Error(e) => Some(e),
      _ => None,
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataState<U> {
    match self {
      DataState::Loading => DataState::Loading,
      DataState::Success(data) => DataState::Success(f(data)),
      DataState::Error(e) => DataState::Error(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loading_is_not_terminal() {
    let state: DataState<i32> = DataState::Loading;
    assert!(state.is_loading());
    assert!(!state.is_terminal());
    assert_eq!(state.data(), None);
  }

  #[test]
  fn test_success_accessors() {
    let state = DataState::Success(vec![1, 2, 3]);
    assert!(state.is_success());
    assert!(state.is_terminal());
    assert_eq!(state.data(), Some(&vec![1, 2, 3]));
    assert_eq!(state.error(), None);
  }

  #[test]
  fn test_error_accessors() {
    let state: DataState<i32> = DataState::Error("Something went wrong".to_string());
    assert!(state.is_error());
    assert!(state.is_terminal());
    assert_eq!(state.error(), Some("Something went wrong"));
    assert_eq!(state.into_data(), None);
  }

  #[test]
  fn test_map_keeps_variant() {
    let state = DataState::Success(21).map(|n| n * 2);
    assert_eq!(state, DataState::Success(42));

    let state: DataState<i32> = DataState::Error("nope".to_string());
    assert_eq!(state.map(|n| n * 2), DataState::Error("nope".to_string()));
  }
}
