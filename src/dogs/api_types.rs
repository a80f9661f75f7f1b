//! Serde-deserializable types matching dog.ceo API responses.

use serde::Deserialize;
use std::collections::HashMap;

/// Status value the API reports on success
pub const STATUS_SUCCESS: &str = "success";

/// Response of `GET /breeds/list/all`: breed name -> sub-breed names.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BreedResult {
  #[serde(default)]
  pub message: HashMap<String, Vec<String>>,
  pub status: String,
}

impl BreedResult {
  pub fn is_success(&self) -> bool {
    self.status == STATUS_SUCCESS
  }

  /// Top-level breed names, sorted and de-duplicated.
  pub fn breed_names(&self) -> Vec<String> {
    let mut names: Vec<String> = self
      .message
      .keys()
      .map(|name| name.trim().to_string())
      .filter(|name| !name.is_empty())
      .collect();
    names.sort();
    names.dedup();
    names
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deserialize_list_all() {
    let json = r#"{
      "message": {
        "australian": ["shepherd"],
        "appenzeller": []
      },
      "status": "success"
    }"#;

    let result: BreedResult = serde_json::from_str(json).unwrap();
    assert!(result.is_success());
    assert_eq!(result.message["australian"], vec!["shepherd".to_string()]);
    assert_eq!(result.breed_names(), vec!["appenzeller", "australian"]);
  }

  #[test]
  fn test_error_status() {
    let json = r#"{"message": {}, "status": "error"}"#;
    let result: BreedResult = serde_json::from_str(json).unwrap();
    assert!(!result.is_success());
    assert!(result.breed_names().is_empty());
  }

  #[test]
  fn test_breed_names_skips_blank_keys() {
    let mut result = BreedResult {
      status: STATUS_SUCCESS.to_string(),
      ..Default::default()
    };
    result.message.insert("  ".to_string(), Vec::new());
    result.message.insert("beagle".to_string(), Vec::new());
    assert_eq!(result.breed_names(), vec!["beagle"]);
  }
}
