/// A catalog entry with its locally-owned favorite flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breed {
  /// Store-assigned row id; not stable across refreshes
  pub id: i64,
  pub name: String,
  /// 0 when not a favorite, otherwise epoch millis of when it was favorited
  pub favorite: i64,
}

impl Breed {
  pub fn new(id: i64, name: impl Into<String>, favorite: i64) -> Self {
    Self {
      id,
      name: name.into(),
      favorite,
    }
  }

  pub fn is_favorite(&self) -> bool {
    self.favorite != 0
  }
}

/// The full catalog plus one focal breed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDataSummary {
  pub selected: Breed,
  pub all_items: Vec<Breed>,
}

impl ItemDataSummary {
  /// Build a summary, selecting `preferred` if present and the first breed otherwise.
  ///
  /// Returns None for an empty list.
  pub fn from_breeds(all_items: Vec<Breed>, preferred: Option<&str>) -> Option<Self> {
    let selected = preferred
      .and_then(|name| all_items.iter().find(|b| b.name == name))
      .or_else(|| all_items.first())?
      .clone();

    Some(Self {
      selected,
      all_items,
    })
  }

  pub fn favorites(&self) -> impl Iterator<Item = &Breed> {
    self.all_items.iter().filter(|b| b.is_favorite())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn breeds() -> Vec<Breed> {
    vec![
      Breed::new(1, "appenzeller", 0),
      Breed::new(2, "australian", 1),
    ]
  }

  #[test]
  fn test_selects_first_by_default() {
    let summary = ItemDataSummary::from_breeds(breeds(), None).unwrap();
    assert_eq!(summary.selected.name, "appenzeller");
    assert_eq!(summary.all_items.len(), 2);
  }

  #[test]
  fn test_selects_preferred_breed() {
    let summary = ItemDataSummary::from_breeds(breeds(), Some("australian")).unwrap();
    assert_eq!(summary.selected.name, "australian");
  }

  #[test]
  fn test_unknown_preferred_falls_back_to_first() {
    let summary = ItemDataSummary::from_breeds(breeds(), Some("poodle")).unwrap();
    assert_eq!(summary.selected.name, "appenzeller");
  }

  #[test]
  fn test_empty_list_has_no_summary() {
    assert!(ItemDataSummary::from_breeds(Vec::new(), None).is_none());
  }

  #[test]
  fn test_favorites() {
    let summary = ItemDataSummary::from_breeds(breeds(), None).unwrap();
    let names: Vec<_> = summary.favorites().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["australian"]);
  }
}
