//! Reconciling freshly fetched breeds with stored favorite flags.

use std::collections::HashMap;

use crate::dogs::Breed;

/// Turn fetched breed names into rows, carrying `favorite` forward from
/// existing rows with the same name. Ids are left at 0 for the store to assign.
///
/// Names are expected sorted and de-duplicated (see `BreedResult::breed_names`).
pub fn merge_favorites(names: &[String], existing: &[Breed]) -> Vec<Breed> {
  let favorites: HashMap<&str, i64> = existing
    .iter()
    .filter(|b| b.is_favorite())
    .map(|b| (b.name.as_str(), b.favorite))
    .collect();

  names
    .iter()
    .map(|name| Breed::new(0, name.as_str(), favorites.get(name.as_str()).copied().unwrap_or(0)))
    .collect()
}
