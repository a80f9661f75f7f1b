//! dog.ceo breed catalog: API client and domain types.

pub mod api_types;
pub mod client;
pub mod types;

pub use api_types::BreedResult;
pub use client::{BreedApi, DogApiClient, DEFAULT_API_URL};
pub use types::{Breed, ItemDataSummary};
