//! breedcache - a read-through cache for the dog.ceo breed catalog.
//!
//! The catalog is downloaded at most once per staleness window, stored in
//! SQLite and merged with locally kept favorite flags on every refresh.

pub mod cache;
pub mod clock;
pub mod config;
pub mod dogs;
pub mod logging;
pub mod model;
pub mod state;

pub use model::{BreedFeed, BreedModel};
pub use state::DataState;
