use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::time::Duration;
use url::Url;

use super::api_types::BreedResult;

/// Default dog.ceo API base URL
pub const DEFAULT_API_URL: &str = "https://dog.ceo/api";

/// Path of the full breed listing, relative to the API base
const LIST_ALL_PATH: &str = "breeds/list/all";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote source of the breed catalog.
///
/// Any transport failure, non-2xx response, undecodable body or non-success
/// API status is reported as an error.
pub trait BreedApi: Send + Sync {
  fn get_json_from_api(&self) -> BoxFuture<'_, Result<BreedResult>>;
}

/// dog.ceo API client
#[derive(Clone)]
pub struct DogApiClient {
  client: reqwest::Client,
  list_url: Url,
}

impl DogApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let list_url = list_url(base_url)?;

    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, list_url })
  }

  /// Fetch all breeds
  pub async fn list_all(&self) -> Result<BreedResult> {
    tracing::debug!(url = %self.list_url, "Fetching breed list");

    let response = self
      .client
      .get(self.list_url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch breed list: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("Breed list request failed: {}", e))?;

    let result: BreedResult = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse breed list: {}", e))?;

    if !result.is_success() {
      return Err(eyre!("Breed list request returned status '{}'", result.status));
    }

    Ok(result)
  }
}

impl BreedApi for DogApiClient {
  fn get_json_from_api(&self) -> BoxFuture<'_, Result<BreedResult>> {
    self.list_all().boxed()
  }
}

/// Resolve the listing endpoint against a base URL, keeping any base path.
fn list_url(base_url: &str) -> Result<Url> {
  let mut base = base_url.trim().to_string();
  if !base.ends_with('/') {
    base.push('/');
  }

  let base = Url::parse(&base).map_err(|e| eyre!("Invalid API URL '{}': {}", base_url, e))?;
  base
    .join(LIST_ALL_PATH)
    .map_err(|e| eyre!("Invalid API URL '{}': {}", base_url, e))
}
