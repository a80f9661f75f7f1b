use breedcache::cache::SqliteStorage;
use breedcache::clock::{age_display, SystemClock};
use breedcache::config::Config;
use breedcache::dogs::{DogApiClient, ItemDataSummary};
use breedcache::{logging, BreedModel, DataState};
use chrono::Duration;
use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "breedcache")]
#[command(about = "Browse the dog.ceo breed list with a local cache and favorites")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/breedcache/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Path to the SQLite cache database
  #[arg(short, long, global = true)]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List breeds, downloading them if the cache is stale
  List {
    /// Download even if the cache is fresh
    #[arg(short, long)]
    refresh: bool,
  },
  /// Toggle a breed's favorite flag
  Favorite {
    /// Breed name
    name: String,
  },
  /// Show cache age and counts
  Status,
  /// Delete all cached breeds and favorites
  Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  // Override database if specified on command line
  let config = if let Some(database) = args.database {
    Config {
      database: Some(database),
      ..config
    }
  } else {
    config
  };

  let _log_guard = logging::init(config.log_dir.as_deref())?;

  let model = build_model(&config)?;

  match args.command {
    Command::List { refresh } => list(&model, refresh).await,
    Command::Favorite { name } => favorite(&model, &name).await,
    Command::Status => status(&model),
    Command::Reset => {
      model.delete_all().await?;
      println!("Breed cache cleared");
      Ok(())
    }
  }
}

fn build_model(config: &Config) -> Result<BreedModel> {
  let api = DogApiClient::new(&config.api_url)?;
  let storage = Arc::new(SqliteStorage::open(&config.database_path()?)?);

  let model = BreedModel::new(Arc::new(api), storage, Arc::new(SystemClock))
  .with_stale_time(Duration::minutes(config.stale_minutes))
  .with_default_breed(config.default_breed.clone());

  Ok(model)
}

async fn list(model: &BreedModel, refresh: bool) -> Result<()> {
  let mut feed = model.get_breeds(refresh);

  while let Some(state) = feed.next_state().await {
    match state {
      DataState::Loading => eprintln!("Loading breeds..."),
      DataState::Success(summary) => {
        print_summary(&summary);
        return Ok(());
      }
      DataState::Error(msg) => return Err(eyre!(msg)),
    }
  }

  Err(eyre!("Breed feed ended without a result"))
}

fn print_summary(summary: &ItemDataSummary) {
  for breed in &summary.all_items {
    let marker = if breed.is_favorite() { "*" } else { " " };
    let selected = if breed.name == summary.selected.name {
      " <"
    } else {
      ""
    };
    println!("{} {}{}", marker, breed.name, selected);
  }
}

async fn favorite(model: &BreedModel, name: &str) -> Result<()> {
  let breed = model
    .get_breeds_from_cache()?
    .and_then(|summary| summary.all_items.into_iter().find(|b| b.name == name))
    .ok_or_else(|| eyre!("Unknown breed '{}'. Run `breedcache list` first.", name))?;

  let updated = model.update_breed_favorite(&breed).await?;
  if updated.is_favorite() {
    println!("{} is now a favorite", updated.name);
  } else {
    println!("{} is no longer a favorite", updated.name);
  }
  Ok(())
}

fn status(model: &BreedModel) -> Result<()> {
  let age = model
    .last_refresh()?
    .map(|at| age_display(at, model.now()))
    .unwrap_or_else(|| "never".to_string());

  let summary = model.get_breeds_from_cache()?;
  let (total, favorites) = summary
    .as_ref()
    .map(|s| (s.all_items.len(), s.favorites().count()))
    .unwrap_or((0, 0));

  println!("Last refresh: {}", age);
  println!("Stale:        {}", if model.is_stale()? { "yes" } else { "no" });
  println!("Breeds:       {}", total);
  println!("Favorites:    {}", favorites);
  Ok(())
}
