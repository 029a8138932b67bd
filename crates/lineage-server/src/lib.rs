//! HTTP server assembly for Lineage.
//!
//! Loads [`ServerConfig`], mounts the JSON API under `/api` and, on request,
//! seeds the default relationship-type catalog (see [`seed`]).

pub mod seed;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use config::{Config, ConfigError, Environment, File};
use lineage_core::store::FamilyStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered from built-in defaults, then the optional TOML file, then
/// `LINEAGE_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:                    String,
  pub port:                    u16,
  pub database_path:           PathBuf,
  /// Ensure the default relationship types exist at startup.
  pub seed_relationship_types: bool,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Read configuration from `path` (which need not exist) and the environment.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
  Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("database_path", "lineage.db")?
    .set_default("seed_relationship_types", false)?
    .add_source(File::from(path.to_path_buf()).required(false))
    .add_source(Environment::with_prefix("LINEAGE").try_parsing(true))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the JSON API under `/api`, traced per
/// request.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: FamilyStore + 'static,
{
  Router::new()
    .nest("/api", lineage_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
