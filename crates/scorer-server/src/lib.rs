//! Score-entry service for a multi-arena robotics competition.
//!
//! Exposes an axum [`Router`] over a shared compstate: arena volunteers fetch
//! a score sheet for a match, submit it, and the [`workflow`] syncs, writes,
//! validates, and publishes the result.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use scorer_compstate::ScoreStore;
use scorer_core::{competition::Competition, repo::SharedRepository};
use scorer_form::{GameRules, PoolMode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{dashboard, score};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 3000 }

fn default_remote() -> String { "origin".to_string() }

fn default_branch() -> String { "master".to_string() }

/// Runtime server configuration, deserialised from `scorer.toml`, the
/// environment, and command-line overrides.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  /// Root of the compstate git working copy.
  pub compstate_path:     PathBuf,
  /// Never pull or push; commits stay in the working copy.
  #[serde(default)]
  pub local_only:         bool,
  #[serde(default = "default_remote")]
  pub remote:             String,
  #[serde(default = "default_branch")]
  pub branch:             String,
  #[serde(default)]
  pub auth_username:      Option<String>,
  #[serde(default)]
  pub auth_password_hash: Option<String>,
  #[serde(default)]
  pub game:               GameRules,
}

impl ServerConfig {
  /// Defaults for everything but the compstate location.
  pub fn for_compstate(path: impl Into<PathBuf>) -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      compstate_path:     path.into(),
      local_only:         false,
      remote:             default_remote(),
      branch:             default_branch(),
      auth_username:      None,
      auth_password_hash: None,
      game:               GameRules::default(),
    }
  }

  /// The credential gate, if both halves are configured.
  pub fn auth(&self) -> Option<AuthConfig> {
    match (&self.auth_username, &self.auth_password_hash) {
      (Some(username), Some(password_hash)) => Some(AuthConfig {
        username:      username.clone(),
        password_hash: password_hash.clone(),
      }),
      _ => None,
    }
  }

  /// Settings that load but deserve a warning.
  pub fn warnings(&self) -> Vec<String> {
    let mut out = Vec::new();
    if self.auth_username.is_some() != self.auth_password_hash.is_some() {
      out.push(
        "only one of auth_username and auth_password_hash is set; requests are not authenticated"
          .to_string(),
      );
    }
    if let Some(pool) = &self.game.pool
      && pool.mode == PoolMode::AtMost
    {
      out.push(format!(
        "pool mode at_most is deprecated; {} totals will not be checked for exactness",
        pool.metric
      ));
    }
    out
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<R, C> {
  pub repo:         Arc<R>,
  pub competition:  Arc<C>,
  pub store:        ScoreStore,
  pub config:       Arc<ServerConfig>,
  pub auth:         Option<Arc<AuthConfig>>,
  /// Held for the whole of an update so only one request at a time mutates
  /// the working copy.
  pub working_copy: Arc<Mutex<()>>,
}

impl<R, C> AppState<R, C> {
  pub fn new(config: ServerConfig, repo: R, competition: C) -> Self {
    Self {
      repo:         Arc::new(repo),
      competition:  Arc::new(competition),
      store:        ScoreStore::new(config.compstate_path.clone()),
      auth:         config.auth().map(Arc::new),
      config:       Arc::new(config),
      working_copy: Arc::new(Mutex::new(())),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the score-entry service.
pub fn router<R, C>(state: AppState<R, C>) -> Router
where
  R: SharedRepository + Clone + 'static,
  C: Competition + Clone + 'static,
{
  Router::new()
    .route("/",              get(dashboard::handler::<R, C>))
    .route("/{arena}/{num}", get(score::show::<R, C>).post(score::submit::<R, C>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
