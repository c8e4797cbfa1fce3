//! HTTP server for Rapport.
//!
//! Wraps the JSON API from [`rapport_api`] with HTTP Basic authentication,
//! request tracing and an unauthenticated welcome banner, backed by any
//! [`FeedbackStore`].

pub mod auth;
pub mod error;
pub mod roster;
pub mod seed;

pub use error::Error;

use std::path::PathBuf;

use axum::{
  Router,
  extract::{Request, State},
  middleware::{self, Next},
  response::Response,
  routing::get,
};
use rapport_core::{FeedbackService, Session, store::FeedbackStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::verify_auth;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `RAPPORT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5001 }

fn default_store_path() -> PathBuf { PathBuf::from("rapport.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's middleware and handlers.
#[derive(Clone)]
pub struct AppState<S: FeedbackStore> {
  pub service: FeedbackService<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub const WELCOME: &str = "Welcome to Rapport, the team feedback tracker.";

/// Build the full application router: `GET /` plus the authenticated API
/// under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: FeedbackStore + Clone + 'static,
{
  let api = rapport_api::api_router(state.service.clone())
    .layer(middleware::from_fn_with_state(state, require_session::<S>));

  Router::new()
    .route("/", get(welcome))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn welcome() -> &'static str { WELCOME }

/// Authenticate the request and attach the caller's [`Session`] for the API
/// handlers.
async fn require_session<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: FeedbackStore + Clone + 'static,
{
  let person = verify_auth(req.headers(), &state.service).await?;
  tracing::debug!(username = %person.username, path = %req.uri().path(), "authenticated");
  req.extensions_mut().insert(Session::new(person));
  Ok(next.run(req).await)
}

// ─── Integration tests ────────────────────────────────────────────────────────
