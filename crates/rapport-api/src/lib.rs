//! JSON REST API for Rapport.
//!
//! Exposes an axum [`Router`] backed by a [`FeedbackService`] over any
//! [`FeedbackStore`]. Authentication is the caller's responsibility: it must
//! place a [`rapport_core::Session`] in the request extensions before these
//! handlers run. Requests without one are rejected with 401.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rapport_api::api_router(service.clone()))
//! ```

pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod people;
pub mod session;

use axum::{
  Router,
  routing::{get, post, put},
};
use rapport_core::{FeedbackService, store::FeedbackStore};

pub use error::ApiError;
pub use session::CurrentSession;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: FeedbackService<S>) -> Router<()>
where
  S: FeedbackStore + 'static,
{
  Router::new()
    .route("/dashboard", get(dashboard::handler::<S>))
    // Roster
    .route("/team", get(people::team::<S>))
    .route("/me", get(people::me))
    // Feedback
    .route("/feedback", post(feedback::create::<S>))
    .route("/feedback/{id}", get(feedback::get_one::<S>).put(feedback::update::<S>))
    .route("/feedback/acknowledge/{id}", put(feedback::acknowledge::<S>))
    .with_state(service)
}
