//! `GET /dashboard`: the role-appropriate view for the signed-in person.
//!
//! Managers get their team with per-member history and sentiment trends;
//! employees get their own feedback timeline. The `role` field in the body
//! says which.

use axum::{Json, extract::State};
use rapport_core::{FeedbackService, dashboard::Dashboard, store::FeedbackStore};

use crate::{error::ApiError, session::CurrentSession};

pub async fn handler<S>(
  State(service): State<FeedbackService<S>>,
  CurrentSession(session): CurrentSession,
) -> Result<Json<Dashboard>, ApiError>
where
  S: FeedbackStore + 'static,
{
  Ok(Json(service.dashboard(&session).await?))
}
