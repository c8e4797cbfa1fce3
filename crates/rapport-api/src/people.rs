//! Handlers for roster endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/team` | Members of the signed-in manager's team |
//! | `GET`  | `/me` | The signed-in person |

use axum::{Json, extract::State};
use rapport_core::{FeedbackService, person::Person, store::FeedbackStore};

use crate::{error::ApiError, session::CurrentSession};

/// `GET /team`
pub async fn team<S>(
  State(service): State<FeedbackService<S>>,
  CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: FeedbackStore + 'static,
{
  Ok(Json(service.team(&session).await?))
}

/// `GET /me`
pub async fn me(CurrentSession(session): CurrentSession) -> Json<Person> {
  Json(session.actor().clone())
}
