//! Handlers for `/feedback` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/feedback` | Body: [`FeedbackPayload`]; managers only; returns 201 + the record |
//! | `GET`  | `/feedback/{id}` | Author or recipient only |
//! | `PUT`  | `/feedback/{id}` | Body: [`FeedbackPayload`]; author only, before acknowledgment |
//! | `PUT`  | `/feedback/acknowledge/{id}` | Recipient only, exactly once |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use rapport_core::{
  FeedbackService,
  feedback::{Feedback, FeedbackPayload},
  store::FeedbackStore,
};
use uuid::Uuid;

use crate::{error::ApiError, session::CurrentSession};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /feedback`: returns 201 + the stored [`Feedback`].
pub async fn create<S>(
  State(service): State<FeedbackService<S>>,
  CurrentSession(session): CurrentSession,
  body: Result<Json<FeedbackPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedbackStore + 'static,
{
  let Json(payload) = body?;
  let feedback = service.submit_feedback(&session, payload).await?;
  Ok((StatusCode::CREATED, Json(feedback)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /feedback/{id}`
pub async fn get_one<S>(
  State(service): State<FeedbackService<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<Feedback>, ApiError>
where
  S: FeedbackStore + 'static,
{
  Ok(Json(service.feedback(&session, id).await?))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `PUT /feedback/{id}`: replaces strengths, areas to improve and sentiment.
pub async fn update<S>(
  State(service): State<FeedbackService<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
  body: Result<Json<FeedbackPayload>, JsonRejection>,
) -> Result<Json<Feedback>, ApiError>
where
  S: FeedbackStore + 'static,
{
  let Json(payload) = body?;
  Ok(Json(service.update_feedback(&session, id, payload).await?))
}

// ─── Acknowledge ──────────────────────────────────────────────────────────────

/// `PUT /feedback/acknowledge/{id}`
pub async fn acknowledge<S>(
  State(service): State<FeedbackService<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<Feedback>, ApiError>
where
  S: FeedbackStore + 'static,
{
  Ok(Json(service.acknowledge_feedback(&session, id).await?))
}
