//! The [`CurrentSession`] extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use rapport_core::Session;

use crate::error::ApiError;

/// The authenticated [`Session`] for this request.
///
/// The transport's auth middleware places a `Session` in the request
/// extensions; handlers that take `CurrentSession` reject with 401 when it is
/// absent.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Session>()
      .cloned()
      .map(CurrentSession)
      .ok_or(ApiError::Unauthenticated)
  }
}
