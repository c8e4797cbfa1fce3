//! Error types for `rapport-core`.
//!
//! Every rejected precondition maps to exactly one of the four domain kinds.
//! [`Error::Store`] is reserved for infrastructure failures surfaced by a
//! [`FeedbackStore`](crate::store::FeedbackStore) backend.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or blank, or a value is out of range.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The actor lacks permission for the target entity or relationship.
  #[error("not authorized: {0}")]
  Authorization(String),

  /// The target is in a state that does not accept the mutation.
  #[error("invalid state: {0}")]
  InvalidState(String),

  #[error("{0} not found")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The category of an [`Error`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  Validation,
  Authorization,
  InvalidState,
  NotFound,
  Store,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Validation,
      Self::Authorization(_) => ErrorKind::Authorization,
      Self::InvalidState(_) => ErrorKind::InvalidState,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::Store(_) => ErrorKind::Store,
    }
  }

  /// Box a backend error as an infrastructure failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// Classify a backend error through its own conversion; used as
  /// `.map_err(Error::from_store)`.
  pub fn from_store<E: Into<Self>>(err: E) -> Self { err.into() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
