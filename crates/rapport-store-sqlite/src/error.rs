//! Error type for `rapport-store-sqlite`.

use rapport_core::Error as CoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a value no variant matches.
  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },

  /// An update targeted a feedback row that does not exist.
  #[error("feedback not found: {0}")]
  FeedbackNotFound(Uuid),

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),

  #[error("manager {0} already leads a team")]
  ManagerHasTeam(Uuid),

  #[error("person {0} is already on a team")]
  AlreadyOnTeam(Uuid),
}

impl Error {
  /// Replace a UNIQUE constraint failure with `conflict()`; any other
  /// failure stays a [`Error::Database`].
  pub(crate) fn on_unique(err: tokio_rusqlite::Error, conflict: impl FnOnce() -> Self) -> Self {
    match &err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
      {
        conflict()
      }
      _ => Self::Database(err),
    }
  }
}

/// Conflicts the schema catches map onto the domain taxonomy; everything
/// else is an infrastructure failure.
impl From<Error> for CoreError {
  fn from(err: Error) -> Self {
    match err {
      Error::UsernameTaken(_) => CoreError::Validation(err.to_string()),
      Error::ManagerHasTeam(_) | Error::AlreadyOnTeam(_) => {
        CoreError::InvalidState(err.to_string())
      }
      other => CoreError::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
