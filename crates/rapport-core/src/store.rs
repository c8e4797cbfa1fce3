//! The `FeedbackStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rapport-store-sqlite`).
//! The store persists whatever it is handed; every lifecycle and authorization
//! rule is enforced above it, in [`crate::service::FeedbackService`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  feedback::Feedback,
  person::{Credentials, NewPerson, Person, Role, Team},
};

/// Abstraction over a Rapport storage backend.
///
/// Lists are returned in the backend's natural retrieval order, which callers
/// preserve. Writes to a single feedback record are serialised by the backend;
/// the last writer wins.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FeedbackStore: Send + Sync {
  /// Backend error. The `Into` impl decides which failures are domain
  /// conflicts (a taken username, a second team) and which are
  /// [`Error::Store`](crate::Error::Store).
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new person. A taken username must convert to
  /// [`Error::Validation`](crate::Error::Validation).
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Look up a person and their stored password hash by username.
  fn get_credentials(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + '_;

  /// List all people, optionally filtered by role.
  fn list_people(
    &self,
    role: Option<Role>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Teams ─────────────────────────────────────────────────────────────

  /// A manager who already leads a team must convert to
  /// [`Error::InvalidState`](crate::Error::InvalidState).
  fn add_team(
    &self,
    manager_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  fn get_team(
    &self,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  /// The team led by `manager_id`, if any.
  fn team_for_manager(
    &self,
    manager_id: Uuid,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  /// The team `person_id` is a member of, if any.
  fn team_for_member(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  /// An employee who is already on a team must convert to
  /// [`Error::InvalidState`](crate::Error::InvalidState).
  fn add_team_member(
    &self,
    team_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Team members in the order they were assigned.
  fn list_team_members(
    &self,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Feedback ──────────────────────────────────────────────────────────

  fn insert_feedback(
    &self,
    feedback: Feedback,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite the mutable columns of an existing record.
  fn update_feedback(
    &self,
    feedback: Feedback,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_feedback(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Feedback>, Self::Error>> + Send + '_;

  fn list_feedback_for_recipient(
    &self,
    recipient_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;

  fn list_feedback_by_author(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Feedback>, Self::Error>> + Send + '_;
}
