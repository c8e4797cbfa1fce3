//! Feedback lifecycle rules: who may do what, and in which state.
//!
//! A record is either unacknowledged or acknowledged. Content edits are
//! self-loops on the unacknowledged state and only the author may make them.
//! Acknowledgment moves the record to the terminal acknowledged state and only
//! the recipient may perform it, exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  feedback::{Feedback, FeedbackContent},
  person::{Person, Team},
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedbackState {
  Unacknowledged,
  Acknowledged { at: DateTime<Utc> },
}

impl FeedbackState {
  pub fn is_terminal(&self) -> bool { matches!(self, Self::Acknowledged { .. }) }
}

// ─── Creation rules ──────────────────────────────────────────────────────────

/// Only managers write feedback.
pub fn ensure_can_author(actor: &Person) -> Result<()> {
  if !actor.is_manager() {
    return Err(Error::Authorization(format!(
      "{} is not a manager and cannot submit feedback",
      actor.username
    )));
  }
  Ok(())
}

/// The recipient must sit on the team led by `author`.
pub fn ensure_on_team(
  author: &Person,
  team: Option<&Team>,
  members: &[Person],
  recipient_id: Uuid,
) -> Result<()> {
  let on_team = team.is_some_and(|t| t.manager_id == author.person_id)
    && members.iter().any(|m| m.person_id == recipient_id);
  if !on_team {
    return Err(Error::Authorization(format!(
      "recipient {recipient_id} is not on {}'s team",
      author.username
    )));
  }
  Ok(())
}

// ─── Transitions ─────────────────────────────────────────────────────────────

impl Feedback {
  pub fn state(&self) -> FeedbackState {
    match self.acknowledged_at {
      Some(at) if self.acknowledged => FeedbackState::Acknowledged { at },
      _ => FeedbackState::Unacknowledged,
    }
  }

  /// Fails unless `actor` wrote this record and it is still open for edits.
  pub fn ensure_editable_by(&self, actor: &Person) -> Result<()> {
    if actor.person_id != self.author_id {
      return Err(Error::Authorization(format!(
        "only the author may edit feedback {}",
        self.feedback_id
      )));
    }
    if self.state().is_terminal() {
      return Err(Error::InvalidState(format!(
        "feedback {} is acknowledged and can no longer be edited",
        self.feedback_id
      )));
    }
    Ok(())
  }

  /// Overwrite the content fields and advance `updated_at`.
  ///
  /// `updated_at` strictly increases across edits: if `now` has not moved
  /// past the previous value the new stamp is one microsecond later.
  pub fn edit(
    &mut self,
    actor: &Person,
    content: FeedbackContent,
    now: DateTime<Utc>,
  ) -> Result<()> {
    self.ensure_editable_by(actor)?;

    let stamp = if now > self.updated_at {
      now
    } else {
      self.updated_at + Duration::microseconds(1)
    };

    self.strengths = content.strengths;
    self.areas_to_improve = content.areas_to_improve;
    self.sentiment = content.sentiment;
    self.updated_at = stamp;
    Ok(())
  }

  /// Mark the record as read by its recipient. Never idempotent: a second
  /// call fails with [`Error::InvalidState`].
  pub fn acknowledge(&mut self, actor: &Person, now: DateTime<Utc>) -> Result<()> {
    if actor.person_id != self.recipient_id {
      return Err(Error::Authorization(format!(
        "only the recipient may acknowledge feedback {}",
        self.feedback_id
      )));
    }
    if self.state().is_terminal() {
      return Err(Error::InvalidState(format!(
        "feedback {} is already acknowledged",
        self.feedback_id
      )));
    }
    self.acknowledged = true;
    self.acknowledged_at = Some(now);
    Ok(())
  }

  /// Only the author and the recipient may read a record directly.
  pub fn ensure_visible_to(&self, actor: &Person) -> Result<()> {
    if actor.person_id == self.author_id || actor.person_id == self.recipient_id {
      Ok(())
    } else {
      Err(Error::Authorization(format!(
        "feedback {} is not addressed to or written by {}",
        self.feedback_id, actor.username
      )))
    }
  }
}
