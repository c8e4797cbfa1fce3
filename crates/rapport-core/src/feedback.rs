//! Feedback: the central record a manager writes about one team member.
//!
//! A feedback record is mutable only through the transitions in
//! [`crate::lifecycle`]: content edits by its author while unacknowledged,
//! and a single acknowledgment by its recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Sentiment ───────────────────────────────────────────────────────────────

/// Categorical tone of a feedback record.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
  Positive,
  Neutral,
  Negative,
}

impl Sentiment {
  /// Parse a client-supplied sentiment, rejecting anything outside the three
  /// allowed values.
  pub fn parse(raw: &str) -> Result<Self> {
    raw.parse().map_err(|_| {
      Error::Validation(format!(
        "sentiment must be one of positive, neutral, negative; got {raw:?}"
      ))
    })
  }
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// The three author-editable fields, already validated.
///
/// Build one with [`FeedbackContent::new`] or [`FeedbackPayload::content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackContent {
  pub strengths:        String,
  pub areas_to_improve: String,
  pub sentiment:        Sentiment,
}

impl FeedbackContent {
  pub fn new(
    strengths: impl Into<String>,
    areas_to_improve: impl Into<String>,
    sentiment: Sentiment,
  ) -> Result<Self> {
    let strengths = strengths.into();
    let areas_to_improve = areas_to_improve.into();
    require_text("strengths", &strengths)?;
    require_text("areas_to_improve", &areas_to_improve)?;
    Ok(Self { strengths, areas_to_improve, sentiment })
  }
}

fn require_text(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} must not be blank")));
  }
  Ok(())
}

/// Request body for submitting or editing feedback, as sent by a client.
///
/// Every field is optional at the wire level so a missing field surfaces as
/// [`Error::Validation`] rather than a deserialisation failure.
/// `recipient_id` is ignored on edit; the recipient of a record never changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackPayload {
  #[serde(default)]
  pub recipient_id:     Option<Uuid>,
  #[serde(default)]
  pub strengths:        Option<String>,
  #[serde(default)]
  pub areas_to_improve: Option<String>,
  #[serde(default)]
  pub sentiment:        Option<String>,
}

impl FeedbackPayload {
  pub fn content(&self) -> Result<FeedbackContent> {
    let strengths = required("strengths", self.strengths.as_deref())?;
    let areas = required("areas_to_improve", self.areas_to_improve.as_deref())?;
    let sentiment = Sentiment::parse(required("sentiment", self.sentiment.as_deref())?)?;
    FeedbackContent::new(strengths, areas, sentiment)
  }

  pub fn recipient(&self) -> Result<Uuid> {
    self
      .recipient_id
      .ok_or_else(|| Error::Validation("recipient_id is required".into()))
  }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
  value.ok_or_else(|| Error::Validation(format!("{field} is required")))
}

// ─── Feedback ────────────────────────────────────────────────────────────────

/// One strengths / areas-to-improve / sentiment record.
///
/// `acknowledged_at` is `Some` exactly when `acknowledged` is true, and
/// `updated_at >= created_at` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
  pub feedback_id:      Uuid,
  pub author_id:        Uuid,
  pub recipient_id:     Uuid,
  pub strengths:        String,
  pub areas_to_improve: String,
  pub sentiment:        Sentiment,
  pub created_at:       DateTime<Utc>,
  /// Equal to `created_at` until the first edit.
  pub updated_at:       DateTime<Utc>,
  pub acknowledged:     bool,
  pub acknowledged_at:  Option<DateTime<Utc>>,
}

impl Feedback {
  /// A fresh, unacknowledged record stamped at `now`.
  pub fn new(
    author_id: Uuid,
    recipient_id: Uuid,
    content: FeedbackContent,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      feedback_id: Uuid::new_v4(),
      author_id,
      recipient_id,
      strengths: content.strengths,
      areas_to_improve: content.areas_to_improve,
      sentiment: content.sentiment,
      created_at: now,
      updated_at: now,
      acknowledged: false,
      acknowledged_at: None,
    }
  }

  pub fn is_edited(&self) -> bool { self.updated_at != self.created_at }

  /// The timestamp of the most recent content activity: `updated_at` once the
  /// record has been edited, `created_at` before that.
  pub fn last_activity_at(&self) -> DateTime<Utc> {
    if self.is_edited() {
      self.updated_at
    } else {
      self.created_at
    }
  }
}
