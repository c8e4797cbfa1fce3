//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings with fixed nanosecond precision, so
//! they round-trip exactly and sort lexicographically. UUIDs are
//! hyphenated lowercase strings. Enums are stored by their lowercase names.

use chrono::{DateTime, SecondsFormat, Utc};
use rapport_core::{
  feedback::{Feedback, Sentiment},
  person::{Credentials, Person, Role, Team},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::UnknownValue { column: "role", value: s.to_owned() })
}

pub fn encode_sentiment(sentiment: Sentiment) -> &'static str { sentiment.into() }

pub fn decode_sentiment(s: &str) -> Result<Sentiment> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "sentiment",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson`]'s field order.
pub const PERSON_COLUMNS: &str =
  "p.person_id, p.username, p.full_name, p.role, p.created_at, p.password_hash";

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:     String,
  pub username:      String,
  pub full_name:     String,
  pub role:          String,
  pub created_at:    String,
  pub password_hash: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get(0)?,
      username:      row.get(1)?,
      full_name:     row.get(2)?,
      role:          row.get(3)?,
      created_at:    row.get(4)?,
      password_hash: row.get(5)?,
    })
  }

  pub fn into_person(self) -> Result<Person> { Ok(self.into_credentials()?.person) }

  pub fn into_credentials(self) -> Result<Credentials> {
    let person = Person {
      person_id:  decode_uuid(&self.person_id)?,
      username:   self.username,
      full_name:  self.full_name,
      role:       decode_role(&self.role)?,
      created_at: decode_dt(&self.created_at)?,
    };
    Ok(Credentials { person, password_hash: self.password_hash })
  }
}

pub const TEAM_COLUMNS: &str = "t.team_id, t.name, t.manager_id, t.created_at";

/// Raw strings read directly from a `teams` row.
pub struct RawTeam {
  pub team_id:    String,
  pub name:       String,
  pub manager_id: String,
  pub created_at: String,
}

impl RawTeam {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      team_id:    row.get(0)?,
      name:       row.get(1)?,
      manager_id: row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_team(self) -> Result<Team> {
    Ok(Team {
      team_id:    decode_uuid(&self.team_id)?,
      name:       self.name,
      manager_id: decode_uuid(&self.manager_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const FEEDBACK_COLUMNS: &str = "f.feedback_id, f.author_id, f.recipient_id, \
   f.strengths, f.areas_to_improve, f.sentiment, f.created_at, f.updated_at, \
   f.acknowledged, f.acknowledged_at";

/// Raw strings read directly from a `feedback` row.
pub struct RawFeedback {
  pub feedback_id:      String,
  pub author_id:        String,
  pub recipient_id:     String,
  pub strengths:        String,
  pub areas_to_improve: String,
  pub sentiment:        String,
  pub created_at:       String,
  pub updated_at:       String,
  pub acknowledged:     bool,
  pub acknowledged_at:  Option<String>,
}

impl RawFeedback {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      feedback_id:      row.get(0)?,
      author_id:        row.get(1)?,
      recipient_id:     row.get(2)?,
      strengths:        row.get(3)?,
      areas_to_improve: row.get(4)?,
      sentiment:        row.get(5)?,
      created_at:       row.get(6)?,
      updated_at:       row.get(7)?,
      acknowledged:     row.get(8)?,
      acknowledged_at:  row.get(9)?,
    })
  }

  pub fn into_feedback(self) -> Result<Feedback> {
    Ok(Feedback {
      feedback_id:      decode_uuid(&self.feedback_id)?,
      author_id:        decode_uuid(&self.author_id)?,
      recipient_id:     decode_uuid(&self.recipient_id)?,
      strengths:        self.strengths,
      areas_to_improve: self.areas_to_improve,
      sentiment:        decode_sentiment(&self.sentiment)?,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
      acknowledged:     self.acknowledged,
      acknowledged_at:  self.acknowledged_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Owned column values for an INSERT or UPDATE of a feedback row.
pub struct FeedbackRow {
  pub feedback_id:      String,
  pub author_id:        String,
  pub recipient_id:     String,
  pub strengths:        String,
  pub areas_to_improve: String,
  pub sentiment:        &'static str,
  pub created_at:       String,
  pub updated_at:       String,
  pub acknowledged:     bool,
  pub acknowledged_at:  Option<String>,
}

impl From<Feedback> for FeedbackRow {
  fn from(fb: Feedback) -> Self {
    Self {
      feedback_id:      encode_uuid(fb.feedback_id),
      author_id:        encode_uuid(fb.author_id),
      recipient_id:     encode_uuid(fb.recipient_id),
      strengths:        fb.strengths,
      areas_to_improve: fb.areas_to_improve,
      sentiment:        encode_sentiment(fb.sentiment),
      created_at:       encode_dt(fb.created_at),
      updated_at:       encode_dt(fb.updated_at),
      acknowledged:     fb.acknowledged,
      acknowledged_at:  fb.acknowledged_at.map(encode_dt),
    }
  }
}
