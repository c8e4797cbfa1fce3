//! People and teams: the roster that scopes who may address whom.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Whether a person writes feedback or receives it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Manager,
  Employee,
}

/// A user of the system. Identity fields never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:  Uuid,
  /// Unique login handle.
  pub username:   String,
  pub full_name:  String,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
}

impl Person {
  pub fn is_manager(&self) -> bool { self.role == Role::Manager }
}

/// Input to [`crate::service::FeedbackService::register_person`].
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub username:      String,
  pub full_name:     String,
  pub role:          Role,
  /// Argon2 PHC string; `None` for people who never log in directly.
  pub password_hash: Option<String>,
}

/// A manager's team. A manager leads at most one team and an employee sits
/// on at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub team_id:    Uuid,
  pub name:       String,
  pub manager_id: Uuid,
  pub created_at: DateTime<Utc>,
}

impl Team {
  /// Fails with [`Error::Validation`] on a blank name.
  pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
      return Err(Error::Validation("team name must not be blank".into()));
    }
    Ok(())
  }
}

/// A person together with the stored password hash, as returned to the auth
/// layer. Never serialised.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub person:        Person,
  pub password_hash: Option<String>,
}
