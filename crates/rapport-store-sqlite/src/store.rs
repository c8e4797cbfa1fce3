//! [`SqliteStore`], the SQLite implementation of [`FeedbackStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rapport_core::{
  feedback::Feedback,
  person::{Credentials, NewPerson, Person, Role, Team},
  store::FeedbackStore,
};

use crate::{
  Error, Result,
  encode::{
    FEEDBACK_COLUMNS, FeedbackRow, PERSON_COLUMNS, RawFeedback, RawPerson, RawTeam,
    TEAM_COLUMNS, encode_dt, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rapport store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// statements run on the connection's own thread, which serialises writes.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row team query keyed by one id.
  async fn query_team(&self, sql: String, id: Uuid) -> Result<Option<Team>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawTeam> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawTeam::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawTeam::into_team).transpose()
  }

  /// Run a feedback list query keyed by one id, newest first.
  async fn query_feedback_list(&self, column: &'static str, id: Uuid) -> Result<Vec<Feedback>> {
    let id_str = encode_uuid(id);
    let raws: Vec<RawFeedback> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {FEEDBACK_COLUMNS} FROM feedback f
           WHERE f.{column} = ?1
           ORDER BY f.created_at DESC, f.rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawFeedback::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawFeedback::into_feedback).collect()
  }
}

// ─── FeedbackStore impl ──────────────────────────────────────────────────────

impl FeedbackStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      person_id:  Uuid::new_v4(),
      username:   input.username,
      full_name:  input.full_name,
      role:       input.role,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(person.person_id);
    let username  = person.username.clone();
    let full_name = person.full_name.clone();
    let role_str  = encode_role(person.role);
    let at_str    = encode_dt(person.created_at);
    let hash      = input.password_hash;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (person_id, username, full_name, role, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, username, full_name, role_str, hash, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_unique(e, || Error::UsernameTaken(person.username.clone())))?;

    tracing::debug!(person_id = %person.person_id, "inserted person");
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people p WHERE p.person_id = ?1"),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn get_credentials(&self, username: String) -> Result<Option<Credentials>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people p WHERE p.username = ?1"),
              rusqlite::params![username],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_credentials).transpose()
  }

  async fn list_people(&self, role: Option<Role>) -> Result<Vec<Person>> {
    let role_str = role.map(encode_role);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(r) = role_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM people p WHERE p.role = ?1 ORDER BY p.rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![r], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM people p ORDER BY p.rowid"))?;
          stmt
            .query_map([], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Teams ─────────────────────────────────────────────────────────────────

  async fn add_team(&self, manager_id: Uuid, name: String) -> Result<Team> {
    let team = Team {
      team_id: Uuid::new_v4(),
      name,
      manager_id,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(team.team_id);
    let name        = team.name.clone();
    let manager_str = encode_uuid(manager_id);
    let at_str      = encode_dt(team.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teams (team_id, name, manager_id, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, manager_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_unique(e, || Error::ManagerHasTeam(manager_id)))?;

    Ok(team)
  }

  async fn get_team(&self, team_id: Uuid) -> Result<Option<Team>> {
    self
      .query_team(
        format!("SELECT {TEAM_COLUMNS} FROM teams t WHERE t.team_id = ?1"),
        team_id,
      )
      .await
  }

  async fn team_for_manager(&self, manager_id: Uuid) -> Result<Option<Team>> {
    self
      .query_team(
        format!("SELECT {TEAM_COLUMNS} FROM teams t WHERE t.manager_id = ?1"),
        manager_id,
      )
      .await
  }

  async fn team_for_member(&self, person_id: Uuid) -> Result<Option<Team>> {
    self
      .query_team(
        format!(
          "SELECT {TEAM_COLUMNS} FROM teams t
           JOIN team_members m ON m.team_id = t.team_id
           WHERE m.person_id = ?1"
        ),
        person_id,
      )
      .await
  }

  async fn add_team_member(&self, team_id: Uuid, person_id: Uuid) -> Result<()> {
    let team_str   = encode_uuid(team_id);
    let person_str = encode_uuid(person_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO team_members (team_id, person_id) VALUES (?1, ?2)",
          rusqlite::params![team_str, person_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_unique(e, || Error::AlreadyOnTeam(person_id)))?;
    Ok(())
  }

  async fn list_team_members(&self, team_id: Uuid) -> Result<Vec<Person>> {
    let team_str = encode_uuid(team_id);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM people p
           JOIN team_members m ON m.person_id = p.person_id
           WHERE m.team_id = ?1
           ORDER BY m.rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![team_str], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Feedback ──────────────────────────────────────────────────────────────

  async fn insert_feedback(&self, feedback: Feedback) -> Result<()> {
    let row = FeedbackRow::from(feedback);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feedback (
             feedback_id, author_id, recipient_id, strengths, areas_to_improve,
             sentiment, created_at, updated_at, acknowledged, acknowledged_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            row.feedback_id,
            row.author_id,
            row.recipient_id,
            row.strengths,
            row.areas_to_improve,
            row.sentiment,
            row.created_at,
            row.updated_at,
            row.acknowledged,
            row.acknowledged_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_feedback(&self, feedback: Feedback) -> Result<()> {
    let id = feedback.feedback_id;
    let row = FeedbackRow::from(feedback);

    // Identity and creation columns are never rewritten.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE feedback
           SET strengths = ?2, areas_to_improve = ?3, sentiment = ?4,
               updated_at = ?5, acknowledged = ?6, acknowledged_at = ?7
           WHERE feedback_id = ?1",
          rusqlite::params![
            row.feedback_id,
            row.strengths,
            row.areas_to_improve,
            row.sentiment,
            row.updated_at,
            row.acknowledged,
            row.acknowledged_at,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::FeedbackNotFound(id));
    }
    Ok(())
  }

  async fn get_feedback(&self, id: Uuid) -> Result<Option<Feedback>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFeedback> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {FEEDBACK_COLUMNS} FROM feedback f WHERE f.feedback_id = ?1"),
              rusqlite::params![id_str],
              RawFeedback::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFeedback::into_feedback).transpose()
  }

  async fn list_feedback_for_recipient(&self, recipient_id: Uuid) -> Result<Vec<Feedback>> {
    self.query_feedback_list("recipient_id", recipient_id).await
  }

  async fn list_feedback_by_author(&self, author_id: Uuid) -> Result<Vec<Feedback>> {
    self.query_feedback_list("author_id", author_id).await
  }
}
