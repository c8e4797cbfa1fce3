//! [`FeedbackService`]: the operations exposed to the transport layer.
//!
//! Each method is one discrete request: it reads what it needs from the
//! store, applies the rules in [`crate::lifecycle`], writes through, and
//! returns. Nothing is cached between calls.

use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  dashboard::{Dashboard, compose_employee_dashboard, compose_manager_dashboard},
  feedback::{Feedback, FeedbackPayload},
  lifecycle::{ensure_can_author, ensure_on_team},
  person::{Credentials, NewPerson, Person, Role, Team},
  session::Session,
  store::FeedbackStore,
};

/// Lifecycle controller and dashboard composer over a [`FeedbackStore`].
///
/// Cloning is cheap; the store and clock are reference-counted.
pub struct FeedbackService<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for FeedbackService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), clock: Arc::clone(&self.clock) }
  }
}

impl<S: FeedbackStore> FeedbackService<S> {
  pub fn new(store: Arc<S>) -> Self { Self::with_clock(store, Arc::new(SystemClock)) }

  pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self { store, clock }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Roster ────────────────────────────────────────────────────────────

  pub async fn register_person(&self, input: NewPerson) -> Result<Person> {
    if input.username.trim().is_empty() {
      return Err(Error::Validation("username must not be blank".into()));
    }
    if input.full_name.trim().is_empty() {
      return Err(Error::Validation("full_name must not be blank".into()));
    }
    if self.credentials(&input.username).await?.is_some() {
      return Err(Error::Validation(format!(
        "username {:?} is already taken",
        input.username
      )));
    }

    let person = self.store.add_person(input).await.map_err(Error::from_store)?;
    tracing::info!(
      person_id = %person.person_id,
      username = %person.username,
      role = %person.role,
      "registered person"
    );
    Ok(person)
  }

  pub async fn person(&self, id: Uuid) -> Result<Person> {
    self
      .store
      .get_person(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::NotFound(format!("person {id}")))
  }

  /// The person and stored password hash behind `username`, for the auth
  /// layer.
  pub async fn credentials(&self, username: &str) -> Result<Option<Credentials>> {
    self
      .store
      .get_credentials(username.to_owned())
      .await
      .map_err(Error::from_store)
  }

  pub async fn create_team(&self, manager_id: Uuid, name: impl Into<String>) -> Result<Team> {
    let name = name.into();
    Team::validate_name(&name)?;
    let manager = self.person(manager_id).await?;
    if !manager.is_manager() {
      return Err(Error::Validation(format!(
        "{} is not a manager and cannot lead a team",
        manager.username
      )));
    }
    let existing = self
      .store
      .team_for_manager(manager_id)
      .await
      .map_err(Error::from_store)?;
    if let Some(team) = existing {
      return Err(Error::InvalidState(format!(
        "{} already leads {:?}",
        manager.username, team.name
      )));
    }

    let team = self.store.add_team(manager_id, name).await.map_err(Error::from_store)?;
    tracing::info!(team_id = %team.team_id, name = %team.name, manager = %manager.username, "created team");
    Ok(team)
  }

  pub async fn assign_to_team(&self, team_id: Uuid, employee_id: Uuid) -> Result<()> {
    let team = self
      .store
      .get_team(team_id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::NotFound(format!("team {team_id}")))?;
    let employee = self.person(employee_id).await?;
    if employee.role != Role::Employee {
      return Err(Error::Validation(format!(
        "{} is not an employee and cannot join a team",
        employee.username
      )));
    }
    let current = self
      .store
      .team_for_member(employee_id)
      .await
      .map_err(Error::from_store)?;
    if let Some(current) = current {
      return Err(Error::InvalidState(format!(
        "{} is already on {:?}",
        employee.username, current.name
      )));
    }

    self
      .store
      .add_team_member(team_id, employee_id)
      .await
      .map_err(Error::from_store)?;
    tracing::info!(team = %team.name, employee = %employee.username, "assigned team member");
    Ok(())
  }

  // ── Feedback lifecycle ────────────────────────────────────────────────

  /// Create feedback from the session's manager for one of their team.
  pub async fn submit_feedback(
    &self,
    session: &Session,
    payload: FeedbackPayload,
  ) -> Result<Feedback> {
    let author = session.actor();
    ensure_can_author(author)?;
    let recipient_id = payload.recipient()?;
    let content = payload.content()?;

    let recipient = self.person(recipient_id).await?;
    let team = self
      .store
      .team_for_manager(author.person_id)
      .await
      .map_err(Error::from_store)?;
    let members = self.members_of(team.as_ref()).await?;
    ensure_on_team(author, team.as_ref(), &members, recipient.person_id)?;

    let feedback = Feedback::new(author.person_id, recipient.person_id, content, self.clock.now());
    self
      .store
      .insert_feedback(feedback.clone())
      .await
      .map_err(Error::from_store)?;

    tracing::info!(
      feedback_id = %feedback.feedback_id,
      author = %author.username,
      recipient = %recipient.username,
      sentiment = %feedback.sentiment,
      "feedback submitted"
    );
    Ok(feedback)
  }

  /// Replace the content of unacknowledged feedback written by the session's
  /// actor.
  pub async fn update_feedback(
    &self,
    session: &Session,
    id: Uuid,
    payload: FeedbackPayload,
  ) -> Result<Feedback> {
    let actor = session.actor();
    let mut feedback = self.load(id).await?;
    feedback.ensure_editable_by(actor)?;
    let content = payload.content()?;
    feedback.edit(actor, content, self.clock.now())?;

    self
      .store
      .update_feedback(feedback.clone())
      .await
      .map_err(Error::from_store)?;

    tracing::info!(
      feedback_id = %feedback.feedback_id,
      updated_at = %feedback.updated_at,
      "feedback edited"
    );
    Ok(feedback)
  }

  /// Record that the session's actor has read feedback addressed to them.
  pub async fn acknowledge_feedback(&self, session: &Session, id: Uuid) -> Result<Feedback> {
    let actor = session.actor();
    let mut feedback = self.load(id).await?;
    feedback.acknowledge(actor, self.clock.now())?;

    self
      .store
      .update_feedback(feedback.clone())
      .await
      .map_err(Error::from_store)?;

    tracing::info!(
      feedback_id = %feedback.feedback_id,
      recipient = %actor.username,
      "feedback acknowledged"
    );
    Ok(feedback)
  }

  /// A single record, visible to its author and recipient only.
  pub async fn feedback(&self, session: &Session, id: Uuid) -> Result<Feedback> {
    let feedback = self.load(id).await?;
    feedback.ensure_visible_to(session.actor())?;
    Ok(feedback)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Members of the session manager's team, in assignment order.
  pub async fn team(&self, session: &Session) -> Result<Vec<Person>> {
    let actor = session.actor();
    if !actor.is_manager() {
      return Err(Error::Authorization("only managers can view teams".into()));
    }
    let team = self
      .store
      .team_for_manager(actor.person_id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::NotFound(format!("team led by {}", actor.username)))?;
    self.members_of(Some(&team)).await
  }

  /// Compose the dashboard for the session's role from a fresh fetch.
  pub async fn dashboard(&self, session: &Session) -> Result<Dashboard> {
    let actor = session.actor();
    let dashboard = match actor.role {
      Role::Manager => {
        let team = self
          .store
          .team_for_manager(actor.person_id)
          .await
          .map_err(Error::from_store)?;
        let members = self.members_of(team.as_ref()).await?;
        let all_feedback = self.feedback_involving(actor, &members).await?;
        Dashboard::Manager(compose_manager_dashboard(
          actor,
          team.as_ref(),
          &members,
          &all_feedback,
        ))
      }
      Role::Employee => {
        let received = self
          .store
          .list_feedback_for_recipient(actor.person_id)
          .await
          .map_err(Error::from_store)?;
        Dashboard::Employee(compose_employee_dashboard(actor, &received))
      }
    };
    tracing::debug!(username = %actor.username, role = %actor.role, "composed dashboard");
    Ok(dashboard)
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn load(&self, id: Uuid) -> Result<Feedback> {
    self
      .store
      .get_feedback(id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::NotFound(format!("feedback {id}")))
  }

  async fn members_of(&self, team: Option<&Team>) -> Result<Vec<Person>> {
    match team {
      Some(team) => self
        .store
        .list_team_members(team.team_id)
        .await
        .map_err(Error::from_store),
      None => Ok(Vec::new()),
    }
  }

  /// Feedback received by each member (in roster order), followed by any
  /// other feedback the manager wrote.
  async fn feedback_involving(
    &self,
    manager: &Person,
    members: &[Person],
  ) -> Result<Vec<Feedback>> {
    let mut all = Vec::new();
    for member in members {
      let received = self
        .store
        .list_feedback_for_recipient(member.person_id)
        .await
        .map_err(Error::from_store)?;
      all.extend(received);
    }

    let seen: HashSet<Uuid> = all.iter().map(|fb| fb.feedback_id).collect();
    let authored = self
      .store
      .list_feedback_by_author(manager.person_id)
      .await
      .map_err(Error::from_store)?;
    all.extend(authored.into_iter().filter(|fb| !seen.contains(&fb.feedback_id)));
    Ok(all)
  }
}
