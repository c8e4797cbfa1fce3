//! Demo data for a fresh store.

use rapport_core::{
  Error as CoreError, FeedbackService, Session, feedback::FeedbackPayload,
  person::Person, store::FeedbackStore,
};

use crate::{
  auth::hash_password,
  error::Error,
  roster::{add_employee, add_manager},
};

/// Counts of what [`seed_demo`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
  pub managers:  usize,
  pub employees: usize,
  pub feedback:  usize,
}

const MANAGERS: &[(&str, &str, &str)] = &[
  ("manager_jane", "Jane Smith", "Alpha Team"),
  ("manager_doe", "John Doe", "Bravo Team"),
];

const EMPLOYEES: &[(&str, &str, &str)] = &[
  ("employee_alice", "Alice Inchains", "manager_jane"),
  ("employee_bob", "Bob Ross", "manager_jane"),
  ("employee_charlie", "Charlie Chaplin", "manager_doe"),
];

/// author, recipient, strengths, areas to improve, sentiment, acknowledged
type DemoFeedback = (&'static str, &'static str, &'static str, &'static str, &'static str, bool);

const FEEDBACK: &[DemoFeedback] = &[
  (
    "manager_jane",
    "employee_alice",
    "Excellent communication skills and team collaboration.",
    "Could take more initiative on leading new projects.",
    "positive",
    false,
  ),
  (
    "manager_jane",
    "employee_bob",
    "Strong technical abilities and problem-solving.",
    "Time management could be improved on larger tasks.",
    "neutral",
    true,
  ),
  (
    "manager_doe",
    "employee_charlie",
    "Very creative and brings new ideas to the team.",
    "Needs to be more thorough in testing before deployment.",
    "positive",
    false,
  ),
];

/// Populate an empty store with two teams, three employees and a few
/// feedback records. Every account gets `password`.
///
/// Fails with an invalid-state error if anyone is already registered.
pub async fn seed_demo<S>(service: &FeedbackService<S>, password: &str) -> Result<SeedSummary, Error>
where
  S: FeedbackStore,
{
  let existing = service.store().list_people(None).await.map_err(CoreError::from_store)?;
  if !existing.is_empty() {
    return Err(
      CoreError::InvalidState(format!(
        "store already holds {} people; refusing to seed",
        existing.len()
      ))
      .into(),
    );
  }

  let mut people: Vec<Person> = Vec::new();
  for (username, full_name, team) in MANAGERS {
    let (manager, _) =
      add_manager(service, username, full_name, team, Some(hash_password(password)?)).await?;
    people.push(manager);
  }
  for (username, full_name, manager) in EMPLOYEES {
    let (employee, _) =
      add_employee(service, username, full_name, manager, Some(hash_password(password)?)).await?;
    people.push(employee);
  }

  let find = |username: &str| {
    people
      .iter()
      .find(|p| p.username == username)
      .cloned()
      .ok_or_else(|| CoreError::NotFound(format!("person {username:?}")))
  };

  for &(author, recipient, strengths, areas, sentiment, acknowledged) in FEEDBACK {
    let author = Session::new(find(author)?);
    let recipient = find(recipient)?;
    let payload = FeedbackPayload {
      recipient_id:     Some(recipient.person_id),
      strengths:        Some(strengths.to_owned()),
      areas_to_improve: Some(areas.to_owned()),
      sentiment:        Some(sentiment.to_owned()),
    };
    let feedback = service.submit_feedback(&author, payload).await?;
    if acknowledged {
      service
        .acknowledge_feedback(&Session::new(recipient), feedback.feedback_id)
        .await?;
    }
  }

  let summary = SeedSummary {
    managers:  MANAGERS.len(),
    employees: EMPLOYEES.len(),
    feedback:  FEEDBACK.len(),
  };
  tracing::info!(?summary, "seeded demo data");
  Ok(summary)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use rapport_core::{dashboard::Dashboard, person::Role};
  use rapport_store_sqlite::SqliteStore;

  use super::*;

  async fn service() -> FeedbackService<SqliteStore> {
    FeedbackService::new(Arc::new(SqliteStore::open_in_memory().await.unwrap()))
  }

  #[tokio::test]
  async fn seeds_the_demo_roster() {
    let service = service().await;
    let summary = seed_demo(&service, "password").await.unwrap();
    assert_eq!(summary, SeedSummary { managers: 2, employees: 3, feedback: 3 });

    let employees = service.store().list_people(Some(Role::Employee)).await.unwrap();
    assert_eq!(employees.len(), 3);

    let bob = service.credentials("employee_bob").await.unwrap().unwrap().person;
    let Dashboard::Employee(dash) = service.dashboard(&Session::new(bob)).await.unwrap() else {
      panic!("expected an employee dashboard");
    };
    assert_eq!(dash.feedback_timeline.len(), 1);
    assert!(dash.feedback_timeline[0].acknowledged);
    assert_eq!(dash.unacknowledged_count, 0);

    let jane = service.credentials("manager_jane").await.unwrap().unwrap().person;
    let Dashboard::Manager(dash) = service.dashboard(&Session::new(jane)).await.unwrap() else {
      panic!("expected a manager dashboard");
    };
    assert_eq!(dash.team_name.as_deref(), Some("Alpha Team"));
    assert_eq!(dash.feedback_count, 2);
  }

  #[tokio::test]
  async fn refuses_a_populated_store() {
    let service = service().await;
    seed_demo(&service, "password").await.unwrap();
    let again = seed_demo(&service, "password").await;
    assert!(matches!(again, Err(Error::Core(CoreError::InvalidState(_)))));
  }
}
