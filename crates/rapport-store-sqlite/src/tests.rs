//! Integration tests for `SqliteStore` and `FeedbackService` against an
//! in-memory database.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rapport_core::{
  Error as CoreError, FeedbackService, Session,
  clock::FixedClock,
  dashboard::Dashboard,
  feedback::{Feedback, FeedbackContent, FeedbackPayload, Sentiment},
  person::{NewPerson, Person, Role},
  store::FeedbackStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(username: &str, role: Role) -> NewPerson {
  NewPerson {
    username:      username.into(),
    full_name:     username.replace('_', " "),
    role,
    password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into()),
  }
}

fn jan_2024() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap() }

// ─── Store: people and teams ─────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let person = s.add_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  assert_eq!(person.role, Role::Manager);

  let fetched = s.get_person(person.person_id).await.unwrap();
  assert_eq!(fetched, Some(person));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn credentials_carry_the_password_hash() {
  let s = store().await;
  let person = s.add_person(new_person("employee_alice", Role::Employee)).await.unwrap();

  let creds = s.get_credentials("employee_alice".into()).await.unwrap().unwrap();
  assert_eq!(creds.person, person);
  assert!(creds.password_hash.unwrap().starts_with("$argon2id$"));

  assert!(s.get_credentials("nobody".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected_by_the_store() {
  let s = store().await;
  s.add_person(new_person("employee_bob", Role::Employee)).await.unwrap();
  let err = s.add_person(new_person("employee_bob", Role::Employee)).await.unwrap_err();
  assert!(matches!(&err, crate::Error::UsernameTaken(name) if name == "employee_bob"), "{err:?}");
  assert!(matches!(CoreError::from(err), CoreError::Validation(_)));
}

#[tokio::test]
async fn second_team_for_a_manager_is_a_conflict() {
  let s = store().await;
  let jane = s.add_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  s.add_team(jane.person_id, "Alpha Team".into()).await.unwrap();

  let err = s.add_team(jane.person_id, "Bravo Team".into()).await.unwrap_err();
  assert!(matches!(err, crate::Error::ManagerHasTeam(id) if id == jane.person_id), "{err:?}");
  assert!(matches!(CoreError::from(err), CoreError::InvalidState(_)));
}

#[tokio::test]
async fn second_team_for_an_employee_is_a_conflict() {
  let s = store().await;
  let jane = s.add_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  let doe = s.add_person(new_person("manager_doe", Role::Manager)).await.unwrap();
  let alice = s.add_person(new_person("employee_alice", Role::Employee)).await.unwrap();
  let alpha = s.add_team(jane.person_id, "Alpha Team".into()).await.unwrap();
  let bravo = s.add_team(doe.person_id, "Bravo Team".into()).await.unwrap();
  s.add_team_member(alpha.team_id, alice.person_id).await.unwrap();

  let err = s.add_team_member(bravo.team_id, alice.person_id).await.unwrap_err();
  assert!(matches!(err, crate::Error::AlreadyOnTeam(id) if id == alice.person_id), "{err:?}");
  assert!(matches!(CoreError::from(err), CoreError::InvalidState(_)));
}

#[tokio::test]
async fn other_database_failures_stay_store_errors() {
  let s = store().await;
  let err = s.add_team_member(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)), "{err:?}");
  assert!(matches!(CoreError::from(err), CoreError::Store(_)));
}

#[tokio::test]
async fn list_people_filtered_by_role() {
  let s = store().await;
  s.add_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  s.add_person(new_person("employee_alice", Role::Employee)).await.unwrap();
  s.add_person(new_person("employee_bob", Role::Employee)).await.unwrap();

  assert_eq!(s.list_people(None).await.unwrap().len(), 3);
  let employees = s.list_people(Some(Role::Employee)).await.unwrap();
  let names: Vec<_> = employees.iter().map(|p| p.username.as_str()).collect();
  assert_eq!(names, vec!["employee_alice", "employee_bob"]);
}

#[tokio::test]
async fn team_members_come_back_in_assignment_order() {
  let s = store().await;
  let jane = s.add_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  let bob = s.add_person(new_person("employee_bob", Role::Employee)).await.unwrap();
  let alice = s.add_person(new_person("employee_alice", Role::Employee)).await.unwrap();

  let team = s.add_team(jane.person_id, "Alpha Team".into()).await.unwrap();
  s.add_team_member(team.team_id, bob.person_id).await.unwrap();
  s.add_team_member(team.team_id, alice.person_id).await.unwrap();

  assert_eq!(s.team_for_manager(jane.person_id).await.unwrap(), Some(team.clone()));
  assert_eq!(s.team_for_member(alice.person_id).await.unwrap(), Some(team.clone()));
  assert_eq!(s.get_team(team.team_id).await.unwrap(), Some(team.clone()));
  assert_eq!(s.list_team_members(team.team_id).await.unwrap(), vec![bob, alice]);
}

// ─── Store: feedback rows ────────────────────────────────────────────────────

async fn pair(s: &SqliteStore) -> (Person, Person) {
  let jane = s.add_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  let alice = s.add_person(new_person("employee_alice", Role::Employee)).await.unwrap();
  (jane, alice)
}

fn record(author: &Person, recipient: &Person, at: DateTime<Utc>) -> Feedback {
  let content = FeedbackContent::new(
    "Excellent communication skills",
    "Take more initiative",
    Sentiment::Positive,
  )
  .unwrap();
  Feedback::new(author.person_id, recipient.person_id, content, at)
}

#[tokio::test]
async fn feedback_roundtrips_exactly() {
  let s = store().await;
  let (jane, alice) = pair(&s).await;

  let mut fb = record(&jane, &alice, Utc::now());
  s.insert_feedback(fb.clone()).await.unwrap();
  assert_eq!(s.get_feedback(fb.feedback_id).await.unwrap(), Some(fb.clone()));

  fb.acknowledge(&alice, Utc::now()).unwrap();
  s.update_feedback(fb.clone()).await.unwrap();
  assert_eq!(s.get_feedback(fb.feedback_id).await.unwrap(), Some(fb));
}

#[tokio::test]
async fn update_of_missing_feedback_fails() {
  let s = store().await;
  let (jane, alice) = pair(&s).await;
  let fb = record(&jane, &alice, jan_2024());
  assert!(matches!(
    s.update_feedback(fb).await,
    Err(crate::Error::FeedbackNotFound(_))
  ));
}

#[tokio::test]
async fn feedback_lists_are_newest_first() {
  let s = store().await;
  let (jane, alice) = pair(&s).await;

  let older = record(&jane, &alice, jan_2024());
  let newer = record(&jane, &alice, jan_2024() + Duration::days(30));
  s.insert_feedback(older.clone()).await.unwrap();
  s.insert_feedback(newer.clone()).await.unwrap();

  let received = s.list_feedback_for_recipient(alice.person_id).await.unwrap();
  assert_eq!(received, vec![newer.clone(), older.clone()]);
  let written = s.list_feedback_by_author(jane.person_id).await.unwrap();
  assert_eq!(written, vec![newer, older]);
  assert!(s.list_feedback_by_author(alice.person_id).await.unwrap().is_empty());
}

// ─── Service over SQLite ─────────────────────────────────────────────────────

struct Fixture {
  service: FeedbackService<SqliteStore>,
  clock:   Arc<FixedClock>,
  jane:    Person,
  doe:     Person,
  alice:   Person,
  bob:     Person,
  charlie: Person,
}

impl Fixture {
  fn session(&self, person: &Person) -> Session { Session::new(person.clone()) }
}

/// Two managers with one team each: Jane leads Alice and Bob, Doe leads
/// Charlie.
async fn fixture() -> Fixture {
  let clock = Arc::new(FixedClock::new(jan_2024()));
  let service = FeedbackService::with_clock(Arc::new(store().await), clock.clone());

  let jane = service.register_person(new_person("manager_jane", Role::Manager)).await.unwrap();
  let doe = service.register_person(new_person("manager_doe", Role::Manager)).await.unwrap();
  let alice = service.register_person(new_person("employee_alice", Role::Employee)).await.unwrap();
  let bob = service.register_person(new_person("employee_bob", Role::Employee)).await.unwrap();
  let charlie = service
    .register_person(new_person("employee_charlie", Role::Employee))
    .await
    .unwrap();

  let alpha = service.create_team(jane.person_id, "Alpha Team").await.unwrap();
  let bravo = service.create_team(doe.person_id, "Bravo Team").await.unwrap();
  service.assign_to_team(alpha.team_id, alice.person_id).await.unwrap();
  service.assign_to_team(alpha.team_id, bob.person_id).await.unwrap();
  service.assign_to_team(bravo.team_id, charlie.person_id).await.unwrap();

  Fixture { service, clock, jane, doe, alice, bob, charlie }
}

fn payload(recipient: &Person, sentiment: &str) -> FeedbackPayload {
  FeedbackPayload {
    recipient_id:     Some(recipient.person_id),
    strengths:        Some("Strong technical abilities".into()),
    areas_to_improve: Some("Time management on larger tasks".into()),
    sentiment:        Some(sentiment.into()),
  }
}

#[tokio::test]
async fn concurrent_registrations_of_one_username() {
  let f = fixture().await;
  let (a, b) = tokio::join!(
    f.service.register_person(new_person("employee_dana", Role::Employee)),
    f.service.register_person(new_person("employee_dana", Role::Employee)),
  );

  let (ok, err) = match (a, b) {
    (Ok(person), Err(err)) | (Err(err), Ok(person)) => (person, err),
    other => panic!("expected exactly one registration to win: {other:?}"),
  };
  assert_eq!(ok.username, "employee_dana");
  assert!(matches!(err, CoreError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn concurrent_team_creation_for_one_manager() {
  let f = fixture().await;
  let solo = f.service.register_person(new_person("manager_solo", Role::Manager)).await.unwrap();
  let (a, b) = tokio::join!(
    f.service.create_team(solo.person_id, "Charlie Team"),
    f.service.create_team(solo.person_id, "Delta Team"),
  );

  let err = match (a, b) {
    (Ok(_), Err(err)) | (Err(err), Ok(_)) => err,
    other => panic!("expected exactly one team to be created: {other:?}"),
  };
  assert!(matches!(err, CoreError::InvalidState(_)), "{err:?}");
}

#[tokio::test]
async fn concurrent_assignment_of_one_employee() {
  let f = fixture().await;
  let dana = f.service.register_person(new_person("employee_dana", Role::Employee)).await.unwrap();
  let alpha = f.service.store().team_for_manager(f.jane.person_id).await.unwrap().unwrap();
  let bravo = f.service.store().team_for_manager(f.doe.person_id).await.unwrap().unwrap();
  let (a, b) = tokio::join!(
    f.service.assign_to_team(alpha.team_id, dana.person_id),
    f.service.assign_to_team(bravo.team_id, dana.person_id),
  );

  let err = match (a, b) {
    (Ok(()), Err(err)) | (Err(err), Ok(())) => err,
    other => panic!("expected exactly one assignment to succeed: {other:?}"),
  };
  assert!(matches!(err, CoreError::InvalidState(_)), "{err:?}");
}

#[tokio::test]
async fn register_rejects_taken_and_blank_usernames() {
  let f = fixture().await;
  let taken = f.service.register_person(new_person("employee_alice", Role::Employee)).await;
  assert!(matches!(taken, Err(CoreError::Validation(_))));
  let blank = f.service.register_person(new_person("  ", Role::Employee)).await;
  assert!(matches!(blank, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn roster_rules_are_enforced() {
  let f = fixture().await;

  let second_team = f.service.create_team(f.jane.person_id, "Another").await;
  assert!(matches!(second_team, Err(CoreError::InvalidState(_))));

  let employee_team = f.service.create_team(f.alice.person_id, "Rogue").await;
  assert!(matches!(employee_team, Err(CoreError::Validation(_))));

  let bravo = f.service.store().team_for_manager(f.doe.person_id).await.unwrap().unwrap();
  let moved = f.service.assign_to_team(bravo.team_id, f.alice.person_id).await;
  assert!(matches!(moved, Err(CoreError::InvalidState(_))));

  let manager_member = f.service.assign_to_team(bravo.team_id, f.jane.person_id).await;
  assert!(matches!(manager_member, Err(CoreError::Validation(_))));

  let no_team = f.service.assign_to_team(Uuid::new_v4(), f.bob.person_id).await;
  assert!(matches!(no_team, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn submit_creates_unacknowledged_feedback() {
  let f = fixture().await;

  let fb = f
    .service
    .submit_feedback(&f.session(&f.jane), payload(&f.alice, "positive"))
    .await
    .unwrap();

  assert_eq!(fb.author_id, f.jane.person_id);
  assert_eq!(fb.recipient_id, f.alice.person_id);
  assert_eq!(fb.sentiment, Sentiment::Positive);
  assert_eq!(fb.created_at, jan_2024());
  assert_eq!(fb.updated_at, fb.created_at);
  assert!(!fb.acknowledged);
  assert!(fb.acknowledged_at.is_none());

  let stored = f.service.store().get_feedback(fb.feedback_id).await.unwrap();
  assert_eq!(stored, Some(fb));
}

#[tokio::test]
async fn submit_rejects_invalid_sentiment() {
  let f = fixture().await;
  let result = f
    .service
    .submit_feedback(&f.session(&f.jane), payload(&f.alice, "excited"))
    .await;
  assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn submit_rejects_blank_fields() {
  let f = fixture().await;
  let mut p = payload(&f.alice, "neutral");
  p.strengths = Some(String::new());
  let result = f.service.submit_feedback(&f.session(&f.jane), p).await;
  assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn submit_outside_team_is_unauthorized() {
  let f = fixture().await;
  let result = f
    .service
    .submit_feedback(&f.session(&f.jane), payload(&f.charlie, "neutral"))
    .await;
  assert!(matches!(result, Err(CoreError::Authorization(_))));
}

#[tokio::test]
async fn employees_cannot_submit() {
  let f = fixture().await;
  let result = f
    .service
    .submit_feedback(&f.session(&f.alice), payload(&f.bob, "positive"))
    .await;
  assert!(matches!(result, Err(CoreError::Authorization(_))));
}

#[tokio::test]
async fn submit_to_unknown_recipient_is_not_found() {
  let f = fixture().await;
  let mut p = payload(&f.alice, "positive");
  p.recipient_id = Some(Uuid::new_v4());
  let result = f.service.submit_feedback(&f.session(&f.jane), p).await;
  assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn edit_updates_content_and_timestamp() {
  let f = fixture().await;
  let jane = f.session(&f.jane);
  let fb = f.service.submit_feedback(&jane, payload(&f.alice, "positive")).await.unwrap();

  f.clock.advance(Duration::days(45));
  let edited = f
    .service
    .update_feedback(&jane, fb.feedback_id, payload(&f.alice, "negative"))
    .await
    .unwrap();

  assert_eq!(edited.sentiment, Sentiment::Negative);
  assert_eq!(edited.created_at, fb.created_at);
  assert_eq!(edited.updated_at, jan_2024() + Duration::days(45));

  f.clock.advance(Duration::minutes(5));
  let again = f
    .service
    .update_feedback(&jane, fb.feedback_id, payload(&f.alice, "neutral"))
    .await
    .unwrap();
  assert!(again.updated_at > edited.updated_at);
}

#[tokio::test]
async fn edit_by_someone_else_is_unauthorized() {
  let f = fixture().await;
  let fb = f
    .service
    .submit_feedback(&f.session(&f.jane), payload(&f.alice, "positive"))
    .await
    .unwrap();

  for actor in [&f.doe, &f.alice] {
    let result = f
      .service
      .update_feedback(&f.session(actor), fb.feedback_id, payload(&f.alice, "negative"))
      .await;
    assert!(matches!(result, Err(CoreError::Authorization(_))));
  }
}

#[tokio::test]
async fn edit_of_missing_feedback_is_not_found() {
  let f = fixture().await;
  let result = f
    .service
    .update_feedback(&f.session(&f.jane), Uuid::new_v4(), payload(&f.alice, "neutral"))
    .await;
  assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn acknowledge_once_then_frozen() {
  let f = fixture().await;
  let jane = f.session(&f.jane);
  let alice = f.session(&f.alice);
  let fb = f.service.submit_feedback(&jane, payload(&f.alice, "positive")).await.unwrap();

  let bob_ack = f.service.acknowledge_feedback(&f.session(&f.bob), fb.feedback_id).await;
  assert!(matches!(bob_ack, Err(CoreError::Authorization(_))));

  f.clock.advance(Duration::hours(3));
  let acked = f.service.acknowledge_feedback(&alice, fb.feedback_id).await.unwrap();
  assert!(acked.acknowledged);
  assert_eq!(acked.acknowledged_at, Some(jan_2024() + Duration::hours(3)));

  let second = f.service.acknowledge_feedback(&alice, fb.feedback_id).await;
  assert!(matches!(second, Err(CoreError::InvalidState(_))));

  let edit = f
    .service
    .update_feedback(&jane, fb.feedback_id, payload(&f.alice, "negative"))
    .await;
  assert!(matches!(edit, Err(CoreError::InvalidState(_))));

  let stored = f.service.store().get_feedback(fb.feedback_id).await.unwrap().unwrap();
  assert_eq!(stored, acked);
}

#[tokio::test]
async fn submit_then_acknowledge_roundtrips_through_employee_dashboard() {
  let f = fixture().await;
  let fb = f
    .service
    .submit_feedback(&f.session(&f.jane), payload(&f.alice, "neutral"))
    .await
    .unwrap();
  f.clock.advance(Duration::days(1));
  f.service
    .acknowledge_feedback(&f.session(&f.alice), fb.feedback_id)
    .await
    .unwrap();

  let Dashboard::Employee(dash) = f.service.dashboard(&f.session(&f.alice)).await.unwrap() else {
    panic!("expected an employee dashboard");
  };

  assert_eq!(dash.feedback_timeline.len(), 1);
  let shown = &dash.feedback_timeline[0];
  assert!(shown.acknowledged);
  assert_eq!(shown.acknowledged_at, Some(jan_2024() + Duration::days(1)));
  let expected = Feedback {
    acknowledged: true,
    acknowledged_at: shown.acknowledged_at,
    ..fb
  };
  assert_eq!(shown, &expected);
  assert_eq!(dash.unacknowledged_count, 0);
}

#[tokio::test]
async fn manager_dashboard_counts_and_trends_per_member() {
  let f = fixture().await;
  let jane = f.session(&f.jane);

  for sentiment in ["positive", "positive", "negative"] {
    f.service.submit_feedback(&jane, payload(&f.alice, sentiment)).await.unwrap();
  }
  f.clock.set(Utc.with_ymd_and_hms(2024, 2, 3, 9, 0, 0).unwrap());
  f.service.submit_feedback(&jane, payload(&f.bob, "neutral")).await.unwrap();
  f.service
    .submit_feedback(&f.session(&f.doe), payload(&f.charlie, "positive"))
    .await
    .unwrap();

  let Dashboard::Manager(dash) = f.service.dashboard(&jane).await.unwrap() else {
    panic!("expected a manager dashboard");
  };

  assert_eq!(dash.team_name.as_deref(), Some("Alpha Team"));
  assert_eq!(dash.feedback_count, 4);
  assert_eq!(dash.team_members.len(), 2);

  let alice = &dash.team_members[0];
  assert_eq!(alice.person, f.alice);
  assert_eq!(alice.feedback_history.len(), 3);
  assert_eq!(alice.sentiment_trend.labels, vec!["Jan 2024"]);
  assert_eq!(alice.sentiment_trend.positive, vec![2]);
  assert_eq!(alice.sentiment_trend.negative, vec![1]);

  let bob = &dash.team_members[1];
  assert_eq!(bob.sentiment_trend.labels, vec!["Feb 2024"]);
  assert_eq!(bob.sentiment_trend.neutral, vec![1]);

  assert_eq!(dash.sentiment_totals.total(), 4);
}

#[tokio::test]
async fn edited_feedback_moves_trend_bucket() {
  let f = fixture().await;
  let jane = f.session(&f.jane);
  let fb = f.service.submit_feedback(&jane, payload(&f.alice, "neutral")).await.unwrap();

  f.clock.set(Utc.with_ymd_and_hms(2024, 3, 12, 16, 0, 0).unwrap());
  f.service
    .update_feedback(&jane, fb.feedback_id, payload(&f.alice, "neutral"))
    .await
    .unwrap();

  let Dashboard::Manager(dash) = f.service.dashboard(&jane).await.unwrap() else {
    panic!("expected a manager dashboard");
  };
  assert_eq!(dash.team_members[0].sentiment_trend.labels, vec!["Mar 2024"]);
}

#[tokio::test]
async fn manager_without_team_sees_empty_dashboard_and_no_team() {
  let f = fixture().await;
  let lone = f
    .service
    .register_person(new_person("manager_solo", Role::Manager))
    .await
    .unwrap();
  let session = f.session(&lone);

  let Dashboard::Manager(dash) = f.service.dashboard(&session).await.unwrap() else {
    panic!("expected a manager dashboard");
  };
  assert_eq!(dash.team_name, None);
  assert!(dash.team_members.is_empty());

  assert!(matches!(f.service.team(&session).await, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn team_is_manager_only() {
  let f = fixture().await;
  let members = f.service.team(&f.session(&f.jane)).await.unwrap();
  assert_eq!(members, vec![f.alice.clone(), f.bob.clone()]);

  let result = f.service.team(&f.session(&f.alice)).await;
  assert!(matches!(result, Err(CoreError::Authorization(_))));
}

#[tokio::test]
async fn single_feedback_is_visible_to_author_and_recipient_only() {
  let f = fixture().await;
  let fb = f
    .service
    .submit_feedback(&f.session(&f.jane), payload(&f.alice, "positive"))
    .await
    .unwrap();

  assert_eq!(f.service.feedback(&f.session(&f.jane), fb.feedback_id).await.unwrap(), fb);
  assert_eq!(f.service.feedback(&f.session(&f.alice), fb.feedback_id).await.unwrap(), fb);
  let bob = f.service.feedback(&f.session(&f.bob), fb.feedback_id).await;
  assert!(matches!(bob, Err(CoreError::Authorization(_))));
}
