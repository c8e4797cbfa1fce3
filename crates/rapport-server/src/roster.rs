//! Roster administration behind the `add-manager` and `add-employee`
//! subcommands.

use rapport_core::{
  Error as CoreError, FeedbackService,
  person::{NewPerson, Person, Role, Team},
  store::FeedbackStore,
};

use crate::error::Error;

/// Register a manager and the team they lead.
///
/// Everything that could reject the team is checked before the manager is
/// stored, so a failed call leaves no person behind.
pub async fn add_manager<S>(
  service: &FeedbackService<S>,
  username: &str,
  full_name: &str,
  team_name: &str,
  password_hash: Option<String>,
) -> Result<(Person, Team), Error>
where
  S: FeedbackStore,
{
  Team::validate_name(team_name)?;
  let manager = service
    .register_person(NewPerson {
      username: username.to_owned(),
      full_name: full_name.to_owned(),
      role: Role::Manager,
      password_hash,
    })
    .await?;
  let team = service.create_team(manager.person_id, team_name).await?;
  Ok((manager, team))
}

/// Register an employee on the team led by `manager_username`.
pub async fn add_employee<S>(
  service: &FeedbackService<S>,
  username: &str,
  full_name: &str,
  manager_username: &str,
  password_hash: Option<String>,
) -> Result<(Person, Team), Error>
where
  S: FeedbackStore,
{
  let manager = service
    .credentials(manager_username)
    .await?
    .map(|c| c.person)
    .ok_or_else(|| CoreError::NotFound(format!("manager {manager_username:?}")))?;
  let team = service
    .store()
    .team_for_manager(manager.person_id)
    .await
    .map_err(CoreError::from_store)?
    .ok_or_else(|| CoreError::NotFound(format!("team led by {manager_username:?}")))?;

  let employee = service
    .register_person(NewPerson {
      username: username.to_owned(),
      full_name: full_name.to_owned(),
      role: Role::Employee,
      password_hash,
    })
    .await?;
  service.assign_to_team(team.team_id, employee.person_id).await?;
  Ok((employee, team))
}
