//! Dashboard view models, composed from a roster and a set of feedback.
//!
//! Composition is pure. Records keep the order in which the caller supplied
//! them; sorting is left to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::{
  feedback::Feedback,
  person::{Person, Team},
  trend::{SentimentCounts, SentimentTrend, compute_trend},
};

/// A team member with the feedback addressed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberView {
  #[serde(flatten)]
  pub person:           Person,
  pub feedback_history: Vec<Feedback>,
  /// Trend over `feedback_history` only; trends are per employee.
  pub sentiment_trend:  SentimentTrend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerDashboard {
  /// `None` when the manager does not lead a team.
  pub team_name:        Option<String>,
  /// Feedback written by the manager, across every recipient.
  pub feedback_count:   usize,
  /// Sentiment totals over feedback received by current team members.
  pub sentiment_totals: SentimentCounts,
  pub team_members:     Vec<TeamMemberView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDashboard {
  /// Everything addressed to the employee, acknowledged or not.
  pub feedback_timeline:    Vec<Feedback>,
  pub unacknowledged_count: usize,
}

/// The role-appropriate dashboard for an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
  Manager(ManagerDashboard),
  Employee(EmployeeDashboard),
}

pub fn compose_manager_dashboard(
  manager: &Person,
  team: Option<&Team>,
  members: &[Person],
  all_feedback: &[Feedback],
) -> ManagerDashboard {
  let feedback_count = all_feedback
    .iter()
    .filter(|fb| fb.author_id == manager.person_id)
    .count();

  let team_members: Vec<TeamMemberView> = members
    .iter()
    .map(|member| {
      let feedback_history: Vec<Feedback> = all_feedback
        .iter()
        .filter(|fb| fb.recipient_id == member.person_id)
        .cloned()
        .collect();
      let sentiment_trend = compute_trend(&feedback_history);
      TeamMemberView {
        person: member.clone(),
        feedback_history,
        sentiment_trend,
      }
    })
    .collect();

  let sentiment_totals = SentimentCounts::tally(
    team_members.iter().flat_map(|m| m.feedback_history.iter()),
  );

  ManagerDashboard {
    team_name: team.map(|t| t.name.clone()),
    feedback_count,
    sentiment_totals,
    team_members,
  }
}

pub fn compose_employee_dashboard(
  employee: &Person,
  all_feedback: &[Feedback],
) -> EmployeeDashboard {
  let feedback_timeline: Vec<Feedback> = all_feedback
    .iter()
    .filter(|fb| fb.recipient_id == employee.person_id)
    .cloned()
    .collect();
  let unacknowledged_count =
    feedback_timeline.iter().filter(|fb| !fb.acknowledged).count();

  EmployeeDashboard { feedback_timeline, unacknowledged_count }
}
