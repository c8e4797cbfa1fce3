//! The authenticated actor, passed explicitly into every service call.

use crate::person::{Person, Role};

/// Who is performing the current request. Produced by the transport's auth
/// layer; the core never inspects credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  actor: Person,
}

impl Session {
  pub fn new(actor: Person) -> Self { Self { actor } }

  pub fn actor(&self) -> &Person { &self.actor }

  pub fn role(&self) -> Role { self.actor.role }
}
