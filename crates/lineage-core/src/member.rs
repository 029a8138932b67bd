//! A person recorded in the family tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A persisted family member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub member_id:     Uuid,
  pub first_name:    String,
  pub middle_name:   Option<String>,
  pub last_name:     String,
  pub date_of_birth: Option<NaiveDate>,
  pub date_of_death: Option<NaiveDate>,
  pub is_alive:      bool,
}

impl Member {
  /// Build a member from its id and the attributes supplied by a caller.
  pub fn from_new(member_id: Uuid, input: NewMember) -> Self {
    Self {
      member_id,
      first_name: input.first_name,
      middle_name: input.middle_name,
      last_name: input.last_name,
      date_of_birth: input.date_of_birth,
      date_of_death: input.date_of_death,
      is_alive: input.is_alive,
    }
  }

  pub fn full_name(&self) -> String {
    full_name(&self.first_name, self.middle_name.as_deref(), &self.last_name)
  }
}

/// Join name parts with single spaces, skipping an empty middle name.
pub fn full_name(first: &str, middle: Option<&str>, last: &str) -> String {
  match middle.map(str::trim).filter(|m| !m.is_empty()) {
    Some(middle) => format!("{first} {middle} {last}"),
    None => format!("{first} {last}"),
  }
}

/// Input to [`crate::store::FamilyStore::add_member`] and
/// [`crate::store::FamilyStore::update_member`].
///
/// Updates are full replacements: every attribute is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
  pub first_name:    String,
  pub middle_name:   Option<String>,
  pub last_name:     String,
  pub date_of_birth: Option<NaiveDate>,
  pub date_of_death: Option<NaiveDate>,
  pub is_alive:      bool,
}

impl NewMember {
  /// Convenience constructor for a living member with no dates.
  pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
    Self {
      first_name:    first_name.into(),
      middle_name:   None,
      last_name:     last_name.into(),
      date_of_birth: None,
      date_of_death: None,
      is_alive:      true,
    }
  }

  /// Reject blank names and contradictory life dates.
  pub fn validate(&self) -> Result<()> {
    if self.first_name.trim().is_empty() {
      return Err(Error::Validation("first_name must not be empty".into()));
    }
    if self.last_name.trim().is_empty() {
      return Err(Error::Validation("last_name must not be empty".into()));
    }
    if let (Some(born), Some(died)) = (self.date_of_birth, self.date_of_death)
      && died < born
    {
      return Err(Error::Validation(format!(
        "date_of_death {died} is before date_of_birth {born}"
      )));
    }
    if self.is_alive && self.date_of_death.is_some() {
      return Err(Error::Validation(
        "a member with a date_of_death cannot be alive".into(),
      ));
    }
    Ok(())
  }
}
