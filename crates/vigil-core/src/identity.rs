//! Identity — an authenticated subject with a role and derived permissions.
//!
//! The permission set is never edited directly: it is fully determined by the
//! role at the moment of the last role assignment. Badge numbers are assigned
//! at most once, when an identity first holds an officer or admin role.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, permissions};

// ─── Role ────────────────────────────────────────────────────────────────────

/// The closed set of roles. Free-form role strings are parsed at the boundary
/// and rejected when unknown (see [`permissions::permissions_for_name`] for
/// the one deliberate exception).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Officer,
  User,
}

impl Role {
  /// The storage/wire string for this role.
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::Officer => "officer",
      Role::User => "user",
    }
  }

  /// Parse a role name, case-insensitively.
  pub fn parse(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "admin" => Ok(Role::Admin),
      "officer" => Ok(Role::Officer),
      "user" => Ok(Role::User),
      _ => Err(Error::UnknownRole(s.to_string())),
    }
  }

  /// The synthesized `ROLE_<ROLE_UPPER>` authority carried alongside the
  /// capability strings in an issued token.
  pub fn authority(self) -> String {
    format!("ROLE_{}", self.as_str().to_ascii_uppercase())
  }

  /// Whether identities holding this role carry a badge number.
  pub fn wears_badge(self) -> bool {
    matches!(self, Role::Admin | Role::Officer)
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// An authenticated subject.
///
/// `password_hash` is an argon2 PHC string; the plaintext credential never
/// reaches this type. Outward-facing layers must project identities through
/// a response type that omits the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub identity_id:   Uuid,
  pub name:          String,
  /// Unique across the store (exact-match, case-sensitive index).
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
  /// Assigned once, when the identity first holds a badge-wearing role.
  /// Never regenerated, never cleared.
  pub badge_number:  Option<String>,
  pub phone:         Option<String>,
  pub department:    Option<String>,
  pub avatar:        Option<String>,
  pub active:        bool,
  /// Derived from `role`; rebuilt from the catalog on every role change.
  pub permissions:   BTreeSet<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Identity {
  /// Build a fresh identity with catalog-derived permissions and, for
  /// officer/admin roles, a newly generated badge number.
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    password_hash: impl Into<String>,
    role: Role,
  ) -> Self {
    let now = Utc::now();
    Self {
      identity_id: Uuid::new_v4(),
      name: name.into(),
      email: email.into(),
      password_hash: password_hash.into(),
      role,
      badge_number: role.wears_badge().then(generate_badge_number),
      phone: None,
      department: None,
      avatar: None,
      active: true,
      permissions: permissions::permissions_for(role),
      created_at: now,
      updated_at: now,
    }
  }

  /// Assign a new role, rebuilding the permission set from the catalog.
  ///
  /// A badge number is generated only if none exists yet and the new role
  /// wears one; an already-assigned badge is kept verbatim.
  pub fn set_role(&mut self, role: Role) {
    self.role = role;
    self.permissions = permissions::permissions_for(role);
    if self.badge_number.is_none() && role.wears_badge() {
      self.badge_number = Some(generate_badge_number());
    }
    self.updated_at = Utc::now();
  }
}

/// Badge numbers take the form `SC<up-to-5-digits>`, derived from the
/// creation instant. Effectively unique, not guaranteed unique.
fn generate_badge_number() -> String {
  format!("SC{}", Utc::now().timestamp_millis() % 100_000)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_accepts_mixed_case_and_rejects_unknown() {
    assert_eq!(Role::parse("Admin").unwrap(), Role::Admin);
    assert_eq!(Role::parse("OFFICER").unwrap(), Role::Officer);
    assert!(matches!(Role::parse("root"), Err(Error::UnknownRole(_))));
  }

  #[test]
  fn role_authority_is_uppercased() {
    assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
    assert_eq!(Role::User.authority(), "ROLE_USER");
  }

  #[test]
  fn citizen_gets_no_badge() {
    let id = Identity::new("A", "a@example.com", "$argon2id$...", Role::User);
    assert!(id.badge_number.is_none());
    assert_eq!(id.permissions, crate::permissions::permissions_for(Role::User));
  }

  #[test]
  fn officer_gets_a_badge() {
    let id = Identity::new("B", "b@example.com", "$argon2id$...", Role::Officer);
    let badge = id.badge_number.as_deref().expect("officer badge");
    assert!(badge.starts_with("SC"));
  }

  #[test]
  fn promotion_keeps_the_existing_badge() {
    let mut id = Identity::new("B", "b@example.com", "$argon2id$...", Role::Officer);
    let badge = id.badge_number.clone();
    id.set_role(Role::Admin);
    assert_eq!(id.badge_number, badge);
    assert_eq!(id.permissions, crate::permissions::permissions_for(Role::Admin));
  }

  #[test]
  fn role_change_rebuilds_permissions_from_scratch() {
    let mut id = Identity::new("C", "c@example.com", "$argon2id$...", Role::Admin);
    id.set_role(Role::User);
    assert_eq!(id.permissions, crate::permissions::permissions_for(Role::User));
    assert!(!id.permissions.contains("case:write"));
  }

  #[test]
  fn demotion_does_not_clear_the_badge() {
    let mut id = Identity::new("D", "d@example.com", "$argon2id$...", Role::Officer);
    let badge = id.badge_number.clone();
    id.set_role(Role::User);
    assert_eq!(id.badge_number, badge);
  }
}
