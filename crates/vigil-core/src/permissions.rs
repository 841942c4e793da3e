//! The permission catalog — a pure mapping from role to granted capabilities.
//!
//! A capability is an opaque `resource:action` string; membership checks are
//! exact-match with no hierarchy. The catalog is a constant table: a role
//! change re-derives the whole set from scratch rather than patching it.

use std::collections::BTreeSet;

use crate::identity::Role;

/// Capabilities granted to each role. Order within a set is irrelevant.
const ADMIN_CAPABILITIES: &[&str] = &[
  "user:read",
  "user:write",
  "case:read",
  "case:write",
  "report:read",
  "report:write",
  "incident:read",
  "incident:write",
  "analytics:read",
];

const OFFICER_CAPABILITIES: &[&str] = &[
  "case:read",
  "case:write",
  "report:read",
  "report:write",
  "incident:read",
  "incident:write",
];

const USER_CAPABILITIES: &[&str] = &["report:create", "report:read-own"];

/// The capability set granted to `role`. Pure and total; calling it twice
/// for the same role always yields the same set.
pub fn permissions_for(role: Role) -> BTreeSet<String> {
  let capabilities = match role {
    Role::Admin => ADMIN_CAPABILITIES,
    Role::Officer => OFFICER_CAPABILITIES,
    Role::User => USER_CAPABILITIES,
  };
  capabilities.iter().map(|c| c.to_string()).collect()
}

/// Look up capabilities by role name, case-insensitively.
///
/// An unrecognised name yields the empty set rather than an error; callers
/// must treat an empty set as deny-all.
pub fn permissions_for_name(role: &str) -> BTreeSet<String> {
  match Role::parse(role) {
    Ok(r) => permissions_for(r),
    Err(_) => BTreeSet::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn admin_catalog_matches_table() {
    let perms = permissions_for(Role::Admin);
    let expected: BTreeSet<String> = [
      "user:read",
      "user:write",
      "case:read",
      "case:write",
      "report:read",
      "report:write",
      "incident:read",
      "incident:write",
      "analytics:read",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(perms, expected);
  }

  #[test]
  fn officer_catalog_matches_table() {
    let perms = permissions_for(Role::Officer);
    assert_eq!(perms.len(), 6);
    assert!(perms.contains("case:write"));
    assert!(perms.contains("incident:read"));
    assert!(!perms.contains("user:read"));
    assert!(!perms.contains("analytics:read"));
  }

  #[test]
  fn user_catalog_matches_table() {
    let perms = permissions_for(Role::User);
    let expected: BTreeSet<String> =
      ["report:create", "report:read-own"].iter().map(|s| s.to_string()).collect();
    assert_eq!(perms, expected);
  }

  #[test]
  fn catalog_is_stable_across_calls() {
    for role in [Role::Admin, Role::Officer, Role::User] {
      assert_eq!(permissions_for(role), permissions_for(role));
    }
  }

  #[test]
  fn name_lookup_is_case_insensitive() {
    assert_eq!(permissions_for_name("ADMIN"), permissions_for(Role::Admin));
    assert_eq!(permissions_for_name("Officer"), permissions_for(Role::Officer));
  }

  #[test]
  fn unknown_role_name_yields_empty_set() {
    assert!(permissions_for_name("superuser").is_empty());
    assert!(permissions_for_name("").is_empty());
  }
}
