//! Account operations against an [`IdentityStore`]: authentication,
//! registration, and role changes.

use uuid::Uuid;
use vigil_core::{
  identity::{Identity, Role},
  store::IdentityStore,
};

use crate::{
  error::{AuthError, Result},
  password,
};

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> AuthError {
  AuthError::Store(Box::new(e))
}

/// Authenticate an email/credential pair.
///
/// An unknown email and a mismatched credential both yield
/// [`AuthError::InvalidCredentials`]. A disabled account is reported as
/// [`AuthError::AccountDisabled`] only after the credential verifies, so the
/// disabled state leaks nothing to a caller who doesn't hold the credential.
pub async fn authenticate<S: IdentityStore>(
  store: &S,
  email: &str,
  password: &str,
) -> Result<Identity> {
  let identity = store
    .find_identity_by_email(email)
    .await
    .map_err(store_err)?
    .ok_or(AuthError::InvalidCredentials)?;

  if !password::verify(password, &identity.password_hash) {
    return Err(AuthError::InvalidCredentials);
  }
  if !identity.active {
    return Err(AuthError::AccountDisabled);
  }
  Ok(identity)
}

/// Register a new identity.
///
/// The existence pre-check and the insert are not atomic against races; a
/// duplicate-key failure at write time is surfaced as the same
/// [`AuthError::EmailTaken`] as the pre-check.
pub async fn register<S: IdentityStore>(
  store: &S,
  name: &str,
  email: &str,
  password: &str,
  role: Role,
) -> Result<Identity> {
  if store.email_exists(email).await.map_err(store_err)? {
    return Err(AuthError::EmailTaken);
  }

  let hash = password::hash(password)?;
  let identity = Identity::new(name, email, hash, role);

  store.save_identity(identity).await.map_err(|e| {
    if S::is_duplicate_email(&e) {
      AuthError::EmailTaken
    } else {
      store_err(e)
    }
  })
}

/// Assign a new role to an existing identity, re-deriving its permission
/// set from the catalog. An already-assigned badge number is kept.
pub async fn change_role<S: IdentityStore>(
  store: &S,
  id: Uuid,
  role: Role,
) -> Result<Identity> {
  let mut identity = store
    .find_identity(id)
    .await
    .map_err(store_err)?
    .ok_or(AuthError::IdentityNotFound(id))?;

  identity.set_role(role);
  store.save_identity(identity).await.map_err(store_err)
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, convert::Infallible, sync::Mutex};

  use chrono::{DateTime, Utc};
  use vigil_core::query::{Page, PageRequest};

  use super::*;

  /// In-memory identity store for exercising the account flows.
  #[derive(Default)]
  struct MemoryStore {
    identities: Mutex<HashMap<Uuid, Identity>>,
  }

  impl IdentityStore for MemoryStore {
    type Error = Infallible;

    async fn save_identity(&self, identity: Identity) -> Result<Identity, Infallible> {
      self
        .identities
        .lock()
        .unwrap()
        .insert(identity.identity_id, identity.clone());
      Ok(identity)
    }

    async fn find_identity(&self, id: Uuid) -> Result<Option<Identity>, Infallible> {
      Ok(self.identities.lock().unwrap().get(&id).cloned())
    }

    async fn find_identity_by_email(
      &self,
      email: &str,
    ) -> Result<Option<Identity>, Infallible> {
      Ok(
        self
          .identities
          .lock()
          .unwrap()
          .values()
          .find(|i| i.email == email)
          .cloned(),
      )
    }

    async fn email_exists(&self, email: &str) -> Result<bool, Infallible> {
      Ok(self.identities.lock().unwrap().values().any(|i| i.email == email))
    }

    async fn list_identities(
      &self,
      page: &PageRequest,
    ) -> Result<Page<Identity>, Infallible> {
      let all: Vec<Identity> =
        self.identities.lock().unwrap().values().cloned().collect();
      let total = all.len() as u64;
      Ok(Page::new(all, page.page, total, page.size))
    }

    async fn identities_by_role(&self, role: Role) -> Result<Vec<Identity>, Infallible> {
      Ok(
        self
          .identities
          .lock()
          .unwrap()
          .values()
          .filter(|i| i.role == role)
          .cloned()
          .collect(),
      )
    }

    async fn delete_identity(&self, id: Uuid) -> Result<bool, Infallible> {
      Ok(self.identities.lock().unwrap().remove(&id).is_some())
    }
  }

  fn created_at(store: &MemoryStore, id: Uuid) -> DateTime<Utc> {
    store.identities.lock().unwrap()[&id].created_at
  }

  #[tokio::test]
  async fn register_then_authenticate() {
    let store = MemoryStore::default();
    let identity =
      register(&store, "A", "a@x.com", "pw", Role::User).await.unwrap();
    assert_eq!(identity.role, Role::User);
    assert!(identity.badge_number.is_none());

    let authed = authenticate(&store, "a@x.com", "pw").await.unwrap();
    assert_eq!(authed.identity_id, identity.identity_id);
  }

  #[tokio::test]
  async fn duplicate_email_is_a_conflict_and_first_identity_survives() {
    let store = MemoryStore::default();
    let first = register(&store, "A", "a@x.com", "pw", Role::User).await.unwrap();

    let err = register(&store, "B", "a@x.com", "pw2", Role::Officer)
      .await
      .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));

    let survivor =
      store.find_identity_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(survivor.identity_id, first.identity_id);
    assert_eq!(survivor.name, "A");
    assert_eq!(survivor.role, Role::User);
  }

  #[tokio::test]
  async fn wrong_password_is_invalid_credentials() {
    let store = MemoryStore::default();
    register(&store, "A", "a@x.com", "pw", Role::User).await.unwrap();

    let err = authenticate(&store, "a@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
  }

  #[tokio::test]
  async fn unknown_email_is_invalid_credentials() {
    let store = MemoryStore::default();
    let err = authenticate(&store, "ghost@x.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
  }

  #[tokio::test]
  async fn disabled_account_with_correct_credential() {
    let store = MemoryStore::default();
    let mut identity =
      register(&store, "A", "a@x.com", "pw", Role::User).await.unwrap();
    identity.active = false;
    store.save_identity(identity).await.unwrap();

    let err = authenticate(&store, "a@x.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::AccountDisabled));

    // Wrong credential on a disabled account still reads as invalid.
    let err = authenticate(&store, "a@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
  }

  #[tokio::test]
  async fn change_role_rederives_permissions_and_keeps_badge() {
    let store = MemoryStore::default();
    let officer =
      register(&store, "B", "b@x.com", "pw", Role::Officer).await.unwrap();
    let badge = officer.badge_number.clone();
    assert!(badge.is_some());
    let created = created_at(&store, officer.identity_id);

    let admin = change_role(&store, officer.identity_id, Role::Admin).await.unwrap();
    assert_eq!(admin.badge_number, badge);
    assert!(admin.permissions.contains("user:write"));
    assert_eq!(created_at(&store, officer.identity_id), created);
  }

  #[tokio::test]
  async fn change_role_of_missing_identity() {
    let store = MemoryStore::default();
    let ghost = Uuid::new_v4();
    let err = change_role(&store, ghost, Role::Admin).await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityNotFound(id) if id == ghost));
  }
}
