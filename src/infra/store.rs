//! In-memory record store guarded by a single lock.
//!
//! All live user records plus a secondary email index live behind one
//! `Mutex`, so every read and write observes a consistent snapshot and
//! the email uniqueness check is atomic with the insert or update that
//! depends on it.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::{UpdateUser, User};

/// Signal that an email address is already claimed by another record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTaken(pub String);

/// Both tables guarded by the store lock.
///
/// `emails` keys are matched verbatim; the service validates shape but
/// does not normalize case.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
}

/// Thread-safe in-memory store for user records.
///
/// Owned by whoever constructs the application (no process-wide
/// singleton); inject it into the repository at startup.
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: Mutex<Tables>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the store lock, recovering from poisoning.
    ///
    /// The tables stay structurally valid even if a holder panicked,
    /// so continuing with the inner value is safe.
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a new record, failing if the email is already claimed.
    ///
    /// The uniqueness check and the insert happen under the same lock
    /// acquisition, so two racing inserts with the same email cannot
    /// both succeed.
    pub fn insert(&self, user: User) -> Result<(), EmailTaken> {
        let mut tables = self.lock();
        if tables.emails.contains_key(&user.email) {
            return Err(EmailTaken(user.email));
        }
        tables.emails.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user);
        Ok(())
    }

    /// Look up a record by id
    pub fn get(&self, id: &Uuid) -> Option<User> {
        self.lock().users.get(id).cloned()
    }

    /// Look up a record by email via the secondary index
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let tables = self.lock();
        let id = tables.emails.get(email)?;
        tables.users.get(id).cloned()
    }

    /// Apply a partial update to a record.
    ///
    /// Returns `Ok(None)` when the id is absent. When the patch changes
    /// the email, the new address is checked against the index and the
    /// index entry is re-keyed, all under the same lock acquisition.
    pub fn update(&self, id: &Uuid, patch: UpdateUser) -> Result<Option<User>, EmailTaken> {
        let mut tables = self.lock();

        let current_email = match tables.users.get(id) {
            Some(user) => user.email.clone(),
            None => return Ok(None),
        };

        if let Some(new_email) = patch.email.as_deref() {
            if new_email != current_email {
                if tables.emails.contains_key(new_email) {
                    return Err(EmailTaken(new_email.to_string()));
                }
                tables.emails.remove(&current_email);
                tables.emails.insert(new_email.to_string(), *id);
            }
        }

        // Id was present above and the guard is still held
        let user = tables.users.get_mut(id).map(|user| {
            user.apply_update(patch);
            user.clone()
        });
        Ok(user)
    }

    /// Remove a record, returning it if it was present
    pub fn remove(&self, id: &Uuid) -> Option<User> {
        let mut tables = self.lock();
        let user = tables.users.remove(id)?;
        tables.emails.remove(&user.email);
        Some(user)
    }

    /// Snapshot of all current records, consistent at the instant of
    /// the call. Iteration order is unspecified.
    pub fn list_all(&self) -> Vec<User> {
        self.lock().users.values().cloned().collect()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::CreateUser;

    fn user(email: &str) -> User {
        User::new(CreateUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: "Secret123".to_string(),
            is_active: None,
        })
    }

    #[test]
    fn insert_and_get_round_trip() {
        let store = RecordStore::new();
        let u = user("a@x.com");
        let id = u.id;

        store.insert(u).unwrap();
        let found = store.get(&id).unwrap();
        assert_eq!(found.email, "a@x.com");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_rejects_duplicate_email() {
        let store = RecordStore::new();
        store.insert(user("a@x.com")).unwrap();

        let err = store.insert(user("a@x.com")).unwrap_err();
        assert_eq!(err, EmailTaken("a@x.com".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_frees_the_email() {
        let store = RecordStore::new();
        let u = user("a@x.com");
        let id = u.id;
        store.insert(u).unwrap();

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.get(&id).is_none());
        assert!(store.find_by_email("a@x.com").is_none());

        // Email is reusable after deletion
        store.insert(user("a@x.com")).unwrap();
    }

    #[test]
    fn remove_absent_id_is_none() {
        let store = RecordStore::new();
        assert!(store.remove(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn update_rekeys_the_email_index() {
        let store = RecordStore::new();
        let u = user("old@x.com");
        let id = u.id;
        store.insert(u).unwrap();

        let updated = store
            .update(&id, UpdateUser::email_only("new@x.com"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "new@x.com");
        assert!(store.find_by_email("old@x.com").is_none());
        assert_eq!(store.find_by_email("new@x.com").unwrap().id, id);
    }

    #[test]
    fn update_to_taken_email_fails_and_leaves_record_unchanged() {
        let store = RecordStore::new();
        let first = user("a@x.com");
        let second = user("b@x.com");
        let second_id = second.id;
        store.insert(first).unwrap();
        store.insert(second).unwrap();

        let err = store
            .update(&second_id, UpdateUser::email_only("a@x.com"))
            .unwrap_err();
        assert_eq!(err, EmailTaken("a@x.com".to_string()));
        assert_eq!(store.get(&second_id).unwrap().email, "b@x.com");
        assert_eq!(store.find_by_email("b@x.com").unwrap().id, second_id);
    }

    #[test]
    fn update_same_email_is_not_a_conflict() {
        let store = RecordStore::new();
        let u = user("a@x.com");
        let id = u.id;
        store.insert(u).unwrap();

        let updated = store
            .update(&id, UpdateUser::email_only("a@x.com"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "a@x.com");
    }

    #[test]
    fn update_absent_id_is_none() {
        let store = RecordStore::new();
        let result = store.update(&Uuid::new_v4(), UpdateUser::default());
        assert_eq!(result.map(|u| u.is_none()), Ok(true));
    }

    #[test]
    fn list_all_is_a_snapshot() {
        let store = RecordStore::new();
        store.insert(user("a@x.com")).unwrap();
        store.insert(user("b@x.com")).unwrap();

        let snapshot = store.list_all();
        assert_eq!(snapshot.len(), 2);

        // Mutations after the snapshot do not affect it
        store.insert(user("c@x.com")).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn concurrent_inserts_with_distinct_emails_all_land() {
        let store = Arc::new(RecordStore::new());
        let threads: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(user(&format!("u{}@x.com", i))))
            })
            .collect();

        for handle in threads {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(store.len(), 16);

        let ids: std::collections::HashSet<_> =
            store.list_all().into_iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn concurrent_inserts_with_same_email_admit_exactly_one() {
        let store = Arc::new(RecordStore::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(user("dup@x.com")))
            })
            .collect();

        let successes = threads
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}
