use chrono::Utc;
use tracing::info;

use paydesk_types::models::{Admin, User};

use crate::{Store, StoreError};

/// Input for registration. The caller hashes the password; the store never
/// sees the plaintext.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
}

/// Counts of dependent records removed by a cascade delete.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub payments_removed: usize,
    pub reviews_removed: usize,
    pub messages_removed: usize,
}

impl Store {
    // -- Users --

    pub fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        self.with_state(|state| {
            if state.users.values().any(|u| u.email == new.email) {
                return Err(StoreError::DuplicateEmail);
            }

            state.next_user_id += 1;
            let id = state.next_user_id;
            let now = Utc::now();

            // Display id: time-derived component plus the counter. The counter
            // alone guarantees uniqueness.
            let millis_tail = now.timestamp_millis().rem_euclid(1_000_000);
            let user = User {
                id,
                user_id: format!("U{millis_tail:06}{id:03}"),
                name: new.name,
                phone: new.phone,
                email: new.email,
                password_hash: new.password_hash,
                balance: 0,
                joined_at: now,
            };

            state.users.insert(id, user.clone());
            info!(user_id = %user.user_id, "registered new user");
            Ok(user)
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.with_state(|state| state.users.values().find(|u| u.email == email).cloned())
    }

    pub fn find_user_by_id(&self, id: i64) -> Option<User> {
        self.with_state(|state| state.users.get(&id).cloned())
    }

    /// Lookup by the human-readable display id (messaging search).
    pub fn find_user_by_display_id(&self, display_id: &str) -> Option<User> {
        self.with_state(|state| {
            state
                .users
                .values()
                .find(|u| u.user_id == display_id)
                .cloned()
        })
    }

    pub fn list_users(&self) -> Vec<User> {
        self.with_state(|state| state.users.values().cloned().collect())
    }

    /// Remove a user together with every payment, review, and message that
    /// references them. Runs under one lock: no reader ever observes a
    /// partial cascade.
    pub fn delete_user_cascade(&self, id: i64) -> Result<CascadeSummary, StoreError> {
        self.with_state(|state| {
            if state.users.remove(&id).is_none() {
                return Err(StoreError::UserNotFound(id));
            }

            let payments_before = state.payments.len();
            state.payments.retain(|_, p| p.user_id != id);
            let reviews_before = state.reviews.len();
            state.reviews.retain(|_, r| r.user_id != id);
            let messages_before = state.messages.len();
            state
                .messages
                .retain(|_, m| m.sender_id != id && m.receiver_id != id);

            let summary = CascadeSummary {
                payments_removed: payments_before - state.payments.len(),
                reviews_removed: reviews_before - state.reviews.len(),
                messages_removed: messages_before - state.messages.len(),
            };
            info!(user_id = id, ?summary, "deleted user and dependent records");
            Ok(summary)
        })
    }

    // -- Admin --

    /// Seed the fixed admin account. Idempotent: if an admin already exists
    /// the existing record is returned untouched, so a re-seed against a
    /// populated store is harmless.
    pub fn seed_admin(&self, email: &str, password_hash: &str, name: &str) -> Admin {
        self.with_state(|state| {
            if let Some(existing) = state.admins.values().next() {
                return existing.clone();
            }

            let admin = Admin {
                id: 1,
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
                name: name.to_owned(),
            };
            state.admins.insert(admin.id, admin.clone());
            info!(email = %admin.email, "seeded admin account");
            admin
        })
    }

    pub fn admin_by_email(&self, email: &str) -> Option<Admin> {
        self.with_state(|state| state.admins.values().find(|a| a.email == email).cloned())
    }

    pub fn admin_by_id(&self, id: i64) -> Option<Admin> {
        self.with_state(|state| state.admins.get(&id).cloned())
    }

    pub fn admin_count(&self) -> usize {
        self.with_state(|state| state.admins.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::store_with_users;

    #[test]
    fn duplicate_email_leaves_store_unchanged() {
        let (store, users) = store_with_users(1);

        let err = store
            .create_user(NewUser {
                name: "Other".into(),
                phone: "018".into(),
                email: users[0].email.clone(),
                password_hash: "h2".into(),
            })
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateEmail);
        assert_eq!(store.list_users().len(), 1);
    }

    #[test]
    fn display_ids_are_unique() {
        let (store, users) = store_with_users(5);
        let mut ids: Vec<_> = users.iter().map(|u| u.user_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        for u in &users {
            assert_eq!(store.find_user_by_display_id(&u.user_id).unwrap().id, u.id);
        }
    }

    #[test]
    fn ids_stay_unique_after_deletion() {
        let (store, users) = store_with_users(2);
        store.delete_user_cascade(users[1].id).unwrap();

        let replacement = store
            .create_user(NewUser {
                name: "New".into(),
                phone: "019".into(),
                email: "new@example.com".into(),
                password_hash: "h".into(),
            })
            .unwrap();

        // Must not reuse the deleted user's id even though the collection
        // shrank back to its previous size.
        assert_ne!(replacement.id, users[1].id);
        assert!(replacement.id > users[1].id);
    }

    #[test]
    fn cascade_removes_only_target_users_records() {
        let (store, users) = store_with_users(3);
        let (a, b, c) = (users[0].id, users[1].id, users[2].id);

        store.submit_payment(a, "0171", 100, "0184").unwrap();
        store.submit_payment(b, "0172", 200, "0184").unwrap();
        store.submit_review(a, "0171".into(), "refund please".into(), None);
        store.submit_review(c, "0173".into(), "me too".into(), None);
        store.send_message(a, b, "hi b").unwrap();
        store.send_message(b, a, "hi a").unwrap();
        store.send_message(b, c, "hi c").unwrap();

        let summary = store.delete_user_cascade(a).unwrap();
        assert_eq!(
            summary,
            CascadeSummary {
                payments_removed: 1,
                reviews_removed: 1,
                messages_removed: 2,
            }
        );

        assert!(store.find_user_by_id(a).is_none());
        assert!(store.list_payments().iter().all(|p| p.user_id != a));
        assert!(store.list_reviews().iter().all(|r| r.user_id != a));
        assert!(store
            .conversation(b, c)
            .iter()
            .all(|m| m.sender_id != a && m.receiver_id != a));

        // Other users' data is untouched.
        assert_eq!(store.payments_for_user(b).len(), 1);
        assert_eq!(store.conversation(b, c).len(), 1);
        assert_eq!(store.list_reviews().len(), 1);
    }

    #[test]
    fn cascade_on_missing_user_fails() {
        let (store, _) = store_with_users(1);
        assert_eq!(
            store.delete_user_cascade(99),
            Err(StoreError::UserNotFound(99))
        );
    }

    #[test]
    fn admin_seed_is_idempotent() {
        let store = Store::new();
        let first = store.seed_admin("admin@example.com", "h1", "Admin");
        let second = store.seed_admin("other@example.com", "h2", "Other");

        assert_eq!(store.admin_count(), 1);
        assert_eq!(second.email, first.email);
        assert_eq!(second.password_hash, first.password_hash);
    }
}
