//! In-memory application state, guarded by a single mutex.
//!
//! Every collection lives behind one lock so that multi-collection operations
//! (payment approval crediting a balance, cascade deletes) are atomic from the
//! point of view of every other request. All data is volatile and resets on
//! restart.

pub mod error;
mod messages;
mod payments;
mod reviews;
mod users;

pub use error::StoreError;
pub use users::{CascadeSummary, NewUser};

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use paydesk_types::models::{Admin, Message, Payment, Review, User};

pub struct Store {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    admins: BTreeMap<i64, Admin>,
    payments: BTreeMap<i64, Payment>,
    reviews: BTreeMap<i64, Review>,
    messages: BTreeMap<i64, Message>,
    // Monotonic id counters. Deliberately independent of collection sizes so
    // ids stay unique after deletions.
    next_user_id: i64,
    next_payment_id: i64,
    next_review_id: i64,
    next_message_id: i64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Run `f` with the state lock held. A poisoned lock is recovered: the
    /// state itself is always left consistent because mutations complete
    /// before the lock is released.
    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
