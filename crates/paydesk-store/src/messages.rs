use chrono::Utc;

use paydesk_types::models::Message;

use crate::{Store, StoreError};

impl Store {
    // -- Messages --

    /// Append a direct message. Text is trimmed before storage; whitespace-only
    /// text is rejected. Both participants must exist at creation time.
    pub fn send_message(
        &self,
        sender_id: i64,
        receiver_id: i64,
        text: &str,
    ) -> Result<Message, StoreError> {
        self.with_state(|state| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(StoreError::EmptyText);
            }
            if !state.users.contains_key(&sender_id) {
                return Err(StoreError::UserNotFound(sender_id));
            }
            if !state.users.contains_key(&receiver_id) {
                return Err(StoreError::ReceiverNotFound(receiver_id));
            }

            state.next_message_id += 1;
            let message = Message {
                id: state.next_message_id,
                sender_id,
                receiver_id,
                text: trimmed.to_owned(),
                sent_at: Utc::now(),
            };
            state.messages.insert(message.id, message.clone());
            Ok(message)
        })
    }

    /// The full bidirectional conversation between two users, oldest first.
    /// Full scan over all messages; fine at this scale.
    pub fn conversation(&self, a: i64, b: i64) -> Vec<Message> {
        self.with_state(|state| {
            let mut messages: Vec<Message> = state
                .messages
                .values()
                .filter(|m| {
                    (m.sender_id == a && m.receiver_id == b)
                        || (m.sender_id == b && m.receiver_id == a)
                })
                .cloned()
                .collect();
            messages.sort_by_key(|m| (m.sent_at, m.id));
            messages
        })
    }

    pub fn list_messages(&self) -> Vec<Message> {
        self.with_state(|state| state.messages.values().cloned().collect())
    }
}
