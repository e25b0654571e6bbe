use chrono::Utc;
use tracing::info;

use paydesk_types::models::{Payment, PaymentStatus};

use crate::{Store, StoreError};

impl Store {
    // -- Payments --

    /// Record a payment claim. Always created `Pending`; the balance is only
    /// credited once an admin verifies the out-of-band transfer and approves.
    pub fn submit_payment(
        &self,
        user_id: i64,
        sender_number: &str,
        amount: i64,
        receive_number: &str,
    ) -> Result<Payment, StoreError> {
        self.with_state(|state| {
            if !state.users.contains_key(&user_id) {
                return Err(StoreError::UserNotFound(user_id));
            }

            state.next_payment_id += 1;
            let payment = Payment {
                id: state.next_payment_id,
                user_id,
                sender_number: sender_number.to_owned(),
                amount,
                receive_number: receive_number.to_owned(),
                status: PaymentStatus::Pending,
                submitted_at: Utc::now(),
                approved_at: None,
                approved_by: None,
                rejected_at: None,
                rejected_by: None,
            };
            state.payments.insert(payment.id, payment.clone());
            info!(payment_id = payment.id, user_id, amount, "payment submitted");
            Ok(payment)
        })
    }

    /// Flip a pending payment to approved and credit the owner's balance, in
    /// one step under the lock. Resolved payments are never touched again, so
    /// a repeated approve cannot double-credit.
    pub fn approve_payment(&self, payment_id: i64, admin_id: i64) -> Result<Payment, StoreError> {
        self.with_state(|state| {
            let payment = state
                .payments
                .get_mut(&payment_id)
                .ok_or(StoreError::PaymentNotFound(payment_id))?;

            if payment.status != PaymentStatus::Pending {
                return Err(StoreError::NotPending(payment_id));
            }

            payment.status = PaymentStatus::Approved;
            payment.approved_at = Some(Utc::now());
            payment.approved_by = Some(admin_id);
            let approved = payment.clone();

            if let Some(user) = state.users.get_mut(&approved.user_id) {
                user.balance += approved.amount;
            }

            info!(
                payment_id,
                user_id = approved.user_id,
                amount = approved.amount,
                "payment approved"
            );
            Ok(approved)
        })
    }

    /// Flip a pending payment to rejected. No balance effect.
    pub fn reject_payment(&self, payment_id: i64, admin_id: i64) -> Result<Payment, StoreError> {
        self.with_state(|state| {
            let payment = state
                .payments
                .get_mut(&payment_id)
                .ok_or(StoreError::PaymentNotFound(payment_id))?;

            if payment.status != PaymentStatus::Pending {
                return Err(StoreError::NotPending(payment_id));
            }

            payment.status = PaymentStatus::Rejected;
            payment.rejected_at = Some(Utc::now());
            payment.rejected_by = Some(admin_id);
            info!(payment_id, "payment rejected");
            Ok(payment.clone())
        })
    }

    pub fn payments_for_user(&self, user_id: i64) -> Vec<Payment> {
        self.with_state(|state| {
            state
                .payments
                .values()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    pub fn list_payments(&self) -> Vec<Payment> {
        self.with_state(|state| state.payments.values().cloned().collect())
    }
}
