use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. `id` is the internal numeric key; `user_id` is the
/// human-readable display identifier shown to other users (messaging search
/// looks accounts up by it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Currency minor units. Only ever credited, by payment approval.
    pub balance: i64,
    pub joined_at: DateTime<Utc>,
}

/// The administrator account. Seeded at startup, never created via a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

/// A payment claim. Submitted as `Pending`; an admin resolves it exactly once
/// to `Approved` (which credits the owner's balance) or `Rejected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub sender_number: String,
    pub amount: i64,
    /// The fixed destination number the user was told to send money to.
    pub receive_number: String,
    pub status: PaymentStatus,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
}

/// A refund-request review. Write-once: the status field exists but no route
/// transitions it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub return_number: String,
    pub message: String,
    /// Stored filename of the optional screenshot, as returned by upload storage.
    pub screenshot: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: ReviewStatus,
}

/// A direct message between two users. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}
