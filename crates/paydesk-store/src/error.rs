use thiserror::Error;

/// Domain errors surfaced by store operations. Handlers recover all of these
/// at the request boundary and re-render a view with a human-readable message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error("payment {0} not found")]
    PaymentNotFound(i64),

    #[error("payment {0} has already been resolved")]
    NotPending(i64),

    #[error("message text is empty")]
    EmptyText,

    #[error("receiver {0} not found")]
    ReceiverNotFound(i64),
}
