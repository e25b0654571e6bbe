//! Payment claim submission. Submission never touches the balance: crediting
//! requires admin verification of the out-of-band transfer.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tracing::error;

use paydesk_types::forms::PaymentForm;

use crate::middleware::CurrentUser;
use crate::state::AppState;

const SUBMITTED_MESSAGE: &str =
    "Money will be added to your account within 5 minutes. If it is not, the admin will check.";

pub async fn payment_page(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    state
        .page(
            "payment",
            json!({ "user": user, "receiveNumber": state.config.receive_number }),
        )
        .into_response()
}

pub async fn submit_payment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<PaymentForm>,
) -> Response {
    let amount = form.amount.trim().parse::<i64>().ok().filter(|a| *a > 0);
    let Some(amount) = amount else {
        return state
            .page(
                "payment",
                json!({
                    "user": user,
                    "receiveNumber": state.config.receive_number,
                    "message": "Enter a valid amount",
                }),
            )
            .into_response();
    };

    match state.store.submit_payment(
        user.id,
        &form.sender_number,
        amount,
        &state.config.receive_number,
    ) {
        Ok(_) => state
            .page(
                "dashboard",
                json!({ "user": user, "paymentMessage": SUBMITTED_MESSAGE }),
            )
            .into_response(),
        Err(e) => {
            // Only reachable if the account vanished mid-request.
            error!("payment submission failed: {e}");
            Redirect::to("/login").into_response()
        }
    }
}
