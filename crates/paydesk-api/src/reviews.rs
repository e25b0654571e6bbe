//! Refund-request reviews, with an optional screenshot upload.

use axum::{
    Extension,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use paydesk_types::models::User;

use crate::middleware::CurrentUser;
use crate::state::AppState;

const SUBMITTED_MESSAGE: &str = "You will get your money back within 30 minutes";

pub async fn write_review_page(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    state
        .page("write_review", json!({ "user": user }))
        .into_response()
}

/// Multipart form: `returnNumber`, `message`, optional `screenshot` file.
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Response {
    let mut return_number = String::new();
    let mut message = String::new();
    let mut screenshot = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("malformed review form: {e}");
                return review_error(&state, &user, "Could not read the form, try again");
            }
        };

        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "returnNumber" => match field.text().await {
                Ok(text) => return_number = text,
                Err(e) => {
                    warn!("malformed review form: {e}");
                    return review_error(&state, &user, "Could not read the form, try again");
                }
            },
            "message" => match field.text().await {
                Ok(text) => message = text,
                Err(e) => {
                    warn!("malformed review form: {e}");
                    return review_error(&state, &user, "Could not read the form, try again");
                }
            },
            "screenshot" => {
                let original_name = field.file_name().unwrap_or("screenshot").to_owned();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("screenshot upload failed: {e}");
                        return review_error(&state, &user, "Could not read the upload, try again");
                    }
                };
                // Browsers send an empty part when no file was chosen.
                if bytes.is_empty() {
                    continue;
                }
                match state.uploads.save(&original_name, &bytes).await {
                    Ok(filename) => screenshot = Some(filename),
                    Err(e) => {
                        error!("storing screenshot failed: {e}");
                        return review_error(&state, &user, "Could not store the upload, try again");
                    }
                }
            }
            _ => {}
        }
    }

    state
        .store
        .submit_review(user.id, return_number, message, screenshot);

    state
        .page(
            "write_review",
            json!({ "user": user, "message": SUBMITTED_MESSAGE }),
        )
        .into_response()
}

fn review_error(state: &AppState, user: &User, message: &str) -> Response {
    state
        .page("write_review", json!({ "user": user, "message": message }))
        .into_response()
}
