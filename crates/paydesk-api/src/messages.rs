//! Direct messaging between users. Peers are found by their display id; the
//! conversation view always shows the full two-party history, oldest first.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use paydesk_store::StoreError;
use paydesk_types::forms::{SearchUserForm, SendMessageForm};
use paydesk_types::models::User;

use crate::middleware::CurrentUser;
use crate::state::AppState;

const USER_NOT_FOUND: &str = "No user was found with this user id!";

pub async fn messages_page(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    state
        .page("messages", json!({ "user": user, "messages": [] }))
        .into_response()
}

pub async fn search_user(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<SearchUserForm>,
) -> Response {
    // Searching for yourself is treated as a miss.
    let found = state
        .store
        .find_user_by_display_id(form.search_user_id.trim())
        .filter(|f| f.id != user.id);

    match found {
        Some(found) => conversation_page(&state, &user, &found),
        None => state
            .page(
                "messages",
                json!({ "user": user, "error": USER_NOT_FOUND, "messages": [] }),
            )
            .into_response(),
    }
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<SendMessageForm>,
) -> Response {
    match state
        .store
        .send_message(user.id, form.receiver_id, &form.message_text)
    {
        Ok(_) | Err(StoreError::EmptyText) => {
            // Empty text is dropped silently; either way return to the
            // conversation with the receiver.
            match state.store.find_user_by_id(form.receiver_id) {
                Some(receiver) => {
                    Redirect::to(&format!("/search_user_redirect/{}", receiver.user_id))
                        .into_response()
                }
                None => Redirect::to("/messages").into_response(),
            }
        }
        Err(_) => state
            .page(
                "messages",
                json!({ "user": user, "error": USER_NOT_FOUND, "messages": [] }),
            )
            .into_response(),
    }
}

pub async fn conversation_redirect(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(display_id): Path<String>,
) -> Response {
    match state.store.find_user_by_display_id(&display_id) {
        Some(found) => conversation_page(&state, &user, &found),
        None => Redirect::to("/messages").into_response(),
    }
}

fn conversation_page(state: &AppState, user: &User, found: &User) -> Response {
    let messages = state.store.conversation(user.id, found.id);
    state
        .page(
            "messages",
            json!({ "user": user, "foundUser": found, "messages": messages }),
        )
        .into_response()
}
