//! Admin moderation: dashboard views, payment resolution, cascade deletes.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tracing::warn;

use crate::middleware::CurrentAdmin;
use crate::state::AppState;

pub async fn panel(
    State(state): State<AppState>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
) -> Response {
    state
        .page(
            "admin_panel",
            json!({
                "admin": admin,
                "users": state.store.list_users(),
                "payments": state.store.list_payments(),
                "reviews": state.store.list_reviews(),
                "messages": state.store.list_messages(),
            }),
        )
        .into_response()
}

pub async fn user_information(
    State(state): State<AppState>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
) -> Response {
    state
        .page(
            "user_information",
            json!({ "admin": admin, "users": state.store.list_users() }),
        )
        .into_response()
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(e) = state.store.delete_user_cascade(id) {
        // Already gone; the panel just re-renders without it.
        warn!("delete user {id}: {e}");
    }
    Redirect::to("/admin/user_information").into_response()
}

pub async fn approve_payment(
    State(state): State<AppState>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(e) = state.store.approve_payment(id, admin.id) {
        // Missing or already resolved: a no-op, never a double credit.
        warn!("approve payment {id}: {e}");
    }
    Redirect::to("/admin_panel").into_response()
}

pub async fn reject_payment(
    State(state): State<AppState>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(e) = state.store.reject_payment(id, admin.id) {
        warn!("reject payment {id}: {e}");
    }
    Redirect::to("/admin_panel").into_response()
}
