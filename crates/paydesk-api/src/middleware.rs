//! Route guards. A route requiring a role resolves the corresponding session
//! slot and redirects to the matching login view when it is absent — this is
//! the entire authorization model; there are no granular permissions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use paydesk_types::models::{Admin, User};

use crate::session::SESSION_COOKIE;
use crate::state::AppState;

/// The authenticated user, inserted by [`require_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The authenticated admin, inserted by [`require_admin`].
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

pub async fn require_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return Redirect::to("/login").into_response();
    };
    let Some(user_id) = state.sessions.resolve_user(&token) else {
        return Redirect::to("/login").into_response();
    };
    let Some(user) = state.store.find_user_by_id(user_id) else {
        // Account deleted by an admin mid-session; the slot is dead.
        state.sessions.logout_user(&token);
        return Redirect::to("/login").into_response();
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return Redirect::to("/admin_login").into_response();
    };
    let Some(admin_id) = state.sessions.resolve_admin(&token) else {
        return Redirect::to("/admin_login").into_response();
    };
    let Some(admin) = state.store.admin_by_id(admin_id) else {
        state.sessions.logout_admin(&token);
        return Redirect::to("/admin_login").into_response();
    };

    req.extensions_mut().insert(CurrentAdmin(admin));
    next.run(req).await
}
