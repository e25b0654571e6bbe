//! Registration, login, and logout for both authentication domains.
//!
//! User and admin auth are independent: each binds its own slot on the
//! session token, so an admin and a user login can coexist in one browser.
//! Both fail with the same generic message regardless of whether the email
//! was unknown or the password wrong, to avoid leaking account existence.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde_json::json;
use tracing::{error, info, warn};

use paydesk_store::{NewUser, StoreError};
use paydesk_types::forms::{LoginForm, RegisterForm};

use crate::middleware::CurrentUser;
use crate::session::{SESSION_COOKIE, session_cookie};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Wrong email or password";

/// Salted adaptive hash (Argon2id, default params).
pub fn hash_password(raw: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, raw: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// -- User auth --

pub async fn login_page(State(state): State<AppState>) -> Response {
    state.page("login", json!({ "message": null })).into_response()
}

pub async fn register_page(State(state): State<AppState>) -> Response {
    state.page("register", json!({ "message": null })).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let password_hash = match hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("password hashing failed: {e}");
            return state
                .page("register", json!({ "message": "Registration failed, try again" }))
                .into_response();
        }
    };

    match state.store.create_user(NewUser {
        name: form.name,
        phone: form.phone,
        email: form.email,
        password_hash,
    }) {
        Ok(_) => Redirect::to("/login").into_response(),
        Err(StoreError::DuplicateEmail) => state
            .page(
                "register",
                json!({ "message": "An account with this email already exists" }),
            )
            .into_response(),
        Err(e) => {
            error!("registration failed: {e}");
            state
                .page("register", json!({ "message": "Registration failed, try again" }))
                .into_response()
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = state
        .store
        .find_user_by_email(&form.email)
        .filter(|u| verify_password(&u.password_hash, &form.password));

    let Some(user) = user else {
        info!(email = %form.email, "failed user login");
        return state
            .page("login", json!({ "message": INVALID_CREDENTIALS }))
            .into_response();
    };

    let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned());
    let token = state.sessions.login_user(presented.as_deref(), user.id);
    info!(user_id = %user.user_id, "user logged in");

    (
        jar.add(session_cookie(token, state.config.production)),
        Redirect::to("/dashboard"),
    )
        .into_response()
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.logout_user(cookie.value());
    }
    Redirect::to("/login").into_response()
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    let payments = state.store.payments_for_user(user.id);
    state
        .page("dashboard", json!({ "user": user, "payments": payments }))
        .into_response()
}

// -- Admin auth --

pub async fn admin_login_page(State(state): State<AppState>) -> Response {
    state
        .page("admin_login", json!({ "message": null }))
        .into_response()
}

pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    // Defensive re-seed: if the in-memory store lost the admin record, put it
    // back before checking credentials. Not a security measure.
    if state.store.admin_count() == 0 {
        warn!("admin store is empty at login time, re-seeding");
        match hash_password(&state.config.admin_password) {
            Ok(hash) => {
                state
                    .store
                    .seed_admin(&state.config.admin_email, &hash, &state.config.admin_name);
            }
            Err(e) => error!("emergency admin re-seed failed: {e}"),
        }
    }

    let admin = state
        .store
        .admin_by_email(&form.email)
        .filter(|a| verify_password(&a.password_hash, &form.password));

    let Some(admin) = admin else {
        info!(email = %form.email, "failed admin login");
        return state
            .page("admin_login", json!({ "message": INVALID_CREDENTIALS }))
            .into_response();
    };

    let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned());
    let token = state.sessions.login_admin(presented.as_deref(), admin.id);
    info!(admin_id = admin.id, "admin logged in");

    (
        jar.add(session_cookie(token, state.config.production)),
        Redirect::to("/admin_panel"),
    )
        .into_response()
}

pub async fn admin_logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.logout_admin(cookie.value());
    }
    Redirect::to("/admin_login").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_rejects() {
        let hash = hash_password("pw1").unwrap();
        assert!(verify_password(&hash, "pw1"));
        assert!(!verify_password(&hash, "pw2"));
        assert!(!verify_password("not-a-phc-string", "pw1"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("pw1").unwrap();
        let b = hash_password("pw1").unwrap();
        assert_ne!(a, b);
    }
}
