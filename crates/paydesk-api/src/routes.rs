//! Router assembly. Three route groups: public, user-guarded, admin-guarded.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{require_admin, require_user};
use crate::state::AppState;
use crate::{admin, auth, messages, payments, reviews};

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/admin_login",
            get(auth::admin_login_page).post(auth::admin_login),
        );

    let user_routes = Router::new()
        .route("/dashboard", get(auth::dashboard))
        .route("/logout", get(auth::logout))
        .route(
            "/payment",
            get(payments::payment_page).post(payments::submit_payment),
        )
        .route(
            "/write_review",
            get(reviews::write_review_page).post(reviews::submit_review),
        )
        .route("/messages", get(messages::messages_page))
        .route("/search_user", post(messages::search_user))
        .route("/send_message", post(messages::send_message))
        .route(
            "/search_user_redirect/{user_id}",
            get(messages::conversation_redirect),
        )
        .layer(from_fn_with_state(state.clone(), require_user));

    let admin_routes = Router::new()
        .route("/admin_logout", get(auth::admin_logout))
        .route("/admin_panel", get(admin::panel))
        .route("/admin/user_information", get(admin::user_information))
        .route("/admin/delete_user/{id}", post(admin::delete_user))
        .route("/admin/approve_payment/{id}", post(admin::approve_payment))
        .route("/admin/reject_payment/{id}", post(admin::reject_payment))
        .layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(state.uploads.dir()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
