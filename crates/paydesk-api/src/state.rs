//! Application state shared across handlers.

use std::sync::Arc;

use axum::response::Html;
use serde_json::Value;

use paydesk_store::Store;

use crate::render::Renderer;
use crate::session::Sessions;
use crate::uploads::Storage;

/// Runtime configuration resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Marks the session cookie `Secure` and is logged at startup.
    pub production: bool,
    /// The fixed destination number users are told to send money to.
    pub receive_number: String,
    /// Admin seed credentials, also used for the emergency re-seed path.
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: Arc<Sessions>,
    pub renderer: Arc<dyn Renderer>,
    pub uploads: Arc<Storage>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Render a view with its data bag. Rendering is a thin collaborator: the
    /// handler only decides the view name and the data.
    pub fn page(&self, view: &str, data: Value) -> Html<String> {
        Html(self.renderer.render(view, &data))
    }
}
