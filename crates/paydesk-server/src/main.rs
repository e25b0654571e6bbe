use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use paydesk_api::auth;
use paydesk_api::render::HtmlShell;
use paydesk_api::routes::router;
use paydesk_api::session::Sessions;
use paydesk_api::state::{AppConfig, AppState};
use paydesk_api::uploads::Storage;
use paydesk_store::{NewUser, Store};

const SESSION_TTL_HOURS: i64 = 24;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paydesk=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = env_or("PAYDESK_HOST", "0.0.0.0");
    let port: u16 = env_or("PAYDESK_PORT", "5000").parse()?;
    let production = env_flag("PAYDESK_PRODUCTION");
    let upload_dir: PathBuf = env_or("PAYDESK_UPLOAD_DIR", "./uploads").into();

    let config = AppConfig {
        production,
        receive_number: env_or("PAYDESK_RECEIVE_NUMBER", "01846735445"),
        admin_email: env_or("PAYDESK_ADMIN_EMAIL", "admin1994@admin.com"),
        admin_password: env_or("PAYDESK_ADMIN_PASSWORD", "891994"),
        admin_name: env_or("PAYDESK_ADMIN_NAME", "Admin"),
    };

    // All state is in-memory and volatile; a restart starts empty.
    let store = Arc::new(Store::new());
    seed_admin(&store, &config)?;

    if env_flag("PAYDESK_SEED_TEST_USER") {
        seed_test_user(&store)?;
    }

    let state = AppState {
        store,
        sessions: Arc::new(Sessions::new(Duration::hours(SESSION_TTL_HOURS))),
        renderer: Arc::new(HtmlShell),
        uploads: Arc::new(Storage::new(upload_dir).await?),
        config: Arc::new(config),
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("PayDesk server listening on {} (production: {})", addr, production);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the fixed admin account. Failure here is fatal: the service is
/// useless without an admin. One emergency retry before giving up.
fn seed_admin(store: &Store, config: &AppConfig) -> anyhow::Result<()> {
    if let Err(e) = try_seed_admin(store, config) {
        warn!("admin seeding failed ({e}), attempting emergency re-initialization");
        try_seed_admin(store, config)?;
    }

    if store.admin_count() == 0 {
        anyhow::bail!("admin initialization failed, aborting startup");
    }

    info!(email = %config.admin_email, "admin account ready");
    Ok(())
}

fn try_seed_admin(store: &Store, config: &AppConfig) -> anyhow::Result<()> {
    let hash = auth::hash_password(&config.admin_password)?;
    store.seed_admin(&config.admin_email, &hash, &config.admin_name);
    Ok(())
}

/// Dev convenience account (test@test.com / 123456).
fn seed_test_user(store: &Store) -> anyhow::Result<()> {
    let user = store.create_user(NewUser {
        name: "Test User".into(),
        phone: "01712345678".into(),
        email: "test@test.com".into(),
        password_hash: auth::hash_password("123456")?,
    })?;
    info!(user_id = %user.user_id, "seeded test user test@test.com");
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
