//! Server-side session tracking.
//!
//! A session token is an opaque random value held by the client in an
//! HTTP-only cookie. Each session carries two identity slots, user and admin,
//! with independent lifecycles: logging out of the admin panel does not end
//! the user session sharing the same browser, and vice versa. Slots expire
//! after 24 hours of inactivity and are renewed on every resolved request.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionId";

#[derive(Clone, Copy)]
enum SlotKind {
    User,
    Admin,
}

struct Slot {
    id: i64,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Session {
    user: Option<Slot>,
    admin: Option<Slot>,
}

impl Session {
    fn slot_mut(&mut self, kind: SlotKind) -> &mut Option<Slot> {
        match kind {
            SlotKind::User => &mut self.user,
            SlotKind::Admin => &mut self.admin,
        }
    }

    fn is_empty(&self) -> bool {
        self.user.is_none() && self.admin.is_none()
    }
}

pub struct Sessions {
    ttl: Duration,
    inner: Mutex<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Bind a user identity to the session behind `token`, minting a fresh
    /// token when none is presented or the presented one is dead. Returns the
    /// token the cookie must carry.
    pub fn login_user(&self, token: Option<&str>, user_id: i64) -> String {
        self.login(token, user_id, SlotKind::User)
    }

    /// Bind the admin identity. Independent of any user slot on the same token.
    pub fn login_admin(&self, token: Option<&str>, admin_id: i64) -> String {
        self.login(token, admin_id, SlotKind::Admin)
    }

    /// Resolve the user identity behind `token`, renewing its expiry (sliding
    /// window). Expired or absent slots resolve to `None`.
    pub fn resolve_user(&self, token: &str) -> Option<i64> {
        self.resolve(token, SlotKind::User)
    }

    pub fn resolve_admin(&self, token: &str) -> Option<i64> {
        self.resolve(token, SlotKind::Admin)
    }

    pub fn logout_user(&self, token: &str) {
        self.clear(token, SlotKind::User);
    }

    pub fn logout_admin(&self, token: &str) {
        self.clear(token, SlotKind::Admin);
    }

    fn login(&self, token: Option<&str>, id: i64, kind: SlotKind) -> String {
        let mut sessions = self.lock();

        // Reuse a presented token only if the session behind it still exists;
        // an unknown token gets a fresh one rather than letting the client
        // pick its own session key.
        let token = match token {
            Some(t) if sessions.contains_key(t) => t.to_owned(),
            _ => mint_token(),
        };

        let session = sessions.entry(token.clone()).or_default();
        *session.slot_mut(kind) = Some(Slot {
            id,
            expires_at: Utc::now() + self.ttl,
        });
        token
    }

    fn resolve(&self, token: &str, kind: SlotKind) -> Option<i64> {
        let mut sessions = self.lock();
        let now = Utc::now();

        let session = sessions.get_mut(token)?;
        match session.slot_mut(kind) {
            Some(slot) if slot.expires_at > now => {
                slot.expires_at = now + self.ttl;
                return Some(slot.id);
            }
            // Expired: drop the slot, and the whole session once empty.
            expired @ Some(_) => *expired = None,
            None => {}
        }

        if session.is_empty() {
            sessions.remove(token);
        }
        None
    }

    fn clear(&self, token: &str, kind: SlotKind) {
        let mut sessions = self.lock();
        let Some(session) = sessions.get_mut(token) else {
            return;
        };
        *session.slot_mut(kind) = None;
        if session.is_empty() {
            sessions.remove(token);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn expire_user_slot(&self, token: &str) {
        let mut sessions = self.lock();
        if let Some(slot) = sessions.get_mut(token).and_then(|s| s.user.as_mut()) {
            slot.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

/// 32 random bytes, base64-url — opaque and unguessable.
fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// The session cookie. HTTP-only always; `Secure` in production where the
/// service is reached over an untrusted network. Lax same-site scoping covers
/// cross-site request protection for the form posts this app serves.
pub fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if production {
        cookie.set_secure(true);
    }
    cookie
}
