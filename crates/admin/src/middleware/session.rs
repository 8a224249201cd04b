//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The store
//! table (`tower_sessions.session`) is created by migration. The cookie
//! settings apply to any [`SessionStore`], so tests can swap in a
//! `MemoryStore`.

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;
use crate::models::Notice;
use crate::models::session::keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "esep_admin_session";

/// Session expiry after inactivity, in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Session store backed by the `tower_sessions.session` table.
#[must_use]
pub fn postgres_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdminConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Queue a notice for the next rendered page.
///
/// Store failures are logged, not returned.
pub async fn push_notice(session: &Session, notice: Notice) {
    if let Err(e) = session.insert(keys::NOTICE, notice).await {
        tracing::warn!(error = %e, "Failed to store notice in session");
    }
}

/// Remove and return the pending notice, if any.
///
/// The session is only written when a notice was actually queued.
pub async fn take_notice(session: &Session) -> Option<Notice> {
    session.get::<Notice>(keys::NOTICE).await.ok().flatten()?;
    session.remove::<Notice>(keys::NOTICE).await.ok().flatten()
}
