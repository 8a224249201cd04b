//! Database change listener.
//!
//! A background task `LISTEN`s on [`CHANGE_CHANNEL`] and drops cached lists
//! when the admin dashboard edits a category, panchayath or announcement.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tracing::{debug, error, info, warn};

use esep_core::{CHANGE_CHANNEL, TableChange};

use super::cache::CatalogCache;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Spawn the listener task. It runs for the life of the process.
pub fn spawn_listener(pool: PgPool, cache: CatalogCache) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = listen(&pool, &cache).await {
                error!(error = %e, "Change listener failed, reconnecting");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

async fn listen(pool: &PgPool, cache: &CatalogCache) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGE_CHANNEL).await?;
    info!(channel = CHANGE_CHANNEL, "Listening for database changes");
    // Notifications sent before this point were missed.
    cache.clear();

    loop {
        let notification = listener.recv().await?;
        match TableChange::parse(notification.payload()) {
            Ok(change) => {
                let dropped = cache.apply(&change).await;
                debug!(table = change.table.as_str(), op = ?change.op, dropped, "Database change");
            }
            Err(e) => {
                warn!(error = %e, payload = notification.payload(), "Ignoring change payload");
            }
        }
    }
}
