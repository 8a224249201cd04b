//! Database change feed.
//!
//! A background task `LISTEN`s on [`CHANGE_CHANNEL`], invalidates cached
//! lists, and re-broadcasts each [`TableChange`] to every open `/events`
//! stream. Changes sent while the listener was disconnected are lost, so
//! every (re)connect drops the cache and tells subscribers to resync.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use esep_core::{CHANGE_CHANNEL, TableChange};

use super::cache::CategoryCache;

/// Buffered changes per subscriber before it is reported as lagged.
const FEED_CAPACITY: usize = 256;

/// Delay before re-establishing a failed listener connection.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// An item on the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// A row changed on a watched table.
    Change(TableChange),
    /// Changes may have been missed; every live page should reload.
    Resync,
}

/// Fan-out of database changes to SSE subscribers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<FeedEvent>,
}

impl ChangeFeed {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    /// Send a change to all subscribers. Returns the number reached.
    pub fn publish(&self, change: TableChange) -> usize {
        self.tx.send(FeedEvent::Change(change)).unwrap_or(0)
    }

    /// Ask all subscribers to reload. Returns the number reached.
    pub fn resync(&self) -> usize {
        self.tx.send(FeedEvent::Resync).unwrap_or(0)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the listener task. It runs for the life of the process.
pub fn spawn_listener(
    pool: PgPool,
    cache: CategoryCache,
    feed: ChangeFeed,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = listen(&pool, &cache, &feed).await {
                error!(error = %e, "Change listener failed, reconnecting");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

async fn listen(pool: &PgPool, cache: &CategoryCache, feed: &ChangeFeed) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGE_CHANNEL).await?;
    info!(channel = CHANGE_CHANNEL, "Listening for database changes");
    resync(cache, feed).await;

    loop {
        let notification = listener.recv().await?;
        let change = match TableChange::parse(notification.payload()) {
            Ok(change) => change,
            Err(e) => {
                warn!(error = %e, payload = notification.payload(), "Ignoring change payload");
                continue;
            }
        };

        cache.apply(&change).await;
        let receivers = feed.publish(change);
        debug!(
            table = change.table.as_str(),
            op = ?change.op,
            receivers,
            "Database change broadcast"
        );
    }
}

/// Drop cached lists and tell open pages to reload.
async fn resync(cache: &CategoryCache, feed: &ChangeFeed) {
    cache.invalidate_categories().await;
    let receivers = feed.resync();
    debug!(receivers, "Change feed resynced");
}
