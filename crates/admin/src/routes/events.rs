//! Server-sent change events for open admin pages.
//!
//! Each event is named after the changed table and carries the
//! [`TableChange`] as JSON. `static/js/live.js` reloads a page when an event
//! names the page's `data-live-table`, and on every `resync` event.

use std::convert::Infallible;

use async_stream::stream;
use axum::{
    Router,
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
    routing::get,
};
use tokio::sync::broadcast::error::RecvError;

use esep_core::TableChange;

use crate::middleware::RequireAdminAuth;
use crate::services::FeedEvent;
use crate::state::AppState;

/// Event name sent when the subscriber may have missed changes.
pub const RESYNC_EVENT: &str = "resync";

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(stream_changes))
}

/// Stream table changes until the client disconnects.
///
/// GET /events
async fn stream_changes(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.changes().subscribe();
    tracing::debug!(admin_id = %admin.id, "Change stream opened");

    let events = stream! {
        loop {
            match rx.recv().await {
                Ok(FeedEvent::Change(change)) => yield Ok(change_event(&change)),
                Ok(FeedEvent::Resync) => {
                    yield Ok(Event::default().event(RESYNC_EVENT).data("reconnected"));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change stream lagged");
                    yield Ok(Event::default().event(RESYNC_EVENT).data(skipped.to_string()));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn change_event(change: &TableChange) -> Event {
    let name = change.table.as_str();
    Event::default()
        .event(name)
        .json_data(change)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to encode change event: {e}");
            Event::default().event(name)
        })
}
