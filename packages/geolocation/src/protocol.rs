//! Messages exchanged with `js/geolocation.js` over the eval channel.

use serde::{Deserialize, Serialize};

use crate::{CallbackHandle, GeolocationItem, GeolocationOptions, WatchId};

/// Rust → JS
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub(crate) enum ScriptCommand {
    GetLocation {
        single_shot: bool,
        options: Option<GeolocationOptions>,
    },
    ClearWatchLocation {
        watch_id: Option<WatchId>,
    },
    Destroy,
}

/// JS → Rust
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub(crate) enum ScriptEvent {
    Ready {
        supported: bool,
    },
    #[serde(rename = "result")]
    Position {
        item: GeolocationItem,
    },
    Status {
        status: String,
    },
    WatchId {
        id: WatchId,
    },
    Error {
        message: String,
    },
}

impl ScriptEvent {
    pub(crate) async fn dispatch(self, handle: &CallbackHandle) {
        match self {
            ScriptEvent::Position { item } => handle.on_result(item).await,
            ScriptEvent::Status { status } => handle.on_status_update(status).await,
            ScriptEvent::WatchId { id } => handle.on_watch_id_assigned(id),
            ScriptEvent::Error { message } => handle.on_error(message).await,
            ScriptEvent::Ready { .. } => {
                tracing::trace!("ignoring a repeated ready message from the geolocation script")
            }
        }
    }
}
