use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use crate::{geolocator::Inner, GeolocationItem, WatchId};

/// The handle a [`ScriptModule`](crate::ScriptModule) uses to call back into its
/// [`Geolocator`](crate::Geolocator).
///
/// The handle does not keep the geolocator alive. Once the geolocator is torn down the handle is
/// released and every call on it is ignored.
#[derive(Clone)]
pub struct CallbackHandle {
    target: Weak<Inner>,
    released: Rc<Cell<bool>>,
}

impl CallbackHandle {
    pub(crate) fn new(target: Weak<Inner>) -> Self {
        Self {
            target,
            released: Rc::new(Cell::new(false)),
        }
    }

    /// Deliver a position fix to the result callback.
    pub async fn on_result(&self, item: GeolocationItem) {
        if let Some(target) = self.target() {
            tracing::debug!(
                latitude = item.latitude,
                longitude = item.longitude,
                "geolocation result"
            );
            target.relay_result(item).await;
        }
    }

    /// Deliver a status message to the status callback.
    pub async fn on_status_update(&self, status: String) {
        if let Some(target) = self.target() {
            tracing::debug!("geolocation status: {status}");
            target.relay_status(status).await;
        }
    }

    /// Record the id of the watch started by the last `watch_position` request.
    pub fn on_watch_id_assigned(&self, watch_id: WatchId) {
        if let Some(target) = self.target() {
            tracing::debug!("geolocation watch id assigned: {watch_id}");
            target.assign_watch_id(watch_id);
        }
    }

    /// Deliver a browser-side failure (permission denied, timeout, ...) to the error callback.
    pub async fn on_error(&self, message: String) {
        if let Some(target) = self.target() {
            tracing::warn!("geolocation script error: {message}");
            target.relay_error(message).await;
        }
    }

    /// Whether the owning geolocator has released this handle.
    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    pub(crate) fn release(&self) {
        self.released.set(true);
    }

    fn target(&self) -> Option<Rc<Inner>> {
        if self.released.get() {
            tracing::trace!("ignoring a call on a released geolocation handle");
            return None;
        }
        self.target.upgrade()
    }
}

impl std::fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHandle")
            .field("released", &self.released.get())
            .finish()
    }
}
