use crate::{CallbackHandle, GeolocationOptions, ModuleError, WatchId};

/// The browser-side half of a [`Geolocator`](crate::Geolocator).
///
/// A module performs the actual `navigator.geolocation` calls and reports back through the
/// [`CallbackHandle`] it was loaded with.
#[async_trait::async_trait(?Send)]
pub trait ScriptModule {
    /// Request a position. With `single_shot` set this is `getCurrentPosition`, otherwise it starts
    /// a `watchPosition` subscription whose id is reported through
    /// [`CallbackHandle::on_watch_id_assigned`].
    async fn get_location(
        &self,
        single_shot: bool,
        options: Option<&GeolocationOptions>,
    ) -> Result<(), ModuleError>;

    /// Cancel a watch. `None` must be accepted and ignored.
    async fn clear_watch_location(&self, watch_id: Option<WatchId>) -> Result<(), ModuleError>;

    /// Release the module. Called at most once.
    fn dispose(&self);
}

/// Loads a [`ScriptModule`] wired to a callback handle.
#[async_trait::async_trait(?Send)]
pub trait ModuleLoader {
    async fn load(&self, handle: CallbackHandle) -> Result<Box<dyn ScriptModule>, ModuleError>;
}
