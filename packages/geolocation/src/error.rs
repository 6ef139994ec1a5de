use crate::LifecycleState;

/// A `Result` whose error is a [`GeolocationError`].
pub type Result<T> = std::result::Result<T, GeolocationError>;

/// An error raised by a host callback. Its `Display` output is what the error callback receives.
pub type CallbackError = Box<dyn std::error::Error>;

/// An error raised by the browser-side script module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ModuleError {
    /// The browser does not expose `navigator.geolocation`.
    #[error("geolocation is not supported by this browser")]
    Unsupported,

    /// The channel to the script module was closed.
    #[error("the geolocation script module disconnected")]
    Disconnected,

    /// The script module reported a failure.
    #[error("{0}")]
    Script(String),
}

/// An error surfaced by a [`Geolocator`](crate::Geolocator).
///
/// Every error is delivered to the host's error callback as its `Display` string.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GeolocationError {
    /// The operation was attempted before the script module was ready.
    #[error("geolocation is not ready (state: {0})")]
    NotReady(LifecycleState),

    /// The operation was attempted after teardown.
    #[error("geolocation has been disposed")]
    Disposed,

    /// Loading the script module failed.
    #[error("failed to load the geolocation module: {0}")]
    ModuleLoad(#[source] ModuleError),

    /// The script module rejected a call.
    #[error("{operation} failed: {source}")]
    Invocation {
        operation: &'static str,
        #[source]
        source: ModuleError,
    },

    /// A host callback returned an error.
    #[error("{0}")]
    Callback(String),
}
