//! Browser geolocation for Dioxus web apps
//!
//! This crate wraps the browser's `navigator.geolocation` API. A [`Geolocator`] owns a
//! browser-side [`ScriptModule`], forwards location requests to it, and relays the fixes, status
//! messages and errors it reports back to the host's [`Callbacks`]. The [`Geolocations`] component
//! renders optional buttons for the three operations and manages the geolocator's lifetime.
//!
//! ## Usage
//!
//! ```rust, no_run
//! use dioxus_web_geolocation::{Callbacks, Geolocator, GeolocatorConfig};
//!
//! # async fn run() {
//! let geolocator = Geolocator::web(
//!     GeolocatorConfig::default(),
//!     Callbacks::new().on_result(|item| async move {
//!         println!("{}, {} (±{}m)", item.latitude, item.longitude, item.accuracy);
//!         Ok(())
//!     }),
//! );
//!
//! geolocator.initialize().await;
//! _ = geolocator.get_location().await;
//! // ...
//! geolocator.teardown();
//! # }
//! ```
//!
//! ## Errors
//!
//! Requests never fail because of the browser, the host callbacks or a script module that failed
//! to load. Those failures are caught and passed to the error callback as a message. Requests made
//! before the script module is loaded or after teardown return [`GeolocationError::NotReady`] or
//! [`GeolocationError::Disposed`], after reporting the same error to the error callback.

mod callbacks;
mod component;
mod config;
mod error;
mod eval;
mod geolocator;
mod handle;
mod item;
mod module;
mod options;
mod protocol;

pub use callbacks::Callbacks;
pub use component::{Geolocations, GeolocationsProps};
pub use config::GeolocatorConfig;
pub use error::{CallbackError, GeolocationError, ModuleError, Result};
pub use eval::{EvalModule, EvalModuleLoader};
pub use geolocator::{Geolocator, LifecycleState};
pub use handle::CallbackHandle;
pub use item::{GeolocationItem, WatchId};
pub use module::{ModuleLoader, ScriptModule};
pub use options::GeolocationOptions;
