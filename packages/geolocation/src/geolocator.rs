use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    CallbackHandle, Callbacks, GeolocationError, GeolocationItem, GeolocationOptions,
    GeolocatorConfig, ModuleLoader, Result, ScriptModule, WatchId,
};

/// Where a [`Geolocator`] is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// [`Geolocator::initialize`] has not been called yet.
    Uninitialized,
    /// The script module is being loaded.
    Loading,
    /// The script module is loaded and requests can be made.
    Ready,
    /// Loading the script module failed. The error was sent to the error callback.
    LoadFailed,
    /// [`Geolocator::teardown`] has run.
    Disposed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Loading => "loading",
            LifecycleState::Ready => "ready",
            LifecycleState::LoadFailed => "load failed",
            LifecycleState::Disposed => "disposed",
        })
    }
}

enum State {
    Uninitialized,
    Loading,
    Ready {
        module: Rc<dyn ScriptModule>,
        handle: CallbackHandle,
    },
    LoadFailed,
    Disposed,
}

impl State {
    fn lifecycle(&self) -> LifecycleState {
        match self {
            State::Uninitialized => LifecycleState::Uninitialized,
            State::Loading => LifecycleState::Loading,
            State::Ready { .. } => LifecycleState::Ready,
            State::LoadFailed => LifecycleState::LoadFailed,
            State::Disposed => LifecycleState::Disposed,
        }
    }
}

pub(crate) struct Inner {
    config: GeolocatorConfig,
    options: Cell<GeolocationOptions>,
    callbacks: Callbacks,
    loader: Box<dyn ModuleLoader>,
    state: RefCell<State>,
    watch_id: Cell<Option<WatchId>>,
}

/// Drives a browser-side geolocation [`ScriptModule`] and relays what it reports to the host's
/// [`Callbacks`].
///
/// A geolocator moves through `Uninitialized → Ready → Disposed`. Requests made before
/// [`Geolocator::initialize`] finishes or after [`Geolocator::teardown`] fail with
/// [`GeolocationError::NotReady`] or [`GeolocationError::Disposed`] instead of reaching the module.
/// After a failed load, and for failures of the module or of the host callbacks, nothing escapes a
/// request: the error is handed to the error callback as a message.
///
/// Cloning a geolocator is cheap and every clone drives the same module.
#[derive(Clone)]
pub struct Geolocator {
    inner: Rc<Inner>,
}

impl Geolocator {
    /// Create a geolocator that will load its script module through `loader`.
    pub fn new(
        config: GeolocatorConfig,
        callbacks: Callbacks,
        loader: impl ModuleLoader + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                options: Cell::new(config.options),
                config,
                callbacks,
                loader: Box::new(loader),
                state: RefCell::new(State::Uninitialized),
                watch_id: Cell::new(None),
            }),
        }
    }

    /// Create a geolocator backed by the bundled browser script, evaluated through
    /// [`dioxus::document::eval`].
    pub fn web(config: GeolocatorConfig, callbacks: Callbacks) -> Self {
        Self::new(config, callbacks, crate::EvalModuleLoader)
    }

    /// The configuration this geolocator was created with. Its labels and `show_buttons` are for
    /// the host's rendering; later [`Geolocator::set_options`] calls are not reflected here.
    pub fn config(&self) -> &GeolocatorConfig {
        &self.inner.config
    }

    /// The options sent with the next [`Geolocator::get_location`] or
    /// [`Geolocator::watch_position`].
    pub fn options(&self) -> GeolocationOptions {
        self.inner.options.get()
    }

    /// Replace the options used by later requests. A running watch keeps the options it was
    /// started with.
    pub fn set_options(&self, options: GeolocationOptions) {
        self.inner.options.set(options);
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state.borrow().lifecycle()
    }

    /// The id of the running watch, once the script module has reported it.
    pub fn watch_id(&self) -> Option<WatchId> {
        self.inner.watch_id.get()
    }

    /// Load the script module.
    ///
    /// Only the first call does anything. A load failure is sent to the error callback and leaves
    /// the geolocator in [`LifecycleState::LoadFailed`].
    pub async fn initialize(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !matches!(*state, State::Uninitialized) {
                tracing::trace!("geolocation module already initialized ({})", state.lifecycle());
                return;
            }
            *state = State::Loading;
        }

        let handle = CallbackHandle::new(Rc::downgrade(&self.inner));
        let loaded = self.inner.loader.load(handle.clone()).await;

        let mut state = self.inner.state.borrow_mut();
        let disposed = matches!(*state, State::Disposed);

        match loaded {
            Ok(module) => {
                let module: Rc<dyn ScriptModule> = Rc::from(module);
                if disposed {
                    drop(state);
                    tracing::trace!("geolocation torn down while loading, releasing the module");
                    handle.release();
                    module.dispose();
                    return;
                }
                *state = State::Ready { module, handle };
                tracing::trace!("geolocation module ready");
            }
            Err(err) => {
                handle.release();
                if disposed {
                    return;
                }
                *state = State::LoadFailed;
                drop(state);
                self.inner.report(&GeolocationError::ModuleLoad(err)).await;
            }
        }
    }

    /// Release the callback handle and the script module.
    ///
    /// Safe to call any number of times, before or after [`Geolocator::initialize`].
    pub fn teardown(&self) {
        let previous = self.inner.state.replace(State::Disposed);
        match previous {
            State::Ready { module, handle } => {
                handle.release();
                module.dispose();
                self.inner.watch_id.set(None);
                tracing::trace!("geolocation module disposed");
            }
            State::Loading => {
                tracing::trace!("geolocation disposed while the module is still loading");
            }
            State::Uninitialized | State::LoadFailed | State::Disposed => {}
        }
    }

    /// Request a single position fix. The fix arrives through the result callback.
    pub async fn get_location(&self) -> Result<()> {
        let Some(module) = self.ready_module().await? else {
            return Ok(());
        };
        tracing::debug!("requesting a single position fix");
        if let Err(source) = module.get_location(true, Some(&self.options())).await {
            self.inner
                .report(&GeolocationError::Invocation {
                    operation: "getLocation",
                    source,
                })
                .await;
        }
        Ok(())
    }

    /// Start watching the position. Every fix arrives through the result callback.
    pub async fn watch_position(&self) -> Result<()> {
        let Some(module) = self.ready_module().await? else {
            return Ok(());
        };
        tracing::debug!("starting a position watch");
        if let Err(source) = module.get_location(false, Some(&self.options())).await {
            self.inner
                .report(&GeolocationError::Invocation {
                    operation: "watchPosition",
                    source,
                })
                .await;
        }
        Ok(())
    }

    /// Stop the running watch.
    ///
    /// The stored watch id is cleared before the module is asked to cancel it, so a second call
    /// hands the module `None`.
    pub async fn clear_watch(&self) -> Result<()> {
        let Some(module) = self.ready_module().await? else {
            return Ok(());
        };
        let watch_id = self.inner.watch_id.take();
        tracing::debug!(?watch_id, "clearing position watch");
        if let Err(source) = module.clear_watch_location(watch_id).await {
            self.inner
                .report(&GeolocationError::Invocation {
                    operation: "clearWatch",
                    source,
                })
                .await;
        }
        Ok(())
    }

    /// The loaded module. Anything else is reported to the error callback first: after a failed
    /// load the request then quietly does nothing, in every other state it is rejected.
    async fn ready_module(&self) -> Result<Option<Rc<dyn ScriptModule>>> {
        let err = match &*self.inner.state.borrow() {
            State::Ready { module, .. } => return Ok(Some(module.clone())),
            State::Disposed => GeolocationError::Disposed,
            other => GeolocationError::NotReady(other.lifecycle()),
        };

        self.inner.report(&err).await;
        match err {
            GeolocationError::NotReady(LifecycleState::LoadFailed) => Ok(None),
            err => Err(err),
        }
    }
}

impl PartialEq for Geolocator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Geolocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geolocator")
            .field("state", &self.state())
            .field("watch_id", &self.watch_id())
            .field("options", &self.options())
            .field("config", &self.inner.config)
            .field("callbacks", &self.inner.callbacks)
            .finish()
    }
}

impl Inner {
    pub(crate) async fn relay_result(&self, item: GeolocationItem) {
        let Some(callback) = self.callbacks.result() else {
            return;
        };
        if let Err(err) = callback(item).await {
            self.report(&GeolocationError::Callback(err.to_string()))
                .await;
        }
    }

    pub(crate) async fn relay_status(&self, status: String) {
        let Some(callback) = self.callbacks.status() else {
            return;
        };
        if let Err(err) = callback(status).await {
            self.report(&GeolocationError::Callback(err.to_string()))
                .await;
        }
    }

    pub(crate) fn assign_watch_id(&self, watch_id: WatchId) {
        self.watch_id.set(Some(watch_id));
    }

    pub(crate) async fn report(&self, err: &GeolocationError) {
        tracing::warn!("geolocation error: {err}");
        self.relay_error(err.to_string()).await;
    }

    pub(crate) async fn relay_error(&self, message: String) {
        let Some(callback) = self.callbacks.error() else {
            return;
        };
        if let Err(err) = callback(message).await {
            tracing::error!("geolocation error callback failed: {err}");
        }
    }
}
