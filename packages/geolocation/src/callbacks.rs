use std::{future::Future, rc::Rc};

use futures_util::future::{FutureExt, LocalBoxFuture};

use crate::{CallbackError, GeolocationItem};

type Handler<T> = Rc<dyn Fn(T) -> LocalBoxFuture<'static, Result<(), CallbackError>>>;

/// The host's result, status and error callbacks.
///
/// Every callback is optional. Relaying to a missing callback does nothing.
///
/// ```rust
/// use dioxus_web_geolocation::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .on_result(|item| async move {
///         println!("at {}, {}", item.latitude, item.longitude);
///         Ok(())
///     })
///     .on_error(|message| async move {
///         eprintln!("{message}");
///         Ok(())
///     });
/// ```
#[derive(Clone, Default)]
pub struct Callbacks {
    result: Option<Handler<GeolocationItem>>,
    status: Option<Handler<String>>,
    error: Option<Handler<String>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with every fix, single-shot or watched.
    pub fn on_result<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(GeolocationItem) -> Fut + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + 'static,
    {
        self.result = Some(handler(f));
        self
    }

    /// Called with human readable progress from the script module.
    pub fn on_status_update<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + 'static,
    {
        self.status = Some(handler(f));
        self
    }

    /// Called with the message of every failure the controller catches.
    pub fn on_error<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + 'static,
    {
        self.error = Some(handler(f));
        self
    }

    pub(crate) fn result(&self) -> Option<Handler<GeolocationItem>> {
        self.result.clone()
    }

    pub(crate) fn status(&self) -> Option<Handler<String>> {
        self.status.clone()
    }

    pub(crate) fn error(&self) -> Option<Handler<String>> {
        self.error.clone()
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_result", &self.result.is_some())
            .field("on_status_update", &self.status.is_some())
            .field("on_error", &self.error.is_some())
            .finish()
    }
}

fn handler<T, F, Fut>(f: F) -> Handler<T>
where
    F: Fn(T) -> Fut + 'static,
    Fut: Future<Output = Result<(), CallbackError>> + 'static,
{
    Rc::new(move |value| f(value).boxed_local())
}
