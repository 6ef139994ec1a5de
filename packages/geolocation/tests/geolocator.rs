//! Drive a [`Geolocator`] against a scripted module and check what reaches the module and the host.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use dioxus_web_geolocation::{
    CallbackError, CallbackHandle, Callbacks, GeolocationError, GeolocationItem,
    GeolocationOptions, Geolocator, GeolocatorConfig, LifecycleState, ModuleError, ModuleLoader,
    ScriptModule, WatchId,
};
use futures_channel::oneshot;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    GetLocation {
        single_shot: bool,
        options: Option<GeolocationOptions>,
    },
    ClearWatch(Option<WatchId>),
    Dispose,
}

/// How the fake browser script behaves, plus a record of everything asked of it.
#[derive(Clone, Default)]
struct Script {
    calls: Rc<RefCell<Vec<Call>>>,
    loads: Rc<Cell<usize>>,
    handle: Rc<RefCell<Option<CallbackHandle>>>,
    load_error: Option<ModuleError>,
    call_error: Option<ModuleError>,
    fix: Option<GeolocationItem>,
    watch_id: Option<WatchId>,
    gate: Rc<RefCell<Option<oneshot::Receiver<()>>>>,
}

impl Script {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn handle(&self) -> CallbackHandle {
        self.handle.borrow().clone().expect("module was never loaded")
    }

    fn disposals(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Dispose).count()
    }
}

struct Loader(Script);

#[async_trait::async_trait(?Send)]
impl ModuleLoader for Loader {
    async fn load(&self, handle: CallbackHandle) -> Result<Box<dyn ScriptModule>, ModuleError> {
        let script = self.0.clone();
        script.loads.set(script.loads.get() + 1);
        *script.handle.borrow_mut() = Some(handle.clone());

        let gate = script.gate.borrow_mut().take();
        if let Some(gate) = gate {
            _ = gate.await;
        }

        if let Some(err) = script.load_error.clone() {
            return Err(err);
        }
        Ok(Box::new(Module { script, handle }))
    }
}

struct Module {
    script: Script,
    handle: CallbackHandle,
}

#[async_trait::async_trait(?Send)]
impl ScriptModule for Module {
    async fn get_location(
        &self,
        single_shot: bool,
        options: Option<&GeolocationOptions>,
    ) -> Result<(), ModuleError> {
        self.script.calls.borrow_mut().push(Call::GetLocation {
            single_shot,
            options: options.copied(),
        });
        if let Some(err) = self.script.call_error.clone() {
            return Err(err);
        }

        if single_shot {
            if let Some(fix) = self.script.fix.clone() {
                self.handle.on_result(fix).await;
            }
        } else if let Some(id) = self.script.watch_id {
            self.handle.on_watch_id_assigned(id);
        }
        Ok(())
    }

    async fn clear_watch_location(&self, watch_id: Option<WatchId>) -> Result<(), ModuleError> {
        self.script.calls.borrow_mut().push(Call::ClearWatch(watch_id));
        match self.script.call_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn dispose(&self) {
        self.script.calls.borrow_mut().push(Call::Dispose);
    }
}

/// Everything the host callbacks received.
#[derive(Clone, Default)]
struct Host {
    results: Rc<RefCell<Vec<GeolocationItem>>>,
    statuses: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl Host {
    fn callbacks(&self) -> Callbacks {
        let (results, statuses, errors) = (
            self.results.clone(),
            self.statuses.clone(),
            self.errors.clone(),
        );
        Callbacks::new()
            .on_result(move |item| {
                let results = results.clone();
                async move {
                    results.borrow_mut().push(item);
                    Ok(())
                }
            })
            .on_status_update(move |status| {
                let statuses = statuses.clone();
                async move {
                    statuses.borrow_mut().push(status);
                    Ok(())
                }
            })
            .on_error(move |message| {
                let errors = errors.clone();
                async move {
                    errors.borrow_mut().push(message);
                    Ok(())
                }
            })
    }

    fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

fn geolocator(script: &Script, host: &Host) -> Geolocator {
    Geolocator::new(
        GeolocatorConfig::default(),
        host.callbacks(),
        Loader(script.clone()),
    )
}

async fn ready(script: &Script, host: &Host) -> Geolocator {
    let geolocator = geolocator(script, host);
    geolocator.initialize().await;
    assert_eq!(geolocator.state(), LifecycleState::Ready);
    geolocator
}

#[tokio::test]
async fn failed_load_is_reported_and_requests_stay_quiet() {
    let script = Script {
        load_error: Some(ModuleError::Script("network error".into())),
        ..Default::default()
    };
    let host = Host::default();
    let geolocator = geolocator(&script, &host);

    geolocator.initialize().await;
    assert_eq!(geolocator.state(), LifecycleState::LoadFailed);
    assert_eq!(
        host.errors(),
        vec!["failed to load the geolocation module: network error".to_string()]
    );
    assert!(script.handle().is_released());

    assert!(geolocator.get_location().await.is_ok());
    assert!(geolocator.watch_position().await.is_ok());
    assert!(geolocator.clear_watch().await.is_ok());

    let errors = host.errors();
    assert_eq!(errors.len(), 4);
    assert!(errors.iter().all(|message| !message.is_empty()));
    assert_eq!(
        errors[1],
        "geolocation is not ready (state: load failed)".to_string()
    );
    assert!(script.calls().is_empty());
}

#[tokio::test]
async fn single_shot_fix_reaches_the_host_unchanged() {
    let fix = GeolocationItem {
        latitude: 1.0,
        longitude: 2.0,
        accuracy: 5.0,
        ..Default::default()
    };
    let script = Script {
        fix: Some(fix.clone()),
        ..Default::default()
    };
    let host = Host::default();
    let options = GeolocationOptions::new().with_high_accuracy(true);
    let geolocator = Geolocator::new(
        GeolocatorConfig::default().with_options(options),
        host.callbacks(),
        Loader(script.clone()),
    );
    geolocator.initialize().await;

    geolocator.get_location().await.unwrap();

    assert_eq!(
        script.calls(),
        vec![Call::GetLocation {
            single_shot: true,
            options: Some(options),
        }]
    );
    assert_eq!(*host.results.borrow(), vec![fix]);
    assert!(host.errors().is_empty());
}

#[tokio::test]
async fn watch_forwards_the_options() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    geolocator.watch_position().await.unwrap();

    assert_eq!(
        script.calls(),
        vec![Call::GetLocation {
            single_shot: false,
            options: Some(GeolocationOptions::default()),
        }]
    );
}

#[tokio::test]
async fn changed_options_apply_to_the_next_request() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    geolocator.get_location().await.unwrap();
    let relaxed = GeolocationOptions::new()
        .with_high_accuracy(false)
        .with_timeout(None)
        .with_maximum_age(60_000);
    geolocator.set_options(relaxed);
    geolocator.get_location().await.unwrap();
    geolocator.watch_position().await.unwrap();

    assert_eq!(geolocator.options(), relaxed);
    assert_eq!(
        script.calls(),
        vec![
            Call::GetLocation {
                single_shot: true,
                options: Some(GeolocationOptions::default()),
            },
            Call::GetLocation {
                single_shot: true,
                options: Some(relaxed),
            },
            Call::GetLocation {
                single_shot: false,
                options: Some(relaxed),
            },
        ]
    );
}

#[tokio::test]
async fn clearing_without_a_watch_sends_none() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    geolocator.clear_watch().await.unwrap();
    geolocator.clear_watch().await.unwrap();

    assert_eq!(
        script.calls(),
        vec![Call::ClearWatch(None), Call::ClearWatch(None)]
    );
    assert_eq!(geolocator.watch_id(), None);
}

#[tokio::test]
async fn assigned_watch_is_cleared_exactly_once() {
    let script = Script {
        watch_id: Some(WatchId(42)),
        ..Default::default()
    };
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    geolocator.watch_position().await.unwrap();
    assert_eq!(geolocator.watch_id(), Some(WatchId(42)));

    geolocator.clear_watch().await.unwrap();
    assert_eq!(geolocator.watch_id(), None);
    geolocator.clear_watch().await.unwrap();

    assert_eq!(
        script.calls(),
        vec![
            Call::GetLocation {
                single_shot: false,
                options: Some(GeolocationOptions::default()),
            },
            Call::ClearWatch(Some(WatchId(42))),
            Call::ClearWatch(None),
        ]
    );
}

#[tokio::test]
async fn watch_id_reported_by_the_script_is_stored() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    script.handle().on_watch_id_assigned(WatchId(1));
    script.handle().on_watch_id_assigned(WatchId(2));

    assert_eq!(geolocator.watch_id(), Some(WatchId(2)));
}

#[tokio::test]
async fn teardown_before_initialize_never_loads() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = geolocator(&script, &host);

    geolocator.teardown();
    geolocator.teardown();
    geolocator.initialize().await;

    assert_eq!(geolocator.state(), LifecycleState::Disposed);
    assert_eq!(script.loads.get(), 0);
    assert!(script.calls().is_empty());
    assert!(host.errors().is_empty());
}

#[tokio::test]
async fn teardown_releases_module_and_handle_once() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;
    let handle = script.handle();
    assert!(!handle.is_released());

    geolocator.teardown();
    geolocator.teardown();

    assert!(handle.is_released());
    assert_eq!(script.disposals(), 1);
    assert_eq!(geolocator.state(), LifecycleState::Disposed);
}

#[tokio::test]
async fn initialize_loads_once() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    geolocator.initialize().await;
    geolocator.clone().initialize().await;

    assert_eq!(script.loads.get(), 1);
}

#[tokio::test]
async fn teardown_during_load_releases_the_late_module() {
    let (open, gate) = oneshot::channel();
    let script = Script {
        gate: Rc::new(RefCell::new(Some(gate))),
        ..Default::default()
    };
    let host = Host::default();
    let geolocator = geolocator(&script, &host);

    futures_util::future::join(geolocator.initialize(), async {
        assert_eq!(geolocator.state(), LifecycleState::Loading);
        geolocator.teardown();
        _ = open.send(());
    })
    .await;

    assert_eq!(geolocator.state(), LifecycleState::Disposed);
    assert_eq!(script.calls(), vec![Call::Dispose]);
    assert!(script.handle().is_released());
}

#[tokio::test]
async fn requests_before_initialize_are_not_ready() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = geolocator(&script, &host);

    let err = geolocator.get_location().await.unwrap_err();
    assert!(matches!(
        err,
        GeolocationError::NotReady(LifecycleState::Uninitialized)
    ));
    assert!(geolocator.clear_watch().await.is_err());

    assert_eq!(
        host.errors(),
        vec![
            "geolocation is not ready (state: uninitialized)".to_string(),
            "geolocation is not ready (state: uninitialized)".to_string(),
        ]
    );
    assert!(script.calls().is_empty());
}

#[tokio::test]
async fn requests_after_teardown_are_rejected() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;
    geolocator.teardown();

    assert!(matches!(
        geolocator.watch_position().await,
        Err(GeolocationError::Disposed)
    ));
    assert_eq!(script.calls(), vec![Call::Dispose]);
    assert_eq!(host.errors(), vec!["geolocation has been disposed".to_string()]);
}

#[tokio::test]
async fn module_failures_are_reported_not_returned() {
    let script = Script {
        call_error: Some(ModuleError::Script("User denied Geolocation".into())),
        ..Default::default()
    };
    let host = Host::default();
    let geolocator = ready(&script, &host).await;

    geolocator.get_location().await.unwrap();
    geolocator.watch_position().await.unwrap();
    geolocator.clear_watch().await.unwrap();

    assert_eq!(
        host.errors(),
        vec![
            "getLocation failed: User denied Geolocation".to_string(),
            "watchPosition failed: User denied Geolocation".to_string(),
            "clearWatch failed: User denied Geolocation".to_string(),
        ]
    );
}

#[tokio::test]
async fn failing_host_callbacks_are_routed_to_the_error_callback() {
    let script = Script::default();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let callbacks = Callbacks::new()
        .on_result(|_| async { Err(CallbackError::from("result handler broke")) })
        .on_status_update(|_| async { Err(CallbackError::from("status handler broke")) })
        .on_error({
            let errors = errors.clone();
            move |message| {
                let errors = errors.clone();
                async move {
                    errors.borrow_mut().push(message);
                    Ok(())
                }
            }
        });
    let geolocator = Geolocator::new(
        GeolocatorConfig::default(),
        callbacks,
        Loader(script.clone()),
    );
    geolocator.initialize().await;

    let handle = script.handle();
    handle.on_result(GeolocationItem::default()).await;
    handle.on_status_update("Locating...".to_string()).await;

    assert_eq!(
        *errors.borrow(),
        vec![
            "result handler broke".to_string(),
            "status handler broke".to_string()
        ]
    );
}

#[tokio::test]
async fn missing_callbacks_are_skipped() {
    let script = Script {
        fix: Some(GeolocationItem::default()),
        ..Default::default()
    };
    let geolocator = Geolocator::new(
        GeolocatorConfig::default(),
        Callbacks::new(),
        Loader(script.clone()),
    );
    geolocator.initialize().await;

    geolocator.get_location().await.unwrap();
    script.handle().on_status_update("Locating...".into()).await;
    script.handle().on_error("oops".into()).await;
}

#[tokio::test]
async fn released_handle_is_ignored() {
    let script = Script::default();
    let host = Host::default();
    let geolocator = ready(&script, &host).await;
    let handle = script.handle();
    geolocator.teardown();

    handle.on_result(GeolocationItem::default()).await;
    handle.on_status_update("late".to_string()).await;
    handle.on_error("late".to_string()).await;
    handle.on_watch_id_assigned(WatchId(9));

    assert!(host.results.borrow().is_empty());
    assert!(host.statuses.borrow().is_empty());
    assert!(host.errors().is_empty());
    assert_eq!(geolocator.watch_id(), None);
}

#[tokio::test]
async fn script_errors_and_statuses_reach_the_host() {
    let script = Script::default();
    let host = Host::default();
    let _geolocator = ready(&script, &host).await;

    script.handle().on_status_update("Locating...".to_string()).await;
    script
        .handle()
        .on_error("The request to get the user location timed out".to_string())
        .await;

    assert_eq!(*host.statuses.borrow(), vec!["Locating...".to_string()]);
    assert_eq!(
        host.errors(),
        vec!["The request to get the user location timed out".to_string()]
    );
}
