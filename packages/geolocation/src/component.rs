use std::future::ready;

use dioxus::prelude::*;
use dioxus_core::use_drop;

use crate::{
    Callbacks, GeolocationItem, GeolocationOptions, Geolocator, GeolocatorConfig, LifecycleState,
};

/// Properties for the [`Geolocations`] component.
#[derive(Props, Clone, PartialEq)]
pub struct GeolocationsProps {
    #[props(into, default = GeolocatorConfig::default().get_location_button_text)]
    pub get_location_button_text: String,

    #[props(into, default = GeolocatorConfig::default().watch_position_button_text)]
    pub watch_position_button_text: String,

    #[props(into, default = GeolocatorConfig::default().clear_watch_position_button_text)]
    pub clear_watch_position_button_text: String,

    /// Render the get / watch / stop buttons. Without them the host drives the geolocator it
    /// receives through `on_ready`.
    #[props(default = true)]
    pub show_buttons: bool,

    #[props(default)]
    pub options: GeolocationOptions,

    pub on_result: Option<EventHandler<GeolocationItem>>,

    pub on_update_status: Option<EventHandler<String>>,

    pub on_error: Option<EventHandler<String>>,

    /// Called once the browser script is loaded with the geolocator behind this component.
    pub on_ready: Option<EventHandler<Geolocator>>,
}

impl GeolocationsProps {
    fn config(&self) -> GeolocatorConfig {
        GeolocatorConfig {
            get_location_button_text: self.get_location_button_text.clone(),
            watch_position_button_text: self.watch_position_button_text.clone(),
            clear_watch_position_button_text: self.clear_watch_position_button_text.clone(),
            show_buttons: self.show_buttons,
            options: self.options,
        }
    }

    fn callbacks(&self) -> Callbacks {
        let mut callbacks = Callbacks::new();
        if let Some(handler) = self.on_result {
            callbacks = callbacks.on_result(move |item| {
                handler.call(item);
                ready(Ok(()))
            });
        }
        if let Some(handler) = self.on_update_status {
            callbacks = callbacks.on_status_update(move |status| {
                handler.call(status);
                ready(Ok(()))
            });
        }
        if let Some(handler) = self.on_error {
            callbacks = callbacks.on_error(move |message| {
                handler.call(message);
                ready(Ok(()))
            });
        }
        callbacks
    }
}

/// Browser geolocation with optional "get location", "watch position" and "stop watching" buttons.
///
/// The browser script is loaded after the first render and released when the component is
/// dropped. Labels, visibility and options are read from the props on every render, so later
/// requests use the options the parent passed last.
///
/// ```rust, no_run
/// use dioxus::prelude::*;
/// use dioxus_web_geolocation::{GeolocationOptions, Geolocations};
///
/// fn app() -> Element {
///     let mut position = use_signal(String::new);
///
///     rsx! {
///         Geolocations {
///             options: GeolocationOptions::new().with_maximum_age(10_000),
///             on_result: move |item: dioxus_web_geolocation::GeolocationItem| {
///                 position.set(format!("{}, {}", item.latitude, item.longitude))
///             },
///             on_error: move |message: String| tracing::error!("{message}"),
///         }
///         p { "{position}" }
///     }
/// }
/// ```
#[allow(non_snake_case)]
pub fn Geolocations(props: GeolocationsProps) -> Element {
    let config = props.config();
    let geolocator = use_hook(|| Geolocator::web(config.clone(), props.callbacks()));
    geolocator.set_options(config.options);

    use_effect({
        let geolocator = geolocator.clone();
        let on_ready = props.on_ready;
        move || {
            let geolocator = geolocator.clone();
            spawn(async move {
                geolocator.initialize().await;
                if let Some(on_ready) = on_ready {
                    if geolocator.state() == LifecycleState::Ready {
                        on_ready.call(geolocator);
                    }
                }
            });
        }
    });

    use_drop({
        let geolocator = geolocator.clone();
        move || geolocator.teardown()
    });

    let get_location = geolocator.clone();
    let watch_position = geolocator.clone();
    let clear_watch = geolocator;

    let GeolocatorConfig {
        get_location_button_text,
        watch_position_button_text,
        clear_watch_position_button_text,
        show_buttons,
        ..
    } = config;

    rsx! {
        if show_buttons {
            div { class: "geolocations",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let geolocator = get_location.clone();
                        async move {
                            _ = geolocator.get_location().await;
                        }
                    },
                    "{get_location_button_text}"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let geolocator = watch_position.clone();
                        async move {
                            _ = geolocator.watch_position().await;
                        }
                    },
                    "{watch_position_button_text}"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let geolocator = clear_watch.clone();
                        async move {
                            _ = geolocator.clear_watch().await;
                        }
                    },
                    "{clear_watch_position_button_text}"
                }
            }
        }
    }
}
