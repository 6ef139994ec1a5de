use serde::Deserialize;

use crate::GeolocationOptions;

/// Configuration of a [`Geolocator`](crate::Geolocator) and the buttons rendered for it.
///
/// The geolocator itself only uses `options`, as the starting value of
/// [`Geolocator::options`](crate::Geolocator::options). The labels and `show_buttons` describe the
/// buttons a host renders next to it: [`Geolocations`](crate::Geolocations) renders from them, and
/// a host drawing its own controls can read them back through
/// [`Geolocator::config`](crate::Geolocator::config).
///
/// Every field has a default, so a partial JSON or TOML document is enough to build one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeolocatorConfig {
    /// Label of the single-shot button.
    pub get_location_button_text: String,
    /// Label of the button that starts a watch.
    pub watch_position_button_text: String,
    /// Label of the button that stops the watch.
    pub clear_watch_position_button_text: String,
    /// Whether the buttons are rendered at all.
    pub show_buttons: bool,
    pub options: GeolocationOptions,
}

impl Default for GeolocatorConfig {
    fn default() -> Self {
        Self {
            get_location_button_text: "Get location".to_string(),
            watch_position_button_text: "Watch position".to_string(),
            clear_watch_position_button_text: "Stop watching".to_string(),
            show_buttons: true,
            options: GeolocationOptions::default(),
        }
    }
}

impl GeolocatorConfig {
    pub fn with_options(mut self, options: GeolocationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_show_buttons(mut self, show_buttons: bool) -> Self {
        self.show_buttons = show_buttons;
        self
    }
}
