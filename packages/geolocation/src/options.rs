use serde::{Deserialize, Serialize};

/// Options forwarded verbatim to `navigator.geolocation`.
///
/// See <https://developer.mozilla.org/en-US/docs/Web/API/Geolocation/getCurrentPosition#options>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeolocationOptions {
    /// Ask the device for the most accurate fix it can provide.
    pub enable_high_accuracy: bool,

    /// Maximum time in milliseconds to wait for a fix. `None` waits forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Maximum age in milliseconds of a cached fix that may be returned.
    pub maximum_age: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Some(5000),
            maximum_age: 0,
        }
    }
}

impl GeolocationOptions {
    /// Create the default options: high accuracy, a five second timeout and no cached fixes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_accuracy(mut self, enable: bool) -> Self {
        self.enable_high_accuracy = enable;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: Option<u32>) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn with_maximum_age(mut self, maximum_age_ms: u32) -> Self {
        self.maximum_age = maximum_age_ms;
        self
    }
}
