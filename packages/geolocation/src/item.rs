use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, used for great-circle distances.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A single position fix reported by the browser.
///
/// Coordinates are in degrees, lengths in meters and `timestamp` in milliseconds since the unix epoch.
/// The distance fields are filled in by the script module while a watch is running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationItem {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub altitude_accuracy: Option<f64>,
    /// Degrees clockwise from true north.
    #[serde(default)]
    pub heading: Option<f64>,
    /// Meters per second.
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub timestamp: u64,
    /// Distance from the previous fix.
    #[serde(default)]
    pub current_distance: f64,
    /// Distance covered since the script module was loaded.
    #[serde(default)]
    pub total_distance: f64,
}

impl GeolocationItem {
    /// Great-circle distance in meters between this fix and `other`.
    pub fn distance_to(&self, other: &GeolocationItem) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// The id the browser hands out for a running `watchPosition` subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchId(pub i64);

impl std::fmt::Display for WatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
