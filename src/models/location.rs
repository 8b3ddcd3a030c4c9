//! Location model for the watering site

use serde::{Deserialize, Serialize};

/// Watering site location as handed over by the location resolver
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (absent when the location is unresolved)
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees (absent when the location is unresolved)
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Elevation above sea level in feet
    #[serde(default)]
    pub elevation_ft: f64,
    /// Timezone name, IANA style (`America/Chicago`) or short code (`EST`)
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Location {
    /// Create a location from coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            elevation_ft: 0.0,
            timezone: None,
        }
    }

    /// Location the resolver could not place
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_elevation(mut self, elevation_ft: f64) -> Self {
        self.elevation_ft = elevation_ft;
        self
    }

    #[must_use]
    pub fn with_timezone<S: Into<String>>(mut self, timezone: S) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Both coordinates, if the location was resolved
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}
