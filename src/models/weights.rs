//! Per-factor weighting of the heuristic model

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weight applied when the caller does not override a factor
pub const DEFAULT_WEIGHT_PERCENT: f64 = 100.0;

/// Caller supplied tuning of the heuristic model.
///
/// Weights are percentages multiplying the matching factor. The baseline
/// overrides move the point at which the model returns 100 %. The short keys
/// `t`, `h` and `r` are accepted too; the long key wins when both are sent.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(from = "WeightKeys")]
pub struct WeightOverrides {
    /// Temperature factor weight (%)
    pub temp: Option<f64>,
    /// Humidity factor weight (%)
    pub humidity: Option<f64>,
    /// Rain factor weight (%)
    pub rain: Option<f64>,
    /// Humidity (%) at which the humidity factor is neutral
    #[serde(rename = "bh")]
    pub base_humidity: Option<f64>,
    /// Temperature (°F) at which the temperature factor is neutral
    #[serde(rename = "bt")]
    pub base_temp_f: Option<f64>,
}

/// Weight keys as the controller sends them
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct WeightKeys {
    temp: Option<f64>,
    t: Option<f64>,
    humidity: Option<f64>,
    h: Option<f64>,
    rain: Option<f64>,
    r: Option<f64>,
    bh: Option<f64>,
    bt: Option<f64>,
}

impl From<WeightKeys> for WeightOverrides {
    fn from(keys: WeightKeys) -> Self {
        Self {
            temp: keys.temp.or(keys.t),
            humidity: keys.humidity.or(keys.h),
            rain: keys.rain.or(keys.r),
            base_humidity: keys.bh,
            base_temp_f: keys.bt,
        }
    }
}

impl WeightOverrides {
    /// Parse the controller's weight string.
    ///
    /// The controller sends the object body without braces, e.g.
    /// `"temp":50,"rain":120`. Anything that does not parse leaves every
    /// weight at its default.
    #[must_use]
    pub fn parse_wto(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        match serde_json::from_str(&format!("{{{raw}}}")) {
            Ok(weights) => weights,
            Err(e) => {
                debug!("Ignoring malformed weight overrides '{}': {}", raw, e);
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn temp_factor(&self) -> f64 {
        self.temp.unwrap_or(DEFAULT_WEIGHT_PERCENT) / 100.0
    }

    #[must_use]
    pub fn humidity_factor(&self) -> f64 {
        self.humidity.unwrap_or(DEFAULT_WEIGHT_PERCENT) / 100.0
    }

    #[must_use]
    pub fn rain_factor(&self) -> f64 {
        self.rain.unwrap_or(DEFAULT_WEIGHT_PERCENT) / 100.0
    }
}
