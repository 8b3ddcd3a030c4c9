//! Weather snapshot model consumed by the scale models

use serde::{Deserialize, Serialize};

use crate::request::lenient_number;

/// Lowest temperature (°F) accepted as a real observation
const MIN_PLAUSIBLE_TEMP_F: f64 = -500.0;

/// Observed and forecast conditions for one watering decision.
///
/// Every field is optional: `None` means the provider did not report the
/// value and it is excluded from whatever formula would use it. Numbers may
/// arrive as JSON strings; text that does not parse reads as `None`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct WeatherSnapshot {
    /// Yesterday's maximum relative humidity (%)
    #[serde(deserialize_with = "lenient_number")]
    pub max_humidity: Option<f64>,
    /// Yesterday's minimum relative humidity (%)
    #[serde(deserialize_with = "lenient_number")]
    pub min_humidity: Option<f64>,
    /// Daily mean relative humidity (%)
    #[serde(deserialize_with = "lenient_number")]
    pub mean_humidity: Option<f64>,
    /// Humidity at observation time (%)
    #[serde(deserialize_with = "lenient_number")]
    pub current_humidity: Option<f64>,
    /// Daily mean temperature (°F)
    #[serde(deserialize_with = "lenient_number")]
    pub mean_temp_f: Option<f64>,
    /// Daily maximum temperature (°F)
    #[serde(deserialize_with = "lenient_number")]
    pub max_temp_f: Option<f64>,
    /// Daily minimum temperature (°F)
    #[serde(deserialize_with = "lenient_number")]
    pub min_temp_f: Option<f64>,
    /// Precipitation so far today (in)
    #[serde(deserialize_with = "lenient_number")]
    pub precip_today_in: Option<f64>,
    /// Precipitation yesterday (in)
    #[serde(deserialize_with = "lenient_number")]
    pub precip_yesterday_in: Option<f64>,
    /// Precipitation the day before yesterday (in)
    #[serde(deserialize_with = "lenient_number")]
    pub precip_two_days_ago_in: Option<f64>,
    /// Mean wind speed (mph)
    #[serde(deserialize_with = "lenient_number")]
    pub wind_mph: Option<f64>,
    /// Mean solar irradiance (W/m²)
    #[serde(deserialize_with = "lenient_number")]
    pub solar_wm2: Option<f64>,
}

impl WeatherSnapshot {
    /// Drop values that cannot be real observations.
    ///
    /// Providers that still speak in sentinels (-1 for humidity and rain,
    /// -500 for temperature) end up with `None` in those fields.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let non_negative = |v: Option<f64>| v.filter(|x| x.is_finite() && *x >= 0.0);
        let temperature = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > MIN_PLAUSIBLE_TEMP_F);

        Self {
            max_humidity: non_negative(self.max_humidity),
            min_humidity: non_negative(self.min_humidity),
            mean_humidity: non_negative(self.mean_humidity),
            current_humidity: non_negative(self.current_humidity),
            mean_temp_f: temperature(self.mean_temp_f),
            max_temp_f: temperature(self.max_temp_f),
            min_temp_f: temperature(self.min_temp_f),
            precip_today_in: non_negative(self.precip_today_in),
            precip_yesterday_in: non_negative(self.precip_yesterday_in),
            precip_two_days_ago_in: non_negative(self.precip_two_days_ago_in),
            wind_mph: non_negative(self.wind_mph),
            solar_wm2: non_negative(self.solar_wm2),
        }
    }
}
