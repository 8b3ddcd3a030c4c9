//! Weighted heuristic scale model
//!
//! 100 % is "no change". Dry air and heat push the scale up, humid air,
//! cool days and recent rain push it down. Each factor is only counted when
//! its inputs were observed, and each can be reweighted by the caller.

use tracing::debug;

use crate::models::{WeatherSnapshot, WeightOverrides};

/// Humidity (%) at which the humidity factor is neutral
pub const BASE_HUMIDITY: f64 = 30.0;

/// Mean temperature (°F) at which the temperature factor is neutral
pub const BASE_TEMP_F: f64 = 70.0;

/// Scale points per °F above the base temperature
const TEMP_POINTS_PER_DEGREE: f64 = 4.0;

/// Scale points removed per inch of rain
const RAIN_POINTS_PER_INCH: f64 = 200.0;

const NEUTRAL_SCALE: f64 = 100.0;
const MAX_SCALE: f64 = 200.0;

/// Observed values the heuristic model reads
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicInputs {
    pub max_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub mean_temp_f: Option<f64>,
    pub precip_today_in: Option<f64>,
    pub precip_yesterday_in: Option<f64>,
}

impl From<&WeatherSnapshot> for HeuristicInputs {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        Self {
            max_humidity: snapshot.max_humidity,
            min_humidity: snapshot.min_humidity,
            mean_temp_f: snapshot.mean_temp_f,
            precip_today_in: snapshot.precip_today_in,
            precip_yesterday_in: snapshot.precip_yesterday_in,
        }
    }
}

/// Individual factor contributions, after weighting
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicFactors {
    pub humidity: f64,
    pub temperature: f64,
    pub rain: f64,
}

impl HeuristicFactors {
    /// Weighted factors for the given inputs
    #[must_use]
    pub fn compute(inputs: &HeuristicInputs, weights: &WeightOverrides) -> Self {
        let base_humidity = weights.base_humidity.unwrap_or(BASE_HUMIDITY);
        let base_temp_f = weights.base_temp_f.unwrap_or(BASE_TEMP_F);

        let humidity = match (inputs.max_humidity, inputs.min_humidity) {
            (Some(max), Some(min)) => base_humidity - (max + min) / 2.0,
            _ => 0.0,
        };

        let temperature = inputs
            .mean_temp_f
            .map_or(0.0, |t| (t - base_temp_f) * TEMP_POINTS_PER_DEGREE);

        let rain = -[inputs.precip_today_in, inputs.precip_yesterday_in]
            .into_iter()
            .flatten()
            .map(|p| p * RAIN_POINTS_PER_INCH)
            .sum::<f64>();

        Self {
            humidity: humidity * weights.humidity_factor(),
            temperature: temperature * weights.temp_factor(),
            rain: rain * weights.rain_factor(),
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.humidity + self.temperature + self.rain
    }
}

/// Compute the heuristic watering scale, clamped to [0, 200]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn heuristic_scale(inputs: &HeuristicInputs, weights: &WeightOverrides) -> i32 {
    let factors = HeuristicFactors::compute(inputs, weights);
    debug!(
        humidity = factors.humidity,
        temperature = factors.temperature,
        rain = factors.rain,
        "Heuristic factors"
    );

    let scale = (NEUTRAL_SCALE + factors.total()).round();
    if scale.is_nan() {
        return NEUTRAL_SCALE as i32;
    }
    scale.clamp(0.0, MAX_SCALE) as i32
}
