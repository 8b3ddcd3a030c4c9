//! Reference evapotranspiration (FAO-56)
//!
//! Daily Penman-Monteith reference ET for a short (grass, ET0) and a tall
//! (alfalfa, ETr) canopy, plus the Hargreaves estimate (ETh) as a
//! temperature-only cross check. Inputs arrive in the imperial units the
//! weather providers use; the model works in metric and returns inches/day.
//!
//! The model assumes complete data. Callers build [`EtInputs`] through
//! [`EtInputs::from_snapshot`], which refuses incomplete snapshots.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::models::{Location, WeatherSnapshot};
use crate::units::{
    fahrenheit_to_celsius, feet_to_meters, mm_to_inches, mph_to_ms, watts_to_mj_per_day,
};

/// Solar constant (MJ/m²/min)
const SOLAR_CONSTANT: f64 = 0.082;

/// Stefan-Boltzmann constant (MJ/K⁴/m²/day)
const STEFAN_BOLTZMANN: f64 = 4.90e-9;

/// Latent heat of vaporization (MJ/kg)
const LATENT_HEAT: f64 = 2.45;

/// Albedo of the reference crop
const ALBEDO: f64 = 0.23;

/// Energy to evaporation equivalent (mm per MJ/m²)
const MJ_TO_MM: f64 = 0.408;

/// Wind coefficients (numerator, denominator) per reference canopy
const SHORT_CROP: (f64, f64) = (900.0, 0.34);
const TALL_CROP: (f64, f64) = (1600.0, 0.38);

const MAX_SCALE: f64 = 200.0;

/// Complete daily inputs for the ET model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtInputs {
    /// Latitude in decimal degrees
    pub latitude: f64,
    pub elevation_ft: f64,
    pub temp_high_f: f64,
    pub temp_low_f: f64,
    pub temp_avg_f: f64,
    pub humidity_high: f64,
    pub humidity_low: f64,
    /// Mean relative humidity (%); the vapour pressure path uses the extremes
    pub humidity_avg: f64,
    pub wind_mph: f64,
    pub solar_wm2: f64,
    /// Day of year, 1-366
    pub day_of_year: u32,
}

/// ET estimates in inches/day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EtEstimates {
    /// Hargreaves estimate
    pub eth: f64,
    /// Penman-Monteith, short reference crop
    pub et0: f64,
    /// Penman-Monteith, tall reference crop
    pub etr: f64,
}

impl EtInputs {
    /// Collect model inputs, or `None` if any required value is missing
    #[must_use]
    pub fn from_snapshot(
        snapshot: &WeatherSnapshot,
        location: &Location,
        day_of_year: u32,
    ) -> Option<Self> {
        Some(Self {
            latitude: location.latitude.filter(|lat| lat.is_finite())?,
            elevation_ft: location.elevation_ft,
            temp_high_f: snapshot.max_temp_f?,
            temp_low_f: snapshot.min_temp_f?,
            temp_avg_f: snapshot.mean_temp_f?,
            humidity_high: snapshot.max_humidity?,
            humidity_low: snapshot.min_humidity?,
            humidity_avg: snapshot.mean_humidity?,
            wind_mph: snapshot.wind_mph?,
            solar_wm2: snapshot.solar_wm2?,
            day_of_year,
        })
    }
}

/// Extraterrestrial radiation Ra (MJ/m²/day) for a latitude and day of year
#[must_use]
pub fn extraterrestrial_radiation(latitude: f64, day_of_year: u32) -> f64 {
    let phi = latitude.to_radians();
    let day_angle = 2.0 * PI * f64::from(day_of_year) / 365.0;
    let inverse_distance = 1.0 + 0.033 * day_angle.cos();
    let declination = 0.409 * (day_angle - 1.39).sin();
    // Clamped for polar day and night, where the sun never crosses the horizon.
    let sunset_hour_angle = (-phi.tan() * declination.tan()).clamp(-1.0, 1.0).acos();

    (24.0 * 60.0 / PI)
        * SOLAR_CONSTANT
        * inverse_distance
        * (sunset_hour_angle * declination.sin() * phi.sin()
            + phi.cos() * declination.cos() * sunset_hour_angle.sin())
}

/// Saturation vapour pressure (kPa) at a temperature (°C)
#[must_use]
pub fn saturation_vapour_pressure(temp_c: f64) -> f64 {
    0.6108 * (17.27 * temp_c / (temp_c + 237.3)).exp()
}

/// Atmospheric pressure (kPa) at an elevation (m)
#[must_use]
pub fn atmospheric_pressure(elevation_m: f64) -> f64 {
    101.3 * ((293.0 - 0.0065 * elevation_m) / 293.0).powf(5.26)
}

/// Compute ETh, ET0 and ETr for one day
#[must_use]
pub fn compute_et(inputs: &EtInputs) -> EtEstimates {
    let elevation_m = feet_to_meters(inputs.elevation_ft);
    let rs = watts_to_mj_per_day(inputs.solar_wm2);
    let tx = fahrenheit_to_celsius(inputs.temp_high_f);
    let tn = fahrenheit_to_celsius(inputs.temp_low_f);
    let tm = fahrenheit_to_celsius(inputs.temp_avg_f);
    let u2 = mph_to_ms(inputs.wind_mph);

    // Net radiation
    let ra = extraterrestrial_radiation(inputs.latitude, inputs.day_of_year);
    let rso = ra * (0.75 + 2.0e-5 * elevation_m);
    let rns = (1.0 - ALBEDO) * rs;
    // Rs/Rso is capped at 1; with no clear-sky radiation (polar night) it counts as clear.
    let relative_shortwave = if rso > 0.0 { (rs / rso).min(1.0) } else { 1.0 };
    let cloudiness = 1.35 * relative_shortwave - 0.35;

    let es_tx = saturation_vapour_pressure(tx);
    let es_tn = saturation_vapour_pressure(tn);
    let ed = (es_tx * inputs.humidity_low / 100.0 + es_tn * inputs.humidity_high / 100.0) / 2.0;
    let ea = (es_tx + es_tn) / 2.0;

    let emissivity = 0.34 - 0.14 * ea.sqrt();
    let rnl = -cloudiness
        * emissivity
        * STEFAN_BOLTZMANN
        * ((tx + 273.14).powi(4) + (tn + 273.15).powi(4))
        / 2.0;
    let rn = rns + rnl;

    let beta = atmospheric_pressure(elevation_m);
    let gamma = 0.00163 * beta / LATENT_HEAT;
    let delta = 4099.0 * saturation_vapour_pressure(tm) / (tm + 237.3).powi(2);
    let soil_heat_flux = 0.0;

    let eth = MJ_TO_MM * 0.0023 * ra * (tm + 17.8) * (tx - tn).max(0.0).sqrt();

    let penman_monteith = |(wind_weight, wind_coefficient): (f64, f64)| {
        let denominator = delta + gamma * (1.0 + wind_coefficient * u2);
        let radiation = MJ_TO_MM * delta * (rn - soil_heat_flux) / denominator;
        let aerodynamic = (wind_weight * gamma / (tm + 273.0)) * u2 * (ea - ed) / denominator;
        radiation + aerodynamic
    };
    let et0 = penman_monteith(SHORT_CROP);
    let etr = penman_monteith(TALL_CROP);

    debug!(ra, rn, eth, et0, etr, "Computed evapotranspiration (mm/day)");

    EtEstimates {
        eth: mm_to_inches(eth.max(0.0)),
        et0: mm_to_inches(et0.max(0.0)),
        etr: mm_to_inches(etr.max(0.0)),
    }
}

/// Watering scale from the short-crop ET.
///
/// With a baseline ETo (inches/day the schedule was designed for) the scale
/// is the share of that baseline left after today's rain. Without one the
/// scale is ET0 expressed in hundredths of an inch.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn et_scale(et0_in: f64, precip_today_in: Option<f64>, baseline_eto_in: Option<f64>) -> i32 {
    let raw = match baseline_eto_in.filter(|b| *b > 0.0) {
        Some(baseline) => ((et0_in - precip_today_in.unwrap_or(0.0)) / baseline * 100.0).floor(),
        None => (et0_in * 100.0).trunc(),
    };

    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, MAX_SCALE) as i32
}
