//! Unit conversions between the imperial values weather providers report
//! and the metric values the evapotranspiration model works in.

/// Millimeters in one inch
const MM_PER_INCH: f64 = 25.4;

/// Meters in one foot
const METERS_PER_FOOT: f64 = 0.3048;

/// Meters per second in one mile per hour
const MS_PER_MPH: f64 = 0.447_04;

/// Seconds per day divided by 10^6 (W/m² to MJ/m²/day)
const WATTS_TO_MJ_PER_DAY: f64 = 0.0864;

/// Convert temperature from Fahrenheit to Celsius
#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert temperature from Celsius to Fahrenheit
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[must_use]
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

#[must_use]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters / METERS_PER_FOOT
}

#[must_use]
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

#[must_use]
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

#[must_use]
pub fn mph_to_ms(mph: f64) -> f64 {
    mph * MS_PER_MPH
}

/// Convert mean solar irradiance (W/m²) into daily radiation (MJ/m²/day)
#[must_use]
pub fn watts_to_mj_per_day(watts_per_m2: f64) -> f64 {
    watts_per_m2 * WATTS_TO_MJ_PER_DAY
}
