//! `WateringScale` - weather-driven irrigation scale engine
//!
//! Turns a daily weather snapshot and a site location into a watering
//! percentage for an irrigation controller, together with the site's
//! timezone offset and local sunrise and sunset times.

pub mod astronomy;
pub mod config;
pub mod error;
pub mod evapotranspiration;
pub mod heuristic;
pub mod lockout;
pub mod models;
pub mod orchestrator;
pub mod request;
pub mod units;

// Re-export core types for public API
pub use astronomy::{Localization, localize};
pub use config::{LoggingConfig, ScaleConfig, WateringConfig};
pub use error::WateringError;
pub use evapotranspiration::{EtEstimates, EtInputs, compute_et, et_scale};
pub use heuristic::{HeuristicInputs, heuristic_scale};
pub use lockout::{LockoutDecision, LockoutPolicy, evaluate_lockout};
pub use models::{
    AdjustmentMethod, Location, MethodSelector, ScaleResult, WeatherSnapshot, WeightOverrides,
};
pub use orchestrator::compute_scale;
pub use request::{ScaleRequest, ip_to_int, parse_number_or};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WateringError>;
