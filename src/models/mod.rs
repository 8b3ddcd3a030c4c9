//! Data models for the `WateringScale` engine
//!
//! This module contains the request and result records, organized by concern:
//! - Location: where the watering site is
//! - Weather: the observed conditions the models consume
//! - Selector: which adjustment method runs, decoded from the controller byte
//! - Weights: per-factor tuning of the heuristic model
//! - Result: the scale record and its controller wire formats

pub mod location;
pub mod result;
pub mod selector;
pub mod weather;
pub mod weights;

// Re-export all public types for convenient access
pub use location::Location;
pub use result::ScaleResult;
pub use selector::{AdjustmentMethod, MethodSelector};
pub use weather::WeatherSnapshot;
pub use weights::WeightOverrides;
