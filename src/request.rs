//! Request bundle and the lenient parsing helpers used to build it
//!
//! Controllers and weather providers send plenty of junk. Malformed numbers
//! fall back to a caller-chosen default instead of failing the request.

use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::error::WateringError;
use crate::models::{Location, MethodSelector, WeatherSnapshot, WeightOverrides};

/// Everything the engine needs for one scale computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRequest {
    /// Method selector as the controller byte
    pub selector: MethodSelector,
    #[serde(default)]
    pub snapshot: WeatherSnapshot,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub weights: WeightOverrides,
    /// ETo (in/day) the watering schedule was designed for
    #[serde(default, deserialize_with = "lenient_number")]
    pub baseline_eto_in: Option<f64>,
    /// Client address, possibly a forwarded-for list
    #[serde(default)]
    pub client_address: Option<String>,
}

impl ScaleRequest {
    #[must_use]
    pub fn new(selector: MethodSelector, snapshot: WeatherSnapshot, location: Location) -> Self {
        Self {
            selector,
            snapshot,
            location,
            weights: WeightOverrides::default(),
            baseline_eto_in: None,
            client_address: None,
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: WeightOverrides) -> Self {
        self.weights = weights;
        self
    }

    /// Reject requests whose location or baseline cannot be meaningful
    pub fn validate(&self) -> Result<(), WateringError> {
        if let Some(lat) = self.location.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(WateringError::validation(format!(
                    "Latitude {lat} out of range [-90, 90]"
                )));
            }
        }
        if let Some(lon) = self.location.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(WateringError::validation(format!(
                    "Longitude {lon} out of range [-180, 180]"
                )));
            }
        }
        if let Some(baseline) = self.baseline_eto_in {
            if baseline.is_nan() || baseline <= 0.0 {
                return Err(WateringError::validation(format!(
                    "Baseline ETo must be positive, got {baseline}"
                )));
            }
        }
        Ok(())
    }
}

/// Parse a number, substituting `default` when the text is absent or malformed.
///
/// Request decoding goes through [`lenient_number`], so string-typed weather
/// values in a JSON request land here with a `None` default.
#[must_use]
pub fn parse_number_or(raw: Option<&str>, default: Option<f64>) -> Option<f64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };

    match raw.trim_end_matches('%').parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!("Substituting default for malformed number '{}'", raw);
            default
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Serde hook for optional numbers sent as numbers, numeric text or junk
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(value) => Some(value),
        RawNumber::Text(text) => parse_number_or(Some(&text), None),
        RawNumber::Other(_) => None,
    })
}

/// First address of a forwarded-for list, as an integer; 0 when malformed
#[must_use]
pub fn ip_to_int(address: &str) -> u32 {
    address
        .split(',')
        .next()
        .map(str::trim)
        .and_then(|ip| ip.parse::<Ipv4Addr>().ok())
        .map_or(0, u32::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdjustmentMethod;
    use rstest::rstest;

    #[rstest]
    #[case(Some("42"), Some(-1.0), Some(42.0))]
    #[case(Some(" 0.05 "), Some(-1.0), Some(0.05))]
    #[case(Some("85%"), None, Some(85.0))]
    #[case(Some("--"), Some(-1.0), Some(-1.0))]
    #[case(Some("NaN"), None, None)]
    #[case(Some(""), Some(3.0), Some(3.0))]
    #[case(None, None, None)]
    fn test_parse_number_or(
        #[case] raw: Option<&str>,
        #[case] default: Option<f64>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(parse_number_or(raw, default), expected);
    }

    #[rstest]
    #[case("192.168.1.1", 3_232_235_777)]
    #[case("10.0.0.1, 172.16.0.1", 167_772_161)]
    #[case("0.0.0.0", 0)]
    #[case("255.255.255.255", u32::MAX)]
    #[case("::1", 0)]
    #[case("not an ip", 0)]
    fn test_ip_to_int(#[case] address: &str, #[case] expected: u32) {
        assert_eq!(ip_to_int(address), expected);
    }

    #[test]
    fn test_malformed_numbers_do_not_fail_the_request() {
        let request: ScaleRequest = serde_json::from_str(
            r#"{
                "selector": 1,
                "snapshot": {"max_humidity": "80", "min_humidity": "n/a", "mean_temp_f": 75},
                "baseline_eto_in": "0.2"
            }"#,
        )
        .unwrap();

        assert_eq!(request.snapshot.max_humidity, Some(80.0));
        assert_eq!(request.snapshot.min_humidity, None);
        assert_eq!(request.snapshot.mean_temp_f, Some(75.0));
        assert_eq!(request.baseline_eto_in, Some(0.2));
    }

    #[test]
    fn test_validate() {
        let mut request = ScaleRequest::new(
            MethodSelector::from_bits(1),
            WeatherSnapshot::default(),
            Location::new(40.0, -105.0),
        );
        assert!(request.validate().is_ok());

        request.baseline_eto_in = Some(0.0);
        assert!(matches!(request.validate(), Err(WateringError::Validation { .. })));

        request.baseline_eto_in = None;
        request.location = Location::new(91.0, 0.0);
        assert!(request.validate().is_err());

        request.location = Location::new(0.0, -181.0);
        assert!(request.validate().is_err());

        request.location = Location::unresolved();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_deserialize() {
        let request: ScaleRequest = serde_json::from_str(
            r#"{
                "selector": 129,
                "snapshot": {"max_humidity": 80, "min_humidity": 60, "mean_temp_f": 75},
                "location": {"latitude": 40.0, "longitude": -105.0, "timezone": "America/Denver"},
                "weights": {"rain": 50}
            }"#,
        )
        .unwrap();

        assert_eq!(request.selector.method, AdjustmentMethod::Heuristic);
        assert!(request.selector.lockout_enabled);
        assert_eq!(request.snapshot.mean_temp_f, Some(75.0));
        assert_eq!(request.weights.rain, Some(50.0));
        assert_eq!(request.location.timezone.as_deref(), Some("America/Denver"));
        assert!(request.client_address.is_none());
        assert!(request.baseline_eto_in.is_none());
    }
}
