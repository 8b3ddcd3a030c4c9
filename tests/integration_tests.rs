//! Integration tests for the WateringScale public API

use chrono::{DateTime, TimeZone, Utc};
use wateringscale::{
    LockoutPolicy, MethodSelector, ScaleConfig, ScaleRequest, WeightOverrides, compute_scale,
    parse_number_or,
};

fn june_afternoon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 28, 15, 0, 0).unwrap()
}

fn request_json(selector: u8, precip_today: f64) -> String {
    format!(
        r#"{{
            "selector": {selector},
            "snapshot": {{
                "max_humidity": 80, "min_humidity": 60, "mean_humidity": 70,
                "current_humidity": 55.7,
                "mean_temp_f": 75, "max_temp_f": 86, "min_temp_f": 64,
                "precip_today_in": {precip_today}, "precip_yesterday_in": 0,
                "precip_two_days_ago_in": 0,
                "wind_mph": 5, "solar_wm2": 250
            }},
            "location": {{
                "latitude": 40.0, "longitude": -105.0, "elevation_ft": 5300,
                "timezone": "America/Denver"
            }},
            "client_address": "192.168.1.1"
        }}"#
    )
}

fn request(selector: u8, precip_today: f64) -> ScaleRequest {
    serde_json::from_str(&request_json(selector, precip_today)).unwrap()
}

/// Heuristic method on a warm, humid, dry day
#[test]
fn test_heuristic_end_to_end() {
    let result = compute_scale(&request(1, 0.0), &ScaleConfig::default(), june_afternoon());

    assert_eq!(result.scale, Some(80));
    assert!(!result.restrict);
    // Denver in June is UTC-6
    assert_eq!(result.timezone_offset, Some(24));

    let query = result.to_query_string();
    assert!(query.starts_with("&scale=80&restrict=0&tz=24&sunrise="));
    assert!(query.contains("&maxh=80&minh=60&meant=75&pre=0.000000&prec=0.000000&hc=55"));
    assert!(query.ends_with("&eip=3232235777"));
}

/// Lockout bit set with rain today, default restrict policy
#[test]
fn test_rain_lockout_restricts() {
    let result = compute_scale(&request(129, 0.05), &ScaleConfig::default(), june_afternoon());

    assert!(result.restrict);
    assert_eq!(result.scale, Some(70));
    assert!(result.to_query_string().starts_with("&scale=70&restrict=1"));
}

/// Lockout bit set with rain today, scale forced to zero
#[test]
fn test_rain_lockout_forces_zero() {
    let settings = ScaleConfig {
        lockout_policy: LockoutPolicy::ForceZero,
        ..ScaleConfig::default()
    };
    let result = compute_scale(&request(129, 0.05), &settings, june_afternoon());

    assert!(result.restrict);
    assert_eq!(result.scale, Some(0));
}

/// A higher lockout threshold lets light rain through
#[test]
fn test_lockout_threshold_is_configurable() {
    let settings = ScaleConfig {
        lockout_threshold_in: 0.1,
        ..ScaleConfig::default()
    };
    let result = compute_scale(&request(129, 0.05), &settings, june_afternoon());
    assert!(!result.restrict);
}

/// ET method reports its estimates next to the scale
#[test]
fn test_evapotranspiration_end_to_end() {
    let result = compute_scale(&request(2, 0.0), &ScaleConfig::default(), june_afternoon());

    let et = result.evapotranspiration.expect("ET estimates");
    assert!(et.eth > 0.0 && et.et0 > 0.0 && et.etr > 0.0);
    // Tall reference crop uses more water than short grass
    assert!(et.etr > et.et0);

    let scale = result.scale.expect("ET scale");
    assert!((0..=200).contains(&scale));
    assert!(result.to_query_string().contains("&eto="));
}

/// Unknown method codes still localize and echo the weather
#[test]
fn test_unknown_method() {
    let result = compute_scale(&request(3, 0.0), &ScaleConfig::default(), june_afternoon());

    assert_eq!(result.scale, None);
    assert!(result.sunrise.is_some());
    assert!(result.to_query_string().starts_with("&scale=-1&restrict=0&tz=24"));
}

/// Controller-style inputs: selector as text, weights without braces
#[test]
fn test_controller_style_inputs() {
    let selector: MethodSelector = "129".parse().unwrap();
    let weights = WeightOverrides::parse_wto(r#""h":100,"t":100,"r":0"#);

    let mut req = request(1, 0.05);
    req.selector = selector;
    req = req.with_weights(weights);

    let result = compute_scale(&req, &ScaleConfig::default(), june_afternoon());
    // Rain factor weighted out; the lockout still sees the rain
    assert_eq!(result.scale, Some(80));
    assert!(result.restrict);
}

#[test]
fn test_parse_number_or_default() {
    assert_eq!(parse_number_or(Some("12.5"), None), Some(12.5));
    assert_eq!(parse_number_or(Some("n/a"), Some(-1.0)), Some(-1.0));
}

/// JSON output carries the controller keys and sentinels
#[test]
fn test_json_output() {
    let mut req = request(1, 0.0);
    req.location.latitude = None;
    req.location.timezone = None;

    let result = compute_scale(&req, &ScaleConfig::default(), june_afternoon());
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    assert_eq!(json["scale"], 80);
    assert_eq!(json["restrict"], 0);
    assert_eq!(json["tz"], -1);
    assert_eq!(json["sunrise"], -1);
    assert_eq!(json["sunset"], -1);
    assert_eq!(json["eip"], 3_232_235_777_u32);
    assert!(json.get("eto").is_none());
}

/// Invalid coordinates are caught before computing
#[test]
fn test_request_validation() {
    let mut req = request(1, 0.0);
    assert!(req.validate().is_ok());
    req.location.latitude = Some(95.0);
    assert!(req.validate().is_err());
}
