//! Scale result record and its controller wire formats

use serde::{Deserialize, Serialize};

use crate::error::WateringError;
use crate::evapotranspiration::EtEstimates;

/// Value the controller reads as "could not determine"
const UNKNOWN: i64 = -1;

/// Mean temperature the controller reads as "could not determine"
const UNKNOWN_TEMP: i64 = -500;

/// Outcome of one scale request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleResult {
    /// Watering scale in percent (0-200), absent when no method ran
    pub scale: Option<i32>,
    /// Watering should be suppressed because of recent rain
    pub restrict: bool,
    /// Local UTC offset in quarter hours, 48 = UTC
    pub timezone_offset: Option<i32>,
    /// Next sunrise in minutes after local midnight
    pub sunrise: Option<u32>,
    /// Next sunset in minutes after local midnight
    pub sunset: Option<u32>,
    pub max_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub mean_temp_f: Option<f64>,
    /// Precipitation yesterday (in)
    pub precip_in: Option<f64>,
    /// Precipitation today (in)
    pub precip_today_in: Option<f64>,
    pub current_humidity: Option<f64>,
    /// Evapotranspiration estimates, present when the ET method ran
    pub evapotranspiration: Option<EtEstimates>,
    /// Client IPv4 address as an integer
    pub client_ip: u32,
}

/// Field layout the controller firmware parses
#[derive(Debug, Serialize)]
struct ControllerFields {
    scale: i64,
    restrict: u8,
    tz: i64,
    sunrise: i64,
    sunset: i64,
    maxh: i64,
    minh: i64,
    meant: i64,
    pre: f64,
    prec: f64,
    hc: i64,
    eip: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    eto: Option<f64>,
}

// Controller fields are integers; fractional observations are truncated.
#[allow(clippy::cast_possible_truncation)]
fn truncated(value: Option<f64>, unknown: i64) -> i64 {
    value.map_or(unknown, |v| v.trunc() as i64)
}

impl ScaleResult {
    fn controller_fields(&self) -> ControllerFields {
        ControllerFields {
            scale: self.scale.map_or(UNKNOWN, i64::from),
            restrict: u8::from(self.restrict),
            tz: self.timezone_offset.map_or(UNKNOWN, i64::from),
            sunrise: self.sunrise.map_or(UNKNOWN, i64::from),
            sunset: self.sunset.map_or(UNKNOWN, i64::from),
            maxh: truncated(self.max_humidity, UNKNOWN),
            minh: truncated(self.min_humidity, UNKNOWN),
            meant: truncated(self.mean_temp_f, UNKNOWN_TEMP),
            pre: self.precip_in.unwrap_or(-1.0),
            prec: self.precip_today_in.unwrap_or(-1.0),
            hc: truncated(self.current_humidity, UNKNOWN),
            eip: self.client_ip,
            eto: self.evapotranspiration.map(|et| et.et0),
        }
    }

    /// Render as the `&key=value` string older firmware expects
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let f = self.controller_fields();
        let mut out = format!(
            "&scale={}&restrict={}&tz={}&sunrise={}&sunset={}&maxh={}&minh={}&meant={}&pre={:.6}&prec={:.6}&hc={}&eip={}",
            f.scale,
            f.restrict,
            f.tz,
            f.sunrise,
            f.sunset,
            f.maxh,
            f.minh,
            f.meant,
            f.pre,
            f.prec,
            f.hc,
            f.eip
        );
        if let Some(eto) = f.eto {
            out.push_str(&format!("&eto={eto:.3}"));
        }
        out
    }

    /// Render as a JSON object with the same keys as the query string
    pub fn to_json(&self) -> Result<String, WateringError> {
        Ok(serde_json::to_string(&self.controller_fields())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScaleResult {
        ScaleResult {
            scale: Some(80),
            restrict: true,
            timezone_offset: Some(28),
            sunrise: Some(412),
            sunset: Some(1190),
            max_humidity: Some(80.0),
            min_humidity: Some(60.0),
            mean_temp_f: Some(75.4),
            precip_in: Some(0.0),
            precip_today_in: Some(0.05),
            current_humidity: None,
            evapotranspiration: None,
            client_ip: 3_232_235_777,
        }
    }

    #[test]
    fn test_query_string() {
        assert_eq!(
            sample().to_query_string(),
            "&scale=80&restrict=1&tz=28&sunrise=412&sunset=1190&maxh=80&minh=60&meant=75\
             &pre=0.000000&prec=0.050000&hc=-1&eip=3232235777"
        );
    }

    #[test]
    fn test_query_string_all_unknown() {
        let result = ScaleResult::default();
        assert_eq!(
            result.to_query_string(),
            "&scale=-1&restrict=0&tz=-1&sunrise=-1&sunset=-1&maxh=-1&minh=-1&meant=-500\
             &pre=-1.000000&prec=-1.000000&hc=-1&eip=0"
        );
    }

    #[test]
    fn test_json() {
        let json: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["scale"], 80);
        assert_eq!(json["restrict"], 1);
        assert_eq!(json["tz"], 28);
        assert_eq!(json["meant"], 75);
        assert_eq!(json["hc"], -1);
        assert_eq!(json["prec"], 0.05);
        assert!(json.get("eto").is_none());
    }

    #[test]
    fn test_eto_is_reported_when_present() {
        let result = ScaleResult {
            evapotranspiration: Some(EtEstimates {
                eth: 0.2,
                et0: 0.25,
                etr: 0.3,
            }),
            ..sample()
        };
        assert!(result.to_query_string().ends_with("&eto=0.250"));
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["eto"], 0.25);
    }
}
