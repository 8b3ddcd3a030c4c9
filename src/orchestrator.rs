//! Scale orchestration
//!
//! Runs one request end to end: base model, rain lockout, sun times, and
//! the final result record. Nothing here fails; missing data shows up as
//! absent fields in the result.

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info, instrument, warn};

use crate::astronomy::localize;
use crate::config::ScaleConfig;
use crate::evapotranspiration::{EtEstimates, EtInputs, compute_et, et_scale};
use crate::heuristic::{HeuristicInputs, heuristic_scale};
use crate::lockout::{LockoutOutcome, evaluate_lockout};
use crate::models::{AdjustmentMethod, MethodSelector, ScaleResult, WeatherSnapshot};
use crate::request::{ScaleRequest, ip_to_int};

/// Base scale and, for the ET method, the estimates behind it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaseScale {
    pub scale: Option<i32>,
    pub evapotranspiration: Option<EtEstimates>,
}

/// Run the base model picked by the selector
#[must_use]
pub fn base_scale(
    method: AdjustmentMethod,
    snapshot: &WeatherSnapshot,
    request: &ScaleRequest,
    now: DateTime<Utc>,
) -> BaseScale {
    match method {
        AdjustmentMethod::Heuristic => BaseScale {
            scale: Some(heuristic_scale(
                &HeuristicInputs::from(snapshot),
                &request.weights,
            )),
            evapotranspiration: None,
        },
        AdjustmentMethod::Evapotranspiration => {
            let Some(inputs) = EtInputs::from_snapshot(snapshot, &request.location, now.ordinal())
            else {
                warn!("Incomplete weather data for evapotranspiration; scale left unset");
                return BaseScale::default();
            };

            let estimates = compute_et(&inputs);
            BaseScale {
                scale: Some(et_scale(
                    estimates.et0,
                    snapshot.precip_today_in,
                    request.baseline_eto_in,
                )),
                evapotranspiration: Some(estimates),
            }
        }
        AdjustmentMethod::Unknown(code) => {
            debug!(code, "No adjustment method for selector code");
            BaseScale::default()
        }
    }
}

/// Compute the full scale result for one request at instant `now`
#[instrument(
    skip_all,
    fields(method = %request.selector.method, lockout = request.selector.lockout_enabled)
)]
pub fn compute_scale(
    request: &ScaleRequest,
    settings: &ScaleConfig,
    now: DateTime<Utc>,
) -> ScaleResult {
    let snapshot = request.snapshot.normalized();
    let base = base_scale(request.selector.method, &snapshot, request, now);

    let outcome = if request.selector.lockout_enabled {
        let decision = evaluate_lockout(
            snapshot.precip_today_in,
            snapshot.precip_yesterday_in,
            snapshot.precip_two_days_ago_in,
            settings.lockout_threshold_in,
        );
        debug!(?decision, policy = %settings.lockout_policy, "Rain lockout evaluated");
        settings.lockout_policy.apply(decision, base.scale)
    } else {
        LockoutOutcome {
            scale: base.scale,
            restrict: false,
        }
    };

    let localization = localize(&request.location, now);

    let result = ScaleResult {
        scale: outcome.scale,
        restrict: outcome.restrict,
        timezone_offset: localization.timezone_offset,
        sunrise: localization.sunrise,
        sunset: localization.sunset,
        max_humidity: snapshot.max_humidity,
        min_humidity: snapshot.min_humidity,
        mean_temp_f: snapshot.mean_temp_f,
        precip_in: snapshot.precip_yesterday_in,
        precip_today_in: snapshot.precip_today_in,
        current_humidity: snapshot.current_humidity,
        evapotranspiration: base.evapotranspiration,
        client_ip: request.client_address.as_deref().map_or(0, ip_to_int),
    };

    notify_usage(request.selector, &result);
    result
}

/// Usage event for analytics collectors; never affects the result
fn notify_usage(selector: MethodSelector, result: &ScaleResult) {
    info!(
        target: "wateringscale::usage",
        method = %selector.method,
        scale = ?result.scale,
        restrict = result.restrict,
        tz = ?result.timezone_offset,
        "Scale lookup"
    );
}
