//! Sun times and timezone localization
//!
//! The controller works in local "minutes since midnight" and stores its
//! timezone as quarter hours offset by 48 (48 = UTC, 28 = UTC-5, 70 = UTC+5:30).

use anyhow::{Context, Result};
use chrono::{DateTime, Days, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::{debug, warn};

use crate::models::Location;

/// Quarter-hour offset that represents UTC
pub const UTC_QUARTER_HOURS: i32 = 48;

const QUARTER_HOUR_SECONDS: i64 = 900;
const SECONDS_PER_DAY: i64 = 86_400;

/// Days searched for the next sunrise or sunset, after the previous UTC date
const SEARCH_DAYS: u64 = 3;

/// Offset and sun times for a location, all optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Localization {
    pub timezone_offset: Option<i32>,
    pub sunrise: Option<u32>,
    pub sunset: Option<u32>,
}

/// Next sunrise and sunset at or after `now`, in UTC
pub fn next_sunrise_sunset(
    latitude: f64,
    longitude: f64,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let coordinates = Coordinates::new(latitude, longitude)
        .with_context(|| format!("Invalid coordinates: lat={latitude}, lng={longitude}"))?;

    let sunrise = next_event(coordinates, now, SolarEvent::Sunrise)
        .with_context(|| format!("No sunrise within {SEARCH_DAYS} days at {latitude}, {longitude}"))?;
    let sunset = next_event(coordinates, now, SolarEvent::Sunset)
        .with_context(|| format!("No sunset within {SEARCH_DAYS} days at {latitude}, {longitude}"))?;

    Ok((sunrise, sunset))
}

fn next_event(
    coordinates: Coordinates,
    now: DateTime<Utc>,
    event: SolarEvent,
) -> Option<DateTime<Utc>> {
    // West of Greenwich the previous UTC date's solar day can still be ahead of `now`.
    let today = now.date_naive();
    let start = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    (0..=SEARCH_DAYS)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .filter_map(|date| SolarDay::new(coordinates, date).event_time(event))
        .find(|time| *time >= now)
}

/// UTC offset of `timezone` at `now`, in quarter hours with 48 = UTC.
///
/// Returns `None` when the name is not a known timezone.
#[must_use]
pub fn timezone_offset_quarter_hours(timezone: &str, now: DateTime<Utc>) -> Option<i32> {
    let Ok(tz) = timezone.trim().parse::<Tz>() else {
        warn!("Unknown timezone '{}'", timezone);
        return None;
    };

    let offset_seconds = i64::from(
        tz.offset_from_utc_datetime(&now.naive_utc())
            .fix()
            .local_minus_utc(),
    );
    let quarter_hours = i32::try_from(offset_seconds.div_euclid(QUARTER_HOUR_SECONDS)).ok()?;

    Some(quarter_hours + UTC_QUARTER_HOURS)
}

/// Minutes after local midnight for a UTC instant, always in [0, 1439]
#[must_use]
pub fn minutes_since_local_midnight(instant: DateTime<Utc>, offset_quarter_hours: i32) -> u32 {
    let shift = QUARTER_HOUR_SECONDS * i64::from(offset_quarter_hours - UTC_QUARTER_HOURS);
    let seconds_of_day = (instant.timestamp() + shift).rem_euclid(SECONDS_PER_DAY);
    u32::try_from(seconds_of_day / 60).unwrap_or_default()
}

/// Resolve offset and local sun times for a location.
///
/// Sun times need coordinates; without a known timezone they are given in
/// UTC minutes.
#[must_use]
pub fn localize(location: &Location, now: DateTime<Utc>) -> Localization {
    let timezone_offset = location
        .timezone
        .as_deref()
        .and_then(|tz| timezone_offset_quarter_hours(tz, now));

    let sun_times = location.coordinates().and_then(|(lat, lon)| {
        next_sunrise_sunset(lat, lon, now)
            .map_err(|e| warn!("Sun times unavailable: {:#}", e))
            .ok()
    });

    let local_offset = timezone_offset.unwrap_or(UTC_QUARTER_HOURS);
    let localization = Localization {
        timezone_offset,
        sunrise: sun_times.map(|(rise, _)| minutes_since_local_midnight(rise, local_offset)),
        sunset: sun_times.map(|(_, set)| minutes_since_local_midnight(set, local_offset)),
    };

    debug!(?localization, "Localized sun times");
    localization
}
