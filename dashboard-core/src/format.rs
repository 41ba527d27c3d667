//! Unit and time formatting shared by the normalizers.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Label used for any weather code missing from the lookup table.
pub const UNKNOWN_WEATHER_LABEL: &str = "Weather Update";

/// Wall-clock layouts used on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePattern {
    /// "06:05 AM"
    ClockMinutes,
    /// "3PM", leading zero stripped
    Hour,
}

/// Render a UTC epoch timestamp in the zone described by a fixed offset.
///
/// The offset is plain arithmetic; no daylight-saving rules are applied
/// beyond whatever the upstream already folded into `offset_secs`.
pub fn local_time(epoch_secs: i64, offset_secs: i32, pattern: TimePattern) -> String {
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
    let local = DateTime::<Utc>::from_timestamp(epoch_secs, 0)
        .unwrap_or_default()
        .with_timezone(&offset);

    match pattern {
        TimePattern::ClockMinutes => local.format("%I:%M %p").to_string(),
        TimePattern::Hour => {
            let hour = local.format("%I%p").to_string();
            hour.trim_start_matches('0').to_string()
        }
    }
}

/// Human label for a WMO weather code. Total over all inputs.
pub fn weather_code_label(code: i64) -> &'static str {
    match code {
        0 => "Clear Sky",
        1 => "Mainly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Rime Fog",
        51 => "Light Drizzle",
        53 => "Drizzle",
        55 => "Dense Drizzle",
        61 => "Light Rain",
        63 => "Rain",
        65 => "Heavy Rain",
        71 => "Light Snow",
        73 => "Snow",
        75 => "Heavy Snow",
        80 => "Rain Showers",
        81 => "Heavy Showers",
        82 => "Violent Showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm With Hail",
        99 => "Severe Thunderstorm",
        _ => UNKNOWN_WEATHER_LABEL,
    }
}

/// m/s to km/h, one decimal.
pub fn wind_kmh(meters_per_sec: f64) -> f64 {
    round1(meters_per_sec * 3.6)
}

/// Meters to kilometers, one decimal.
pub fn visibility_km(meters: f64) -> f64 {
    round1(meters / 1000.0)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
