//! Keyless daily outlook from an Open-Meteo style endpoint.
//!
//! The daily block is a set of parallel arrays that upstream does not keep in
//! lockstep: any of them may be missing, shorter than `time`, or hold nulls.
//! Each field is probed per index on its own.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    error::UpstreamError,
    format::{UNKNOWN_WEATHER_LABEL, weather_code_label},
    model::DailyForecast,
    provider::{Coordinates, get_json},
};

const SEVEN_DAY: &str = "seven-day forecast";

pub const FORECAST_DAYS: usize = 7;

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
                            precipitation_probability_max,wind_speed_10m_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(url: String, http: Client) -> Self {
        Self { url, http }
    }

    #[instrument(skip(self), fields(lat = coords.lat, lon = coords.lon))]
    pub async fn fetch_seven_day(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<DailyForecast>, UpstreamError> {
        let query = [
            ("latitude", coords.lat.to_string()),
            ("longitude", coords.lon.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ];
        let parsed: OmResponse = get_json(&self.http, SEVEN_DAY, &self.url, &query).await?;

        Ok(parsed.daily.map(|daily| normalize_daily(&daily)).unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    #[serde(default)]
    time: Value,
    #[serde(default)]
    weather_code: Value,
    #[serde(default)]
    temperature_2m_max: Value,
    #[serde(default)]
    temperature_2m_min: Value,
    #[serde(default)]
    precipitation_probability_max: Value,
    #[serde(default)]
    wind_speed_10m_max: Value,
}

fn number_at(values: &Value, index: usize) -> Option<f64> {
    values.get(index).and_then(Value::as_f64)
}

fn rounded_at(values: &Value, index: usize) -> Option<i64> {
    number_at(values, index).map(|v| v.round_ties_even() as i64)
}

/// Up to [`FORECAST_DAYS`] days; a day whose date does not parse is skipped and not counted.
fn normalize_daily(daily: &OmDaily) -> Vec<DailyForecast> {
    let count = daily.time.as_array().map_or(0, Vec::len);
    let mut days = Vec::with_capacity(count.min(FORECAST_DAYS));

    for i in 0..count {
        if days.len() == FORECAST_DAYS {
            break;
        }

        let Some(date) = daily
            .time
            .get(i)
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        else {
            debug!(index = i, "Skipping day with unparseable date");
            continue;
        };

        let weather = number_at(&daily.weather_code, i)
            .map_or(UNKNOWN_WEATHER_LABEL, |code| weather_code_label(code as i64));

        days.push(DailyForecast {
            date: date.format("%Y-%m-%d").to_string(),
            weekday: date.format("%a").to_string(),
            display_date: date.format("%d %b").to_string(),
            weather,
            high: rounded_at(&daily.temperature_2m_max, i),
            low: rounded_at(&daily.temperature_2m_min, i),
            rain: rounded_at(&daily.precipitation_probability_max, i).unwrap_or_default(),
            wind: rounded_at(&daily.wind_speed_10m_max, i).unwrap_or_default(),
        });
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily(value: Value) -> OmDaily {
        serde_json::from_value(value).unwrap()
    }

    fn week() -> Value {
        json!([
            "2026-10-18", "2026-10-19", "2026-10-20", "2026-10-21",
            "2026-10-22", "2026-10-23", "2026-10-24"
        ])
    }

    #[test]
    fn ragged_arrays_default_per_field() {
        let days = normalize_daily(&daily(json!({
            "time": week(),
            "temperature_2m_max": [18.6, 17.2, 16.0, 15.5, 14.4],
            "temperature_2m_min": [9.1, 8.0, 7.7, 6.2, 5.9, 5.0, 4.4],
            "wind_speed_10m_max": [12.3, 20.8, 8.0]
        })));

        assert_eq!(days.len(), 7);

        assert_eq!(days[0].high, Some(19));
        assert_eq!(days[0].wind, 12);
        assert_eq!(days[4].high, Some(14));
        assert_eq!(days[4].wind, 0);
        assert_eq!(days[5].high_label(), "--");
        assert_eq!(days[6].low, Some(4));

        for day in &days {
            assert_eq!(day.weather, "Weather Update");
            assert_eq!(day.rain, 0);
        }
    }

    #[test]
    fn nulls_do_not_suppress_other_fields() {
        let days = normalize_daily(&daily(json!({
            "time": ["2026-10-18", "2026-10-19"],
            "weather_code": [61, null],
            "temperature_2m_max": [null, 21.0],
            "temperature_2m_min": [11.4, null],
            "precipitation_probability_max": [80, null],
            "wind_speed_10m_max": [null, 30.6]
        })));

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].weather, "Light Rain");
        assert_eq!(days[0].high, None);
        assert_eq!(days[0].low, Some(11));
        assert_eq!(days[0].rain, 80);
        assert_eq!(days[0].wind, 0);

        assert_eq!(days[1].weather, "Weather Update");
        assert_eq!(days[1].high, Some(21));
        assert_eq!(days[1].low, None);
        assert_eq!(days[1].rain, 0);
        assert_eq!(days[1].wind, 31);
    }

    #[test]
    fn unparseable_dates_are_skipped_without_shifting_fields() {
        let days = normalize_daily(&daily(json!({
            "time": ["2026-10-18", "not-a-date", null, "2026-10-21"],
            "temperature_2m_max": [10.0, 11.0, 12.0, 13.0]
        })));

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2026-10-18");
        assert_eq!(days[1].date, "2026-10-21");
        assert_eq!(days[1].high, Some(13));
    }

    #[test]
    fn skipped_days_do_not_count_toward_the_limit() {
        let mut time = vec![json!("garbage")];
        time.extend((10..19).map(|d| json!(format!("2026-10-{d}"))));

        let days = normalize_daily(&daily(json!({ "time": time })));

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].date, "2026-10-10");
        assert_eq!(days[6].date, "2026-10-16");
    }

    #[test]
    fn date_fields_are_derived_from_the_calendar_date() {
        let days = normalize_daily(&daily(json!({ "time": ["2026-10-18"], "weather_code": [3] })));

        assert_eq!(days[0].weekday, "Sun");
        assert_eq!(days[0].display_date, "18 Oct");
        assert_eq!(days[0].weather, "Overcast");
    }

    #[test]
    fn half_values_round_to_even() {
        let days = normalize_daily(&daily(json!({
            "time": ["2026-10-18"],
            "temperature_2m_max": [12.5],
            "temperature_2m_min": [-3.5],
            "wind_speed_10m_max": [17.5]
        })));

        assert_eq!(days[0].high, Some(12));
        assert_eq!(days[0].low, Some(-4));
        assert_eq!(days[0].wind, 18);
    }

    #[test]
    fn missing_or_non_array_time_yields_no_days() {
        assert!(normalize_daily(&daily(json!({}))).is_empty());
        assert!(normalize_daily(&daily(json!({ "time": "2026-10-18" }))).is_empty());
    }
}
