use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    config::Endpoints,
    error::UpstreamError,
    format::{TimePattern, local_time, title_case, visibility_km, wind_kmh},
    model::{AirQuality, ForecastSlot, Pollutants, Weather},
    provider::{Coordinates, CurrentConditions, get_json},
};

const CURRENT: &str = "current weather";
const SHORT_TERM: &str = "short-term forecast";
const AIR_QUALITY: &str = "air quality";

/// Number of 3-hour slots shown on the dashboard.
pub const FORECAST_SLOTS: usize = 6;

#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    current_url: String,
    forecast_url: String,
    air_quality_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &"<redacted>")
            .field("current_url", &self.current_url)
            .field("forecast_url", &self.forecast_url)
            .field("air_quality_url", &self.air_quality_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(api_key: String, endpoints: &Endpoints, http: Client) -> Self {
        Self {
            api_key,
            current_url: endpoints.base_url.clone(),
            forecast_url: endpoints.forecast_url.clone(),
            air_quality_url: endpoints.air_quality_url.clone(),
            http,
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, UpstreamError> {
        let query = [
            ("q", city.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        let parsed: OwCurrentResponse =
            get_json(&self.http, CURRENT, &self.current_url, &query).await?;

        normalize_current(parsed)
    }

    #[instrument(skip(self), fields(lat = coords.lat, lon = coords.lon))]
    pub async fn fetch_short_term(
        &self,
        coords: Coordinates,
        utc_offset_secs: i32,
    ) -> Result<Vec<ForecastSlot>, UpstreamError> {
        let mut query = self.coord_query(coords);
        query.push(("units", "metric".to_string()));
        let parsed: OwForecastResponse =
            get_json(&self.http, SHORT_TERM, &self.forecast_url, &query).await?;

        Ok(normalize_short_term(parsed, utc_offset_secs))
    }

    #[instrument(skip(self), fields(lat = coords.lat, lon = coords.lon))]
    pub async fn fetch_air_quality(
        &self,
        coords: Coordinates,
    ) -> Result<Option<AirQuality>, UpstreamError> {
        let query = self.coord_query(coords);
        let parsed: OwAirResponse =
            get_json(&self.http, AIR_QUALITY, &self.air_quality_url, &query).await?;

        Ok(normalize_air(parsed))
    }

    fn coord_query(&self, coords: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("appid", self.api_key.clone()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    temp_max: Option<f64>,
    temp_min: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    visibility: Option<f64>,
    clouds: Option<OwClouds>,
    sys: Option<OwSys>,
    /// Shift from UTC in seconds.
    timezone: Option<i64>,
    coord: Option<OwCoord>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// Entries stay raw until picked so a bad entry past the ones shown cannot fail the call.
#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwComponents {
    co: Option<f64>,
    no2: Option<f64>,
    o3: Option<f64>,
    pm10: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: Option<OwAqi>,
    components: Option<OwComponents>,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<Value>,
}

fn parse_entry<T: DeserializeOwned>(value: Value, endpoint: &'static str) -> Option<T> {
    serde_json::from_value(value)
        .inspect_err(|err| debug!(endpoint, error = %err, "Ignoring malformed list entry"))
        .ok()
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, UpstreamError> {
    value.ok_or_else(|| UpstreamError::malformed(CURRENT, format!("missing {field}")))
}

fn normalize_current(parsed: OwCurrentResponse) -> Result<CurrentConditions, UpstreamError> {
    let city = required(parsed.name, "name")?;
    let main = required(parsed.main, "main")?;
    let temp = required(main.temp, "main.temp")?;
    let humidity = required(main.humidity, "main.humidity")?;
    let condition = required(parsed.weather.into_iter().next(), "weather[0]")?;
    let description = required(condition.description, "weather[0].description")?;
    let icon = required(condition.icon, "weather[0].icon")?;

    let utc_offset_secs = parsed
        .timezone
        .and_then(|tz| i32::try_from(tz).ok())
        .unwrap_or_default();
    let (sunrise, sunset) = parsed.sys.map_or((None, None), |s| (s.sunrise, s.sunset));

    let coords = parsed.coord.and_then(|c| match (c.lat, c.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    });
    if coords.is_none() {
        debug!(city = %city, "Current conditions carry no coordinates");
    }

    let weather = Weather {
        city,
        temp,
        temp_max: main.temp_max.unwrap_or(temp),
        temp_min: main.temp_min.unwrap_or(temp),
        feels_like: main.feels_like.unwrap_or(temp),
        humidity: humidity.round_ties_even() as i64,
        description: title_case(&description),
        icon,
        wind: wind_kmh(parsed.wind.and_then(|w| w.speed).unwrap_or_default()),
        visibility: visibility_km(parsed.visibility.unwrap_or_default()),
        sunrise: local_time(sunrise.unwrap_or_default(), utc_offset_secs, TimePattern::ClockMinutes),
        sunset: local_time(sunset.unwrap_or_default(), utc_offset_secs, TimePattern::ClockMinutes),
        clouds: parsed.clouds.and_then(|c| c.all).unwrap_or_default().round_ties_even() as i64,
        pressure: main.pressure.unwrap_or_default().round_ties_even() as i64,
    };

    Ok(CurrentConditions { weather, coords, utc_offset_secs })
}

/// First [`FORECAST_SLOTS`] entries in upstream order; entries without a time or temperature are dropped.
fn normalize_short_term(parsed: OwForecastResponse, utc_offset_secs: i32) -> Vec<ForecastSlot> {
    parsed
        .list
        .into_iter()
        .take(FORECAST_SLOTS)
        .filter_map(|raw| {
            let entry: OwForecastEntry = parse_entry(raw, SHORT_TERM)?;
            let dt = entry.dt?;
            let temp = entry.main.and_then(|m| m.temp)?;
            let icon = entry.weather.into_iter().next().and_then(|w| w.icon).unwrap_or_default();

            Some(ForecastSlot {
                time: local_time(dt, utc_offset_secs, TimePattern::Hour),
                temp: temp.round_ties_even() as i64,
                icon,
            })
        })
        .collect()
}

fn normalize_air(parsed: OwAirResponse) -> Option<AirQuality> {
    let first: OwAirEntry = parse_entry(parsed.list.into_iter().next()?, AIR_QUALITY)?;
    let index = first.main.and_then(|m| m.aqi)?;
    let components = first.components.unwrap_or_default();

    let pollutants = Pollutants {
        co: concentration(components.co),
        no2: concentration(components.no2),
        o3: concentration(components.o3),
        pm10: concentration(components.pm10),
    };

    Some(AirQuality::new(index, pollutants))
}

fn concentration(value: Option<f64>) -> i64 {
    value.unwrap_or_default().max(0.0).round_ties_even() as i64
}
