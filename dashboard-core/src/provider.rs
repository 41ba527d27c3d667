use crate::{
    Config,
    error::{UpstreamError, truncate_body},
    model::{AirQuality, DailyForecast, ForecastSlot, Weather},
    provider::{openmeteo::OpenMeteoClient, openweather::OpenWeatherClient},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

pub mod openmeteo;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Normalized current conditions plus what the coordinate lookups need.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub weather: Weather,
    /// `None` disables the coordinate-based lookups for this query.
    pub coords: Option<Coordinates>,
    pub utc_offset_secs: i32,
}

/// Everything the aggregator needs from upstream, one method per endpoint.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<CurrentConditions, UpstreamError>;

    async fn short_term(
        &self,
        coords: Coordinates,
        utc_offset_secs: i32,
    ) -> Result<Vec<ForecastSlot>, UpstreamError>;

    /// `Ok(None)` when upstream answered but had no usable reading.
    async fn air_quality(&self, coords: Coordinates) -> Result<Option<AirQuality>, UpstreamError>;

    async fn seven_day(&self, coords: Coordinates) -> Result<Vec<DailyForecast>, UpstreamError>;
}

/// Production source: OpenWeather for current/short-term/air, Open-Meteo for the daily outlook.
#[derive(Debug, Clone)]
pub struct HttpWeatherSource {
    openweather: OpenWeatherClient,
    open_meteo: OpenMeteoClient,
}

impl HttpWeatherSource {
    pub fn new(openweather: OpenWeatherClient, open_meteo: OpenMeteoClient) -> Self {
        Self { openweather, open_meteo }
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn current(&self, city: &str) -> Result<CurrentConditions, UpstreamError> {
        self.openweather.fetch_current(city).await
    }

    async fn short_term(
        &self,
        coords: Coordinates,
        utc_offset_secs: i32,
    ) -> Result<Vec<ForecastSlot>, UpstreamError> {
        self.openweather.fetch_short_term(coords, utc_offset_secs).await
    }

    async fn air_quality(&self, coords: Coordinates) -> Result<Option<AirQuality>, UpstreamError> {
        self.openweather.fetch_air_quality(coords).await
    }

    async fn seven_day(&self, coords: Coordinates) -> Result<Vec<DailyForecast>, UpstreamError> {
        self.open_meteo.fetch_seven_day(coords).await
    }
}

/// Construct the HTTP-backed source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.require_api_key()?;
    let http = Client::builder()
        .timeout(config.timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let openweather = OpenWeatherClient::new(api_key.to_owned(), &config.endpoints, http.clone());
    let open_meteo = OpenMeteoClient::new(config.endpoints.seven_day_url.clone(), http);

    Ok(Box::new(HttpWeatherSource::new(openweather, open_meteo)))
}

/// Single guarded GET: one attempt, non-2xx is a rejection, body parsed as `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    endpoint: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, UpstreamError> {
    debug!(endpoint, url, "Sending upstream request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| UpstreamError::transport(endpoint, e))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| UpstreamError::transport(endpoint, e))?;

    if !status.is_success() {
        return Err(UpstreamError::Rejected { endpoint, status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::malformed(endpoint, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn source_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(source_from_config(&cfg).is_ok());
    }
}
