//! Per-query orchestration of the upstream calls.

use tracing::{debug, info, instrument, warn};

use crate::{
    Config,
    error::UpstreamError,
    model::ViewModel,
    provider::{CurrentConditions, WeatherSource, source_from_config},
    tips::build_tips,
};

/// Turns a city name into a [`ViewModel`].
///
/// Only the current-conditions call can fail the query. The coordinate
/// lookups run concurrently once it succeeds and each degrades on its own.
#[derive(Debug)]
pub struct Dashboard {
    source: Box<dyn WeatherSource>,
}

impl Dashboard {
    pub fn new(source: Box<dyn WeatherSource>) -> Self {
        Self { source }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(source_from_config(config)?))
    }

    #[instrument(skip(self))]
    pub async fn lookup(&self, city: &str) -> ViewModel {
        let city = city.trim();
        if city.is_empty() {
            return ViewModel::default();
        }

        let CurrentConditions { weather, coords, utc_offset_secs } =
            match self.source.current(city).await {
                Ok(current) => current,
                Err(err) => {
                    warn!(error = %err, timed_out = err.is_timeout(), "Current conditions unavailable");
                    return ViewModel::failed();
                }
            };

        let (forecast, air, seven_day) = match coords {
            Some(coords) => {
                let (forecast, air, seven_day) = tokio::join!(
                    self.source.short_term(coords, utc_offset_secs),
                    self.source.air_quality(coords),
                    self.source.seven_day(coords),
                );
                (degrade(forecast), degrade(air), degrade(seven_day))
            }
            None => {
                debug!("No coordinates, skipping forecast and air quality");
                Default::default()
            }
        };

        let tips = build_tips(&weather, air.as_ref());

        info!(
            city = %weather.city,
            slots = forecast.len(),
            air = air.is_some(),
            days = seven_day.len(),
            tips = tips.len(),
            "Lookup complete"
        );

        ViewModel { weather: Some(weather), forecast, air, seven_day, tips, error: None }
    }
}

fn degrade<T: Default>(result: Result<T, UpstreamError>) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, timed_out = err.is_timeout(), "Upstream component unavailable");
        T::default()
    })
}
