//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Upstream clients and the normalizers that turn their JSON into records
//! - The advisory tip rules
//! - The per-query aggregator that assembles the view model
//!
//! It is used by `dashboard-cli`, but any presentation layer can call
//! [`Dashboard::lookup`] with a city name and render the returned [`ViewModel`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod tips;

pub use aggregate::Dashboard;
pub use config::{Config, Endpoints};
pub use error::UpstreamError;
pub use model::{AirQuality, DailyForecast, ForecastSlot, ViewModel, Weather};
pub use provider::{Coordinates, CurrentConditions, WeatherSource};
