use serde::{Serialize, Serializer};

/// Placeholder shown when a daily temperature is missing upstream.
pub const NO_DATA: &str = "--";

/// User-facing message for a failed current-conditions lookup.
pub const LOOKUP_FAILED: &str = "City not found or weather service unavailable. Try again!";

/// Current conditions for the queried city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub city: String,
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub description: String,
    pub icon: String,
    /// km/h
    pub wind: f64,
    /// km
    pub visibility: f64,
    pub sunrise: String,
    pub sunset: String,
    pub clouds: i64,
    pub pressure: i64,
}

/// One 3-hourly step of the short-term forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastSlot {
    pub time: String,
    pub temp: i64,
    pub icon: String,
}

/// Pollutant concentrations in μg/m³, rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pollutants {
    pub co: i64,
    pub no2: i64,
    pub o3: i64,
    pub pm10: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQuality {
    pub index: i64,
    pub status: &'static str,
    pub note: &'static str,
    /// Gauge position in percent, kept inside [2, 98] so the marker stays visible.
    pub marker: f64,
    #[serde(flatten)]
    pub pollutants: Pollutants,
}

impl AirQuality {
    pub fn new(index: i64, pollutants: Pollutants) -> Self {
        let (status, note) = aqi_meta(index);
        Self { index, status, note, marker: gauge_marker(index), pollutants }
    }
}

/// Status label and advisory note for an AQI bucket.
pub fn aqi_meta(index: i64) -> (&'static str, &'static str) {
    match index {
        1 => ("Good", "Air quality is satisfactory for most people."),
        2 => ("Fair", "Sensitive people may feel minor discomfort."),
        3 => ("Moderate", "Sensitive groups should reduce prolonged exposure."),
        4 => ("Poor", "Health effects possible for everyone with longer exposure."),
        5 => ("Very Poor", "Serious health effects possible. Limit outdoor time."),
        _ => ("Unknown", "AQI data unavailable."),
    }
}

/// Linear map of index 1..=5 onto 0..=100, clamped to [2, 98].
pub fn gauge_marker(index: i64) -> f64 {
    let position = (index as f64 - 1.0) / 4.0 * 100.0;
    position.clamp(2.0, 98.0)
}

/// One day of the multi-day outlook. Every field is filled independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyForecast {
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub weekday: String,
    pub display_date: String,
    pub weather: &'static str,
    #[serde(serialize_with = "or_no_data")]
    pub high: Option<i64>,
    #[serde(serialize_with = "or_no_data")]
    pub low: Option<i64>,
    pub rain: i64,
    pub wind: i64,
}

impl DailyForecast {
    pub fn high_label(&self) -> String {
        label_or_no_data(self.high)
    }

    pub fn low_label(&self) -> String {
        label_or_no_data(self.low)
    }
}

fn label_or_no_data(value: Option<i64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.to_string())
}

fn or_no_data<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_i64(*v),
        None => serializer.serialize_str(NO_DATA),
    }
}

/// Everything the presentation layer needs for one city query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub weather: Option<Weather>,
    pub forecast: Vec<ForecastSlot>,
    pub air: Option<AirQuality>,
    pub seven_day: Vec<DailyForecast>,
    pub tips: Vec<String>,
    pub error: Option<String>,
}

impl ViewModel {
    /// View model for a query whose current-conditions call failed.
    pub fn failed() -> Self {
        Self { error: Some(LOOKUP_FAILED.to_string()), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_meta_covers_known_buckets() {
        assert_eq!(aqi_meta(1).0, "Good");
        assert_eq!(aqi_meta(3).0, "Moderate");
        assert_eq!(aqi_meta(5), ("Very Poor", "Serious health effects possible. Limit outdoor time."));
    }

    #[test]
    fn aqi_meta_falls_back_outside_range() {
        for index in [-3, 0, 6, 42, i64::MAX] {
            assert_eq!(aqi_meta(index), ("Unknown", "AQI data unavailable."));
        }
    }

    #[test]
    fn gauge_marker_is_monotonic_and_clamped() {
        let markers: Vec<f64> = (1..=5).map(gauge_marker).collect();
        assert_eq!(markers, vec![2.0, 25.0, 50.0, 75.0, 98.0]);
        assert!(markers.windows(2).all(|w| w[0] <= w[1]));

        for index in [-10, 0, 9, 1_000] {
            let marker = gauge_marker(index);
            assert!((2.0..=98.0).contains(&marker), "index {index} gave {marker}");
        }
    }

    #[test]
    fn air_quality_new_fills_lookup_fields() {
        let air = AirQuality::new(4, Pollutants { co: 201, no2: 3, o3: 68, pm10: 12 });
        assert_eq!(air.status, "Poor");
        assert_eq!(air.marker, 75.0);
        assert_eq!(air.pollutants.co, 201);
    }

    #[test]
    fn missing_daily_temperatures_serialize_as_sentinel() {
        let day = DailyForecast {
            date: "2026-10-18".into(),
            weekday: "Sun".into(),
            display_date: "18 Oct".into(),
            weather: "Overcast",
            high: None,
            low: Some(4),
            rain: 0,
            wind: 0,
        };

        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["high"], "--");
        assert_eq!(json["low"], 4);
        assert_eq!(day.high_label(), "--");
        assert_eq!(day.low_label(), "4");
    }

    #[test]
    fn failed_view_model_is_empty_apart_from_error() {
        let vm = ViewModel::failed();
        assert!(vm.weather.is_none());
        assert!(vm.forecast.is_empty());
        assert!(vm.air.is_none());
        assert!(vm.seven_day.is_empty());
        assert!(vm.tips.is_empty());
        assert_eq!(vm.error.as_deref(), Some(LOOKUP_FAILED));
    }
}
