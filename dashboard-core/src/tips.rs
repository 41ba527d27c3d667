//! Rule-based advisory tips derived from the current conditions.

use crate::model::{AirQuality, Weather};

/// Dashboard shows at most this many tip cards.
pub const MAX_TIPS: usize = 6;

/// Evaluate the threshold rules in order, then dedupe and cap at [`MAX_TIPS`].
///
/// Only the heat/cold pair is exclusive; every other rule fires independently.
/// The two informational tips go last, so they are the first to be cut when
/// more than four rules fire.
pub fn build_tips(weather: &Weather, air: Option<&AirQuality>) -> Vec<String> {
    let mut tips: Vec<String> = Vec::new();

    if weather.temp >= 35.0 {
        tips.push("High heat: avoid direct sun in afternoon.".into());
    } else if weather.temp <= 8.0 {
        tips.push("Cold weather: keep yourself warm outdoors.".into());
    }

    if weather.humidity >= 75 {
        tips.push("Humidity is high: stay hydrated.".into());
    }

    if weather.wind >= 25.0 {
        tips.push("Winds are strong: secure loose outdoor items.".into());
    }

    if weather.visibility <= 3.0 {
        tips.push("Low visibility: drive carefully.".into());
    }

    if air.is_some_and(|a| a.index >= 4) {
        tips.push("Air quality is poor: mask is recommended outside.".into());
    }

    if weather.clouds >= 70 {
        tips.push("Cloud cover is dense: sunlight may stay limited.".into());
    }

    let description = weather.description.to_lowercase();
    if description.contains("rain") || description.contains("drizzle") {
        tips.push("Rain likely: keep an umbrella with you.".into());
    }

    tips.push(format!("Cloud cover: {}%", weather.clouds));
    tips.push(format!("Pressure: {} hPa", weather.pressure));

    let mut unique: Vec<String> = Vec::with_capacity(tips.len());
    for tip in tips {
        if !unique.contains(&tip) {
            unique.push(tip);
        }
    }
    unique.truncate(MAX_TIPS);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pollutants;

    fn weather() -> Weather {
        Weather {
            city: "Lisbon".into(),
            temp: 20.0,
            temp_max: 22.0,
            temp_min: 18.0,
            feels_like: 20.0,
            humidity: 50,
            description: "Clear Sky".into(),
            icon: "01d".into(),
            wind: 10.0,
            visibility: 10.0,
            sunrise: "07:01 AM".into(),
            sunset: "06:40 PM".into(),
            clouds: 20,
            pressure: 1012,
        }
    }

    #[test]
    fn heat_warning_with_informational_tips() {
        let w = Weather { temp: 36.0, ..weather() };
        assert_eq!(
            build_tips(&w, None),
            vec![
                "High heat: avoid direct sun in afternoon.",
                "Cloud cover: 20%",
                "Pressure: 1012 hPa",
            ]
        );
    }

    #[test]
    fn mild_day_only_gets_informational_tips() {
        assert_eq!(build_tips(&weather(), None), vec!["Cloud cover: 20%", "Pressure: 1012 hPa"]);
    }

    #[test]
    fn cap_drops_umbrella_and_informational_tips() {
        let w = Weather {
            temp: 5.0,
            humidity: 80,
            wind: 30.0,
            visibility: 2.0,
            clouds: 90,
            description: "Moderate Rain".into(),
            ..weather()
        };
        let air = AirQuality::new(5, Pollutants::default());

        assert_eq!(
            build_tips(&w, Some(&air)),
            vec![
                "Cold weather: keep yourself warm outdoors.",
                "Humidity is high: stay hydrated.",
                "Winds are strong: secure loose outdoor items.",
                "Low visibility: drive carefully.",
                "Air quality is poor: mask is recommended outside.",
                "Cloud cover is dense: sunlight may stay limited.",
            ]
        );
    }

    #[test]
    fn thresholds_are_inclusive() {
        let w = Weather {
            temp: 8.0,
            humidity: 75,
            wind: 25.0,
            visibility: 3.0,
            clouds: 70,
            ..weather()
        };
        let tips = build_tips(&w, None);
        assert_eq!(tips.len(), MAX_TIPS);
        assert_eq!(tips[0], "Cold weather: keep yourself warm outdoors.");
        assert_eq!(tips[4], "Cloud cover is dense: sunlight may stay limited.");
        assert_eq!(tips[5], "Cloud cover: 70%");
    }

    #[test]
    fn moderate_air_does_not_recommend_mask() {
        let air = AirQuality::new(3, Pollutants::default());
        let tips = build_tips(&weather(), Some(&air));
        assert!(!tips.iter().any(|t| t.contains("mask")));
    }

    #[test]
    fn drizzle_matches_case_insensitively() {
        let w = Weather { description: "Light DRIZZLE".into(), ..weather() };
        let tips = build_tips(&w, None);
        assert_eq!(tips[0], "Rain likely: keep an umbrella with you.");
    }

    #[test]
    fn output_is_unique_and_bounded() {
        for temp in [-5.0, 20.0, 40.0] {
            for humidity in [10, 90] {
                for clouds in [0, 100] {
                    let w = Weather { temp, humidity, clouds, description: "rain".into(), ..weather() };
                    let tips = build_tips(&w, None);
                    assert!(tips.len() <= MAX_TIPS);
                    let mut seen = tips.clone();
                    seen.sort();
                    seen.dedup();
                    assert_eq!(seen.len(), tips.len());
                }
            }
        }
    }
}
