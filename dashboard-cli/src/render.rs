//! Plain-text rendering of a [`ViewModel`].

use chrono::{DateTime, TimeZone};
use dashboard_core::ViewModel;

const GAUGE_WIDTH: usize = 40;

pub fn dashboard<Tz>(vm: &ViewModel, fetched_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(w) = &vm.weather else {
        return "Enter a city to see its weather.\n".to_string();
    };

    let mut out = format!("{} - {}\n", w.city, w.description);
    out.push_str(&format!(
        "  {:.1}°C (feels like {:.1}°C), high {:.1}°C / low {:.1}°C\n",
        w.temp, w.feels_like, w.temp_max, w.temp_min
    ));
    out.push_str(&format!(
        "  Humidity {}%  Wind {:.1} km/h  Visibility {:.1} km\n",
        w.humidity, w.wind, w.visibility
    ));
    out.push_str(&format!("  Sunrise {}  Sunset {}\n", w.sunrise, w.sunset));

    if !vm.forecast.is_empty() {
        out.push_str("\nNext hours\n ");
        for slot in &vm.forecast {
            out.push_str(&format!(" {:>5} {:>3}°", slot.time, slot.temp));
        }
        out.push('\n');
    }

    if let Some(air) = &vm.air {
        out.push_str(&format!("\nAir quality: {} (AQI {})\n", air.status, air.index));
        out.push_str(&format!("  {}\n", air.note));
        out.push_str(&format!("  [{}]\n", gauge(air.marker)));
        let p = &air.pollutants;
        out.push_str(&format!(
            "  CO {}  NO2 {}  O3 {}  PM10 {} μg/m³\n",
            p.co, p.no2, p.o3, p.pm10
        ));
    }

    if !vm.seven_day.is_empty() {
        out.push_str("\n7-day outlook\n");
        for day in &vm.seven_day {
            out.push_str(&format!(
                "  {} {:<7} {:<22} {:>3}/{:<3} rain {:>3}%  wind {:>3} km/h\n",
                day.weekday,
                day.display_date,
                day.weather,
                day.high_label(),
                day.low_label(),
                day.rain,
                day.wind
            ));
        }
    }

    if !vm.tips.is_empty() {
        out.push_str("\nTips\n");
        for tip in &vm.tips {
            out.push_str(&format!("  - {tip}\n"));
        }
    }

    out.push_str(&format!("\nFetched {}\n", fetched_at.format("%Y-%m-%d %H:%M")));
    out
}

fn gauge(marker: f64) -> String {
    let pos = ((marker / 100.0) * (GAUGE_WIDTH - 1) as f64).round() as usize;
    (0..GAUGE_WIDTH).map(|i| if i == pos { '|' } else { '-' }).collect()
}
