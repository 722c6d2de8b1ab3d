//! Plain-text rendering of the dashboard.

use std::fmt::Write;

use dashboard_core::{CanonicalWeather, Notice, NoticeKind, SearchLocation, WeatherTheme};

pub fn notice(notice: &Notice) -> String {
    let marker = match notice.kind {
        NoticeKind::Success => "✓",
        NoticeKind::Info => "·",
        NoticeKind::Error => "✗",
    };

    let mut out = format!("{marker} {}: {}", notice.title, notice.description);
    if let Some(cause) = &notice.cause {
        let _ = write!(out, "\n  {cause}");
    }
    out
}

pub fn search_result(place: &SearchLocation) -> String {
    format!("{} ({})", place.label(), place.coordinate)
}

pub fn weather(weather: &CanonicalWeather, theme: WeatherTheme, hourly: bool) -> String {
    let mut out = String::new();
    let current = &weather.current;

    let _ = writeln!(
        out,
        "{}, {}  [{}]",
        weather.location.name, weather.location.country, theme
    );
    let _ = writeln!(
        out,
        "{}°C (feels like {}°C), {}",
        current.temp, current.feels_like, current.description
    );
    let _ = writeln!(
        out,
        "Humidity {}%  Pressure {} hPa  Wind {} km/h @ {}°  Visibility {} km",
        current.humidity,
        current.pressure,
        current.wind_speed,
        current.wind_direction,
        current.visibility
    );
    let _ = writeln!(
        out,
        "Sunrise {}  Sunset {}",
        weather.astronomy.sunrise, weather.astronomy.sunset
    );

    if let Some(air) = &weather.air_quality {
        let _ = writeln!(
            out,
            "Air quality: {} (AQI {})  PM2.5 {:.1}  PM10 {:.1}  O3 {:.1}  NO2 {:.1}  CO {:.1}",
            air.level().label(),
            air.aqi,
            air.pm2_5,
            air.pm10,
            air.o3,
            air.no2,
            air.co
        );
    }

    if !weather.forecast.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Forecast");
    }
    for day in &weather.forecast {
        let _ = write!(
            out,
            "  {}  {:>3}° / {:>3}°  {:<12} rain {:>3}%",
            day.date.format("%a %d %b"),
            day.day.max_temp,
            day.day.min_temp,
            day.day.condition,
            day.day.chance_of_rain
        );
        if day.day.chance_of_snow > 0 {
            let _ = write!(out, "  snow {}%", day.day.chance_of_snow);
        }
        let _ = writeln!(out);

        if hourly {
            for hour in &day.hours {
                let _ = writeln!(
                    out,
                    "      {} UTC  {:>3}°  {:<12} rain {:>3}%",
                    hour.time.format("%H:%M"),
                    hour.temp,
                    hour.condition,
                    hour.chance_of_rain
                );
            }
        }
    }

    out
}
