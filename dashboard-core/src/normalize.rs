//! Turns the three raw provider payloads into a [`CanonicalWeather`].

use std::{collections::BTreeMap, ops::RangeInclusive};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};

use crate::{
    error::NormalizationError,
    model::{
        AirQuality, Astronomy, CanonicalWeather, Coordinate, CurrentConditions, DaySummary,
        ForecastDay, HourlyForecast, LocationInfo,
    },
    raw::{RawAirQuality, RawCurrentConditions, RawForecast, RawForecastEntry},
};

pub const MAX_FORECAST_DAYS: usize = 5;

const DEFAULT_VISIBILITY_M: f64 = 10_000.0;
const MPS_TO_KMH: f64 = 3.6;

/// Local hours that count as "around noon" when picking a day's headline sample.
const NOON_HOURS: RangeInclusive<u32> = 11..=13;

/// Merge current conditions, forecast and (optionally) air quality into one view.
///
/// `now` decides day or night against the provider's sunrise/sunset instants.
pub fn normalize(
    current: &RawCurrentConditions,
    forecast: &RawForecast,
    air_quality: Option<&RawAirQuality>,
    now: DateTime<Utc>,
) -> Result<CanonicalWeather, NormalizationError> {
    let sunrise = timestamp(current.sunrise()?)?;
    let sunset = timestamp(current.sunset()?)?;
    let is_day = is_daytime(now, sunrise, sunset);
    let offset = location_offset(forecast.timezone().or(current.timezone));

    let coord = current.coord()?;
    let name = current
        .name
        .clone()
        .or_else(|| forecast.city.as_ref().and_then(|c| c.name.clone()))
        .ok_or(NormalizationError::MissingField("name"))?;

    let location = LocationInfo {
        name,
        country: current.country().to_string(),
        coordinate: Coordinate::new(coord.lat, coord.lon),
    };

    let main = current.main()?;
    let wind = current.wind()?;
    let condition = current.condition()?;

    let current_conditions = CurrentConditions {
        temp: round_temp(main.temp),
        feels_like: round_temp(main.feels_like),
        humidity: round_half_up(main.humidity).clamp(0.0, 100.0) as u8,
        pressure: round_half_up(main.pressure).max(0.0) as u32,
        wind_speed: wind_speed_kmh(wind.speed),
        wind_direction: round_half_up(wind.deg.unwrap_or(0.0)).rem_euclid(360.0) as u16,
        visibility: visibility_km(current.visibility),
        uv_index: 0,
        condition: condition.main.clone(),
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        is_day,
    };

    let air_quality = air_quality
        .and_then(|aq| aq.list.first())
        .map(|sample| AirQuality {
            aqi: sample.main.aqi,
            co: sample.components.co,
            no2: sample.components.no2,
            o3: sample.components.o3,
            pm2_5: sample.components.pm2_5,
            pm10: sample.components.pm10,
        });

    let astronomy = Astronomy {
        sunrise: local_clock(sunrise, offset),
        sunset: local_clock(sunset, offset),
    };

    Ok(CanonicalWeather {
        location,
        current: current_conditions,
        air_quality,
        astronomy,
        forecast: daily_forecast(&forecast.list, offset)?,
    })
}

/// Inclusive on both ends.
pub fn is_daytime(now: DateTime<Utc>, sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> bool {
    sunrise <= now && now <= sunset
}

/// m/s to whole km/h.
pub fn wind_speed_kmh(mps: f64) -> i32 {
    round_half_up(mps * MPS_TO_KMH) as i32
}

/// Meters to whole kilometers; an unreported visibility counts as 10 km.
pub fn visibility_km(meters: Option<f64>) -> i32 {
    round_half_up(meters.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0) as i32
}

pub fn round_temp(celsius: f64) -> i32 {
    round_half_up(celsius) as i32
}

/// Provider fraction (0..=1) to a whole percentage; absent means 0.
pub fn probability_percent(pop: Option<f64>) -> u8 {
    round_half_up(pop.unwrap_or(0.0) * 100.0).clamp(0.0, 100.0) as u8
}

// Halves round toward positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, NormalizationError> {
    DateTime::from_timestamp(secs, 0).ok_or(NormalizationError::InvalidTimestamp(secs))
}

fn location_offset(shift_secs: Option<i32>) -> FixedOffset {
    shift_secs
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn local_clock(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format("%H:%M").to_string()
}

type Sample<'a> = (DateTime<Utc>, &'a RawForecastEntry);

fn daily_forecast(
    samples: &[RawForecastEntry],
    offset: FixedOffset,
) -> Result<Vec<ForecastDay>, NormalizationError> {
    let mut days: BTreeMap<NaiveDate, Vec<Sample<'_>>> = BTreeMap::new();
    for sample in samples {
        let at = timestamp(sample.dt)?;
        days.entry(at.date_naive()).or_default().push((at, sample));
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, mut samples)| {
            samples.sort_by_key(|(at, _)| *at);
            summarize_day(date, &samples, offset)
        })
        .collect()
}

fn summarize_day(
    date: NaiveDate,
    samples: &[Sample<'_>],
    offset: FixedOffset,
) -> Result<ForecastDay, NormalizationError> {
    let (min, max) = samples.iter().try_fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), (_, sample)| {
            let temp = sample.temp()?;
            Ok::<_, NormalizationError>((lo.min(temp), hi.max(temp)))
        },
    )?;

    let (_, headline) =
        representative_sample(samples, offset).ok_or(NormalizationError::MissingField("list"))?;
    let condition = headline.condition()?;
    let chance_of_rain = probability_percent(headline.pop);
    let chance_of_snow = if condition.main.eq_ignore_ascii_case("snow") {
        chance_of_rain
    } else {
        0
    };

    let hours = samples
        .iter()
        .map(|(at, sample)| hourly(*at, sample))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForecastDay {
        date,
        day: DaySummary {
            max_temp: round_temp(max),
            min_temp: round_temp(min),
            condition: condition.main.clone(),
            icon: condition.icon.clone(),
            chance_of_rain,
            chance_of_snow,
        },
        hours,
    })
}

/// First sample (chronologically) whose local hour is around noon, else the first one.
fn representative_sample<'s, 'a>(
    samples: &'s [Sample<'a>],
    offset: FixedOffset,
) -> Option<&'s Sample<'a>> {
    samples
        .iter()
        .find(|(at, _)| NOON_HOURS.contains(&at.with_timezone(&offset).hour()))
        .or_else(|| samples.first())
}

fn hourly(at: DateTime<Utc>, sample: &RawForecastEntry) -> Result<HourlyForecast, NormalizationError> {
    let condition = sample.condition()?;
    Ok(HourlyForecast {
        time: at,
        temp: round_temp(sample.temp()?),
        condition: condition.main.clone(),
        icon: condition.icon.clone(),
        chance_of_rain: probability_percent(sample.pop),
    })
}
