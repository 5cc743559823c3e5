//! WMO weather interpretation codes as reported by Open-Meteo.

use std::borrow::Cow;

const WEATHER_CODES: &[(i64, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snow fall"),
    (73, "Moderate snow fall"),
    (75, "Heavy snow fall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Known description for `code`, if any.
pub fn lookup(code: i64) -> Option<&'static str> {
    WEATHER_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

/// Human-readable description, falling back to `Code <n>` (or `Code ?` when
/// the provider omitted the code).
pub fn describe(code: Option<i64>) -> Cow<'static, str> {
    match code {
        Some(c) => match lookup(c) {
            Some(desc) => Cow::Borrowed(desc),
            None => Cow::Owned(format!("Code {c}")),
        },
        None => Cow::Borrowed("Code ?"),
    }
}
