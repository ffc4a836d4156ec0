use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the pollution CSV. A blank measurement cell loads as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionRecord {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Date", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "AQI", deserialize_with = "deserialize_aqi")]
    pub aqi: u32,
    #[serde(rename = "PM2.5", deserialize_with = "deserialize_measurement")]
    pub pm25: f64,
    #[serde(rename = "PM10", deserialize_with = "deserialize_measurement")]
    pub pm10: f64,
    #[serde(rename = "NO2", deserialize_with = "deserialize_measurement")]
    pub no2: f64,
    #[serde(rename = "SO2", deserialize_with = "deserialize_measurement")]
    pub so2: f64,
    #[serde(rename = "Temperature", deserialize_with = "deserialize_measurement")]
    pub temperature: f64,
    #[serde(rename = "Humidity", deserialize_with = "deserialize_measurement")]
    pub humidity: f64,
    #[serde(rename = "Latitude", alias = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", alias = "lon", default)]
    pub longitude: Option<f64>,
}

impl PollutionRecord {
    pub fn pollutant(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Aqi => f64::from(self.aqi),
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
        }
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

fn deserialize_measurement<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_measurement(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid number '{raw}'")))
}

fn deserialize_aqi<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_aqi(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid AQI '{raw}'")))
}

/// Blank cells become `NaN`; anything else must parse as a float.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse().ok()
}

/// Whole numbers, including float spellings such as `55.0`.
pub fn parse_aqi(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(aqi) = raw.parse::<u32>() {
        return Some(aqi);
    }
    let value = raw.parse::<f64>().ok()?;
    let integral = value.is_finite() && value.fract() == 0.0;
    (integral && (0.0..=f64::from(u32::MAX)).contains(&value)).then_some(value as u32)
}

/// Accepts plain dates and timestamps; timestamps keep only their calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
}

/// The loaded table. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<PollutionRecord>,
    /// Whether the source header carried the coordinate columns.
    pub has_coordinates: bool,
}

impl Dataset {
    pub fn new(records: Vec<PollutionRecord>, has_coordinates: bool) -> Self {
        Self {
            records,
            has_coordinates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Unique city names in order of first appearance.
    pub fn cities(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.city) {
                seen.push(record.city.clone());
            }
        }
        seen
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn aqi_bounds(&self) -> Option<(u32, u32)> {
        let min = self.records.iter().map(|r| r.aqi).min()?;
        let max = self.records.iter().map(|r| r.aqi).max()?;
        Some((min, max))
    }

    /// Column headers in export order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = BASE_COLUMNS.to_vec();
        if self.has_coordinates {
            columns.extend(COORDINATE_COLUMNS);
        }
        columns
    }
}

pub const BASE_COLUMNS: [&str; 9] = [
    "City",
    "Date",
    "AQI",
    "PM2.5",
    "PM10",
    "NO2",
    "SO2",
    "Temperature",
    "Humidity",
];

pub const COORDINATE_COLUMNS: [&str; 2] = ["Latitude", "Longitude"];

/// Pollutant choices for the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pollutant {
    #[default]
    #[serde(rename = "AQI")]
    Aqi,
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO2")]
    So2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Aqi,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Aqi => "AQI",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
        }
    }
}

/// AQI severity bands. Each band is closed on its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiBand {
    Good,
    Moderate,
    Poor,
    Unhealthy,
    Hazardous,
}

impl AqiBand {
    pub fn classify(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiBand::Good
        } else if aqi <= 100.0 {
            AqiBand::Moderate
        } else if aqi <= 200.0 {
            AqiBand::Poor
        } else if aqi <= 300.0 {
            AqiBand::Unhealthy
        } else {
            AqiBand::Hazardous
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::Poor => "Poor",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::Hazardous => "Hazardous",
        }
    }

    /// Background and text color for table cells.
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            AqiBand::Good => ("#00e400", "black"),
            AqiBand::Moderate => ("#ffff00", "black"),
            AqiBand::Poor => ("#ff7e00", "black"),
            AqiBand::Unhealthy => ("#ff0000", "white"),
            AqiBand::Hazardous => ("#7e0023", "white"),
        }
    }

    /// Indicator tone for the status metric.
    pub fn tone(self) -> &'static str {
        match self {
            AqiBand::Good => "normal",
            AqiBand::Moderate => "off",
            _ => "inverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    Warning,
    Info,
}

/// A one-line message for the status area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_upper_bounds_are_inclusive() {
        assert_eq!(AqiBand::classify(0.0), AqiBand::Good);
        assert_eq!(AqiBand::classify(50.0), AqiBand::Good);
        assert_eq!(AqiBand::classify(50.01), AqiBand::Moderate);
        assert_eq!(AqiBand::classify(100.0), AqiBand::Moderate);
        assert_eq!(AqiBand::classify(100.5), AqiBand::Poor);
        assert_eq!(AqiBand::classify(200.0), AqiBand::Poor);
        assert_eq!(AqiBand::classify(300.0), AqiBand::Unhealthy);
        assert_eq!(AqiBand::classify(300.1), AqiBand::Hazardous);
        assert_eq!(AqiBand::classify(9_999.0), AqiBand::Hazardous);
    }

    #[test]
    fn parse_date_drops_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("2024-03-09 17:45:00"), Some(expected));
        assert_eq!(parse_date("2024-03-09T08:00:00"), Some(expected));
        assert_eq!(parse_date("09/03/2024"), None);
    }

    #[test]
    fn blank_measurements_become_nan() {
        assert!(parse_measurement("").unwrap().is_nan());
        assert!(parse_measurement("   ").unwrap().is_nan());
        assert_eq!(parse_measurement("12.5"), Some(12.5));
        assert_eq!(parse_measurement("n/a"), None);
    }

    #[test]
    fn aqi_accepts_integral_float_text() {
        assert_eq!(parse_aqi("55"), Some(55));
        assert_eq!(parse_aqi("55.0"), Some(55));
        assert_eq!(parse_aqi(" 120.00 "), Some(120));
        assert_eq!(parse_aqi("55.5"), None);
        assert_eq!(parse_aqi("-3"), None);
        assert_eq!(parse_aqi(""), None);
    }

    #[test]
    fn cities_keep_first_appearance_order() {
        let record = |city: &str| PollutionRecord {
            city: city.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            aqi: 10,
            pm25: 1.0,
            pm10: 1.0,
            no2: 1.0,
            so2: 1.0,
            temperature: 20.0,
            humidity: 40.0,
            latitude: None,
            longitude: None,
        };
        let dataset = Dataset::new(vec![record("Oslo"), record("Lima"), record("Oslo")], false);
        assert_eq!(dataset.cities(), vec!["Oslo", "Lima"]);
        assert_eq!(dataset.columns().len(), 9);
    }

    #[test]
    fn pollutant_names_match_column_headers() {
        let names: Vec<_> = Pollutant::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(names, vec!["AQI", "PM2.5", "PM10", "NO2", "SO2"]);
        let parsed: Pollutant = serde_json::from_str("\"PM2.5\"").unwrap();
        assert_eq!(parsed, Pollutant::Pm25);
    }
}
