//! Chart descriptions handed to the page for drawing.
//!
//! Every builder is a pure function of the filtered rows. Values are passed
//! through as-is: ties, duplicate dates and unordered rows are not adjusted.

use crate::models::{Dataset, Pollutant};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Qualitative cycle assigned to cities by first appearance.
pub const CITY_PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

/// Red-yellow-green, reversed so that low values are green.
const RD_YL_GN_R: [(u8, u8, u8); 11] = [
    (0x00, 0x68, 0x37),
    (0x1a, 0x98, 0x50),
    (0x66, 0xbd, 0x63),
    (0xa6, 0xd9, 0x6a),
    (0xd9, 0xef, 0x8b),
    (0xff, 0xff, 0xbf),
    (0xfe, 0xe0, 0x8b),
    (0xfd, 0xae, 0x61),
    (0xf4, 0x6d, 0x43),
    (0xd7, 0x30, 0x27),
    (0xa5, 0x00, 0x26),
];

pub const SCATTER_MIN_DIAMETER: f64 = 2.0;
pub const SCATTER_MAX_DIAMETER: f64 = 20.0;
pub const MAP_MARKER_COLOR: &str = "#FF0000";
pub const MAP_MARKER_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub city: String,
    pub avg_aqi: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub bars: Vec<BarPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub city: String,
    pub temperature: f64,
    pub pm25: f64,
    pub aqi: u32,
    pub humidity: f64,
    pub color: &'static str,
    pub diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: &'static str,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub city: String,
    pub color: &'static str,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub pollutant: Pollutant,
    pub markers: bool,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub aqi: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapChart {
    pub color: &'static str,
    pub size: u32,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub bar: BarChart,
    pub scatter: ScatterChart,
    pub line: LineChart,
    pub map: Option<MapChart>,
}

pub fn build_charts(filtered: &Dataset, pollutant: Pollutant) -> Charts {
    Charts {
        bar: bar_chart(filtered),
        scatter: scatter_chart(filtered),
        line: line_chart(filtered, pollutant),
        map: map_chart(filtered),
    }
}

/// Mean AQI per city, cities in name order.
pub fn bar_chart(filtered: &Dataset) -> BarChart {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in &filtered.records {
        let entry = sums.entry(record.city.as_str()).or_default();
        entry.0 += f64::from(record.aqi);
        entry.1 += 1;
    }

    let means: Vec<(&str, f64)> = sums
        .into_iter()
        .map(|(city, (sum, count))| (city, sum / count as f64))
        .collect();
    let lo = means.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let hi = means.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    BarChart {
        title: "Average AQI Comparison",
        bars: means
            .into_iter()
            .map(|(city, avg_aqi)| BarPoint {
                city: city.to_string(),
                avg_aqi,
                color: scale_color(normalize(avg_aqi, lo, hi)),
            })
            .collect(),
    }
}

pub fn scatter_chart(filtered: &Dataset) -> ScatterChart {
    let colors = city_colors(filtered);
    let max_aqi = filtered.records.iter().map(|r| r.aqi).max().unwrap_or(0);

    ScatterChart {
        title: "Relationship: Pollution vs Temperature",
        points: filtered
            .records
            .iter()
            .map(|record| ScatterPoint {
                city: record.city.clone(),
                temperature: record.temperature,
                pm25: record.pm25,
                aqi: record.aqi,
                humidity: record.humidity,
                color: color_for(&colors, &record.city),
                diameter: marker_diameter(record.aqi, max_aqi),
            })
            .collect(),
    }
}

/// One series per city, points kept in row order.
pub fn line_chart(filtered: &Dataset, pollutant: Pollutant) -> LineChart {
    let colors = city_colors(filtered);
    let mut series: Vec<LineSeries> = colors
        .iter()
        .map(|(city, color)| LineSeries {
            city: city.clone(),
            color: *color,
            points: Vec::new(),
        })
        .collect();

    for record in &filtered.records {
        if let Some(line) = series.iter_mut().find(|s| s.city == record.city) {
            line.points.push(LinePoint {
                date: record.date,
                value: record.pollutant(pollutant),
            });
        }
    }

    LineChart {
        title: format!("{} Levels Over Time", pollutant.label()),
        pollutant,
        markers: true,
        series,
    }
}

/// Skipped entirely when the dataset carries no coordinate columns.
pub fn map_chart(filtered: &Dataset) -> Option<MapChart> {
    if !filtered.has_coordinates {
        return None;
    }

    let points = filtered
        .records
        .iter()
        .filter_map(|record| {
            Some(MapPoint {
                city: record.city.clone(),
                latitude: record.latitude?,
                longitude: record.longitude?,
                aqi: record.aqi,
            })
        })
        .collect();

    Some(MapChart {
        color: MAP_MARKER_COLOR,
        size: MAP_MARKER_SIZE,
        points,
    })
}

fn city_colors(filtered: &Dataset) -> Vec<(String, &'static str)> {
    filtered
        .cities()
        .into_iter()
        .enumerate()
        .map(|(i, city)| (city, CITY_PALETTE[i % CITY_PALETTE.len()]))
        .collect()
}

fn color_for(colors: &[(String, &'static str)], city: &str) -> &'static str {
    colors
        .iter()
        .find(|(name, _)| name == city)
        .map(|(_, color)| *color)
        .unwrap_or(CITY_PALETTE[0])
}

fn marker_diameter(aqi: u32, max_aqi: u32) -> f64 {
    if max_aqi == 0 {
        return SCATTER_MIN_DIAMETER;
    }
    let scaled = SCATTER_MAX_DIAMETER * (f64::from(aqi) / f64::from(max_aqi)).sqrt();
    scaled.max(SCATTER_MIN_DIAMETER)
}

fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (value - lo) / (hi - lo)
    } else {
        0.5
    }
}

/// Samples the reversed red-yellow-green scale at `t` in [0, 1].
pub fn scale_color(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let position = t * (RD_YL_GN_R.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    let (r0, g0, b0) = RD_YL_GN_R[lower];
    let (r1, g1, b1) = RD_YL_GN_R[upper];
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * fraction).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}
