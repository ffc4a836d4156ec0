use crate::models::{AqiBand, Dataset, PollutionRecord};
use serde::Serialize;

pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub avg_aqi: f64,
    pub max_pm25: f64,
    pub min_humidity: f64,
    pub status: AqiBand,
    pub status_label: &'static str,
    pub status_tone: &'static str,
}

/// Headline figures for the filtered rows; `None` when there is nothing to summarise.
pub fn summarize(filtered: &Dataset) -> Option<KpiSummary> {
    if filtered.is_empty() {
        return None;
    }
    let records = &filtered.records;

    let avg_aqi = records.iter().map(|r| f64::from(r.aqi)).sum::<f64>() / records.len() as f64;
    // f64::max/min skip NaN, so blank cells drop out and an all-blank column stays NaN.
    let max_pm25 = records.iter().map(|r| r.pm25).fold(f64::NAN, f64::max);
    let min_humidity = records.iter().map(|r| r.humidity).fold(f64::NAN, f64::min);
    let status = AqiBand::classify(avg_aqi);

    Some(KpiSummary {
        avg_aqi,
        max_pm25,
        min_humidity,
        status,
        status_label: status.label(),
        status_tone: status.tone(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub highest_city: String,
    pub lowest_city: String,
    pub message: String,
}

/// Cities holding the highest and lowest AQI reading. Ties go to the earliest row.
pub fn insights(filtered: &Dataset) -> Option<Insight> {
    let mut records = filtered.records.iter();
    let first = records.next()?;

    let (highest, lowest) = records.fold((first, first), |(hi, lo), record| {
        (
            if record.aqi > hi.aqi { record } else { hi },
            if record.aqi < lo.aqi { record } else { lo },
        )
    });

    Some(Insight {
        message: format!(
            "The most polluted city in this selection is {}. {} has the cleanest air currently.",
            highest.city, lowest.city
        ),
        highest_city: highest.city.clone(),
        lowest_city: lowest.city.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub total_rows: usize,
    pub preview: Vec<PollutionRecord>,
    pub summary: Vec<ColumnSummary>,
}

/// Raw preview plus per-column statistics of the full dataset.
pub fn overview(dataset: &Dataset) -> DatasetOverview {
    let summary = dataset
        .columns()
        .into_iter()
        .filter_map(|column| {
            let values: Vec<f64> = dataset
                .records
                .iter()
                .filter_map(|record| numeric_value(record, column))
                .filter(|value| !value.is_nan())
                .collect();
            describe(column, values)
        })
        .collect();

    DatasetOverview {
        total_rows: dataset.len(),
        preview: dataset.records.iter().take(PREVIEW_ROWS).cloned().collect(),
        summary,
    }
}

fn numeric_value(record: &PollutionRecord, column: &str) -> Option<f64> {
    match column {
        "AQI" => Some(f64::from(record.aqi)),
        "PM2.5" => Some(record.pm25),
        "PM10" => Some(record.pm10),
        "NO2" => Some(record.no2),
        "SO2" => Some(record.so2),
        "Temperature" => Some(record.temperature),
        "Humidity" => Some(record.humidity),
        "Latitude" => record.latitude,
        "Longitude" => record.longitude,
        _ => None,
    }
}

fn describe(column: &'static str, mut values: Vec<f64>) -> Option<ColumnSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    Some(ColumnSummary {
        column,
        count,
        mean,
        std,
        min: values[0],
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.5),
        p75: quantile(&values, 0.75),
        max: values[count - 1],
    })
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
