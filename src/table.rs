use crate::errors::AppError;
use crate::models::{AqiBand, Dataset, PollutionRecord};
use serde::Serialize;

pub const EXPORT_FILE_NAME: &str = "pollution_data.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStyle {
    pub band: AqiBand,
    pub background: &'static str,
    pub color: &'static str,
}

impl CellStyle {
    pub fn for_aqi(aqi: u32) -> Self {
        let band = AqiBand::classify(f64::from(aqi));
        let (background, color) = band.colors();
        Self {
            band,
            background,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRow {
    pub cells: Vec<String>,
    pub aqi_style: CellStyle,
}

/// The filtered rows as display strings, with only the AQI column styled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledTable {
    pub columns: Vec<&'static str>,
    pub aqi_column: usize,
    pub rows: Vec<StyledRow>,
}

pub fn style(filtered: &Dataset) -> StyledTable {
    let columns = filtered.columns();
    let aqi_column = columns.iter().position(|c| *c == "AQI").unwrap_or(2);

    StyledTable {
        rows: filtered
            .records
            .iter()
            .map(|record| StyledRow {
                cells: row_cells(record, filtered.has_coordinates),
                aqi_style: CellStyle::for_aqi(record.aqi),
            })
            .collect(),
        columns,
        aqi_column,
    }
}

fn row_cells(record: &PollutionRecord, with_coordinates: bool) -> Vec<String> {
    let mut cells = vec![
        record.city.clone(),
        record.date.format("%Y-%m-%d").to_string(),
        record.aqi.to_string(),
        measurement(record.pm25),
        measurement(record.pm10),
        measurement(record.no2),
        measurement(record.so2),
        measurement(record.temperature),
        measurement(record.humidity),
    ];
    if with_coordinates {
        let optional = |value: Option<f64>| value.map(measurement).unwrap_or_default();
        cells.push(optional(record.latitude));
        cells.push(optional(record.longitude));
    }
    cells
}

/// Missing readings stay blank, so an exported file loads back the same way.
fn measurement(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// UTF-8 CSV of the filtered rows: header first, no index column.
pub fn export_csv(filtered: &Dataset) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(filtered.columns())?;
    for record in &filtered.records {
        writer.write_record(row_cells(record, filtered.has_coordinates))?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::internal(err.into_error()))
}
