use crate::errors::LoadError;
use crate::models::{COORDINATE_COLUMNS, Dataset, PollutionRecord};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::OnceCell};
use tracing::{error, info};

/// Result of the one-time load: the dataset plus the message to show when it failed.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Arc<Dataset>,
    pub error: Option<String>,
}

/// Loads the input file at most once per process; only a restart re-reads it.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceCell<LoadedDataset>,
}

impl DatasetCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> &LoadedDataset {
        self.cell
            .get_or_init(|| async {
                match load_dataset(&self.path).await {
                    Ok(dataset) => {
                        info!(
                            rows = dataset.len(),
                            path = %self.path.display(),
                            "loaded pollution dataset"
                        );
                        LoadedDataset {
                            dataset: Arc::new(dataset),
                            error: None,
                        }
                    }
                    Err(err) => {
                        error!("failed to load dataset: {err}");
                        LoadedDataset {
                            dataset: Arc::new(Dataset::default()),
                            error: Some(err.to_string()),
                        }
                    }
                }
            })
            .await
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

pub async fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_dataset(&bytes).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let has_column = |names: &[&str]| headers.iter().any(|h| names.contains(&h));
    let has_coordinates = has_column(&[COORDINATE_COLUMNS[0], "lat"])
        && has_column(&[COORDINATE_COLUMNS[1], "lon"]);

    let records = reader
        .deserialize::<PollutionRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(records, has_coordinates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "City,Date,AQI,PM2.5,PM10,NO2,SO2,Temperature,Humidity\n\
        Delhi,2024-01-01,180,95.5,140,40.2,12,18.5,55\n\
        Pune,2024-01-02 09:30:00,60,20,45,15,4.5,27,62\n";

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("pollution_{}_{}_{name}", std::process::id(), nanos))
    }

    #[test]
    fn parses_rows_and_dates() {
        let dataset = parse_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.has_coordinates);
        assert_eq!(dataset.records[0].city, "Delhi");
        assert_eq!(dataset.records[0].aqi, 180);
        assert_eq!(
            dataset.records[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(dataset.records[1].latitude, None);
    }

    #[test]
    fn detects_short_coordinate_headers() {
        let csv = "City,Date,AQI,PM2.5,PM10,NO2,SO2,Temperature,Humidity,lat,lon,Station\n\
            Delhi,2024-01-01,180,95.5,140,40.2,12,18.5,55,28.61,77.20,North\n\
            Delhi,2024-01-02,170,90,130,38,11,19,54,,,North\n";
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert!(dataset.has_coordinates);
        assert_eq!(dataset.records[0].latitude, Some(28.61));
        assert_eq!(dataset.records[0].longitude, Some(77.20));
        assert_eq!(dataset.records[1].latitude, None);
    }

    #[test]
    fn blank_measurements_load_as_nan() {
        let csv = "City,Date,AQI,PM2.5,PM10,NO2,SO2,Temperature,Humidity\n\
            Delhi,2024-01-01,180,95.5,140,40.2,12,18.5,55\n\
            Pune,2024-01-02,55.0,,45,15,,27,\n";
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let delhi = &dataset.records[0];
        assert_eq!((delhi.aqi, delhi.pm25, delhi.humidity), (180, 95.5, 55.0));

        let pune = &dataset.records[1];
        assert_eq!(pune.aqi, 55);
        assert!(pune.pm25.is_nan());
        assert!(pune.so2.is_nan());
        assert!(pune.humidity.is_nan());
        assert_eq!((pune.pm10, pune.no2, pune.temperature), (45.0, 15.0, 27.0));
    }

    #[test]
    fn rejects_non_numeric_measurements() {
        let csv = "City,Date,AQI,PM2.5,PM10,NO2,SO2,Temperature,Humidity\n\
            Delhi,2024-01-01,180,high,140,40.2,12,18.5,55\n";
        assert!(parse_dataset(csv.as_bytes()).is_err());
    }

    #[tokio::test]
    async fn blank_cells_do_not_fail_the_load() {
        let path = temp_path("gaps.csv");
        std::fs::write(
            &path,
            "City,Date,AQI,PM2.5,PM10,NO2,SO2,Temperature,Humidity\n\
             Delhi,2024-01-01,180,95.5,140,40.2,12,18.5,55\n\
             Pune,2024-01-02,60,,45,15,4.5,27,62\n",
        )
        .unwrap();

        let cache = DatasetCache::new(path.clone());
        let loaded = cache.get().await;
        assert!(loaded.error.is_none());
        assert_eq!(loaded.dataset.len(), 2);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_unparsable_dates() {
        let csv = "City,Date,AQI,PM2.5,PM10,NO2,SO2,Temperature,Humidity\n\
            Delhi,yesterday,180,95.5,140,40.2,12,18.5,55\n";
        assert!(parse_dataset(csv.as_bytes()).is_err());
    }

    #[tokio::test]
    async fn missing_file_yields_not_found() {
        let err = load_dataset(&temp_path("absent.csv")).await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_file_degrades_to_empty_dataset() {
        let cache = DatasetCache::new(temp_path("environment_pollution_data.csv"));
        let loaded = cache.get().await;
        assert!(loaded.dataset.is_empty());
        let message = loaded.error.as_deref().unwrap();
        assert!(message.contains("not found"));
    }

    #[tokio::test]
    async fn cache_does_not_reread_the_file() {
        let path = temp_path("cached.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let cache = DatasetCache::new(path.clone());
        assert!(!cache.is_loaded());
        let first = Arc::clone(&cache.get().await.dataset);
        assert_eq!(first.len(), 2);

        std::fs::remove_file(&path).unwrap();
        let second = Arc::clone(&cache.get().await.dataset);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.get().await.error.is_none());
    }
}
