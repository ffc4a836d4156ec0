use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_DATA_FILE: &str = "environment_pollution_data.csv";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub refresh_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = lookup("DASHBOARD_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let refresh_secs = lookup("AUTO_REFRESH_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        Self {
            data_path,
            port,
            refresh_interval: Duration::from_secs(refresh_secs),
        }
    }
}
