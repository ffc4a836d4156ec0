use crate::errors::AppError;
use crate::models::{Dataset, Pollutant, PollutionRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::IntoDeserializer};
use std::collections::BTreeSet;
use std::str::FromStr;

pub const AQI_SLIDER_MIN: u32 = 0;
pub const AQI_SLIDER_MAX: u32 = 500;

/// City set, inclusive date interval and inclusive AQI interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub cities: BTreeSet<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub aqi_min: u32,
    pub aqi_max: u32,
}

impl FilterCriteria {
    pub fn matches(&self, record: &PollutionRecord) -> bool {
        self.cities.contains(&record.city)
            && self.start <= record.date
            && record.date <= self.end
            && self.aqi_min <= record.aqi
            && record.aqi <= self.aqi_max
    }
}

pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let records = dataset
        .records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect();
    Dataset::new(records, dataset.has_coordinates)
}

/// Raw sidebar selections as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardQuery {
    /// One `cities` parameter per city. Absent selects every city; present but empty selects none.
    pub cities: Option<Vec<String>>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub aqi_min: Option<u32>,
    pub aqi_max: Option<u32>,
    pub pollutant: Option<Pollutant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DateSelector {
    Range { min: NaiveDate, max: NaiveDate },
    Single { date: NaiveDate },
}

impl DateSelector {
    pub fn for_bounds(min: NaiveDate, max: NaiveDate) -> Self {
        if min == max {
            DateSelector::Single { date: min }
        } else {
            DateSelector::Range { min, max }
        }
    }
}

/// Sidebar model derived from the full dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterControls {
    pub cities: Vec<String>,
    pub date_selector: DateSelector,
    pub aqi_range: (u32, u32),
    pub aqi_default: (u32, u32),
    pub pollutants: Vec<&'static str>,
}

impl FilterControls {
    pub fn for_dataset(dataset: &Dataset) -> Option<Self> {
        let (min_date, max_date) = dataset.date_bounds()?;
        let aqi_default = dataset.aqi_bounds()?;
        Some(Self {
            cities: dataset.cities(),
            date_selector: DateSelector::for_bounds(min_date, max_date),
            aqi_range: (AQI_SLIDER_MIN, AQI_SLIDER_MAX),
            aqi_default,
            pollutants: Pollutant::ALL.iter().map(|p| p.label()).collect(),
        })
    }
}

impl DashboardQuery {
    /// Builds the selections from decoded query pairs. `cities` may repeat; for
    /// every other key the last occurrence wins and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "cities" => query.cities.get_or_insert_with(Vec::new).push(value),
                "start" => query.start = Some(parse_param(&key, &value)?),
                "end" => query.end = Some(parse_param(&key, &value)?),
                "aqi_min" => query.aqi_min = Some(parse_param(&key, &value)?),
                "aqi_max" => query.aqi_max = Some(parse_param(&key, &value)?),
                "pollutant" => {
                    let pollutant = Pollutant::deserialize(value.as_str().into_deserializer())
                        .map_err(|err: serde::de::value::Error| {
                            AppError::bad_request(format!("invalid pollutant: {err}"))
                        })?;
                    query.pollutant = Some(pollutant);
                }
                _ => {}
            }
        }
        Ok(query)
    }

    /// Applies the sidebar defaults and fallbacks against the loaded dataset.
    pub fn resolve(&self, controls: &FilterControls) -> Result<FilterCriteria, AppError> {
        let cities = match &self.cities {
            None => controls.cities.iter().cloned().collect(),
            Some(selected) => selected
                .iter()
                .map(|city| city.trim())
                .filter(|city| !city.is_empty())
                .map(str::to_string)
                .collect(),
        };

        let (start, end) = match controls.date_selector {
            DateSelector::Single { date } => (date, date),
            DateSelector::Range { min, max } => match (self.start, self.end) {
                (Some(start), Some(end)) => (start, end),
                _ => (min, max),
            },
        };
        if start > end {
            return Err(AppError::bad_request("start date must not be after end date"));
        }

        let aqi_min = self.aqi_min.unwrap_or(controls.aqi_default.0);
        let aqi_max = self.aqi_max.unwrap_or(controls.aqi_default.1);
        if aqi_min > aqi_max {
            return Err(AppError::bad_request("aqi_min must not exceed aqi_max"));
        }

        Ok(FilterCriteria {
            cities,
            start,
            end,
            aqi_min,
            aqi_max,
        })
    }
}

fn parse_param<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| AppError::bad_request(format!("invalid {key} '{value}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(city: &str, aqi: u32, date: NaiveDate) -> PollutionRecord {
        PollutionRecord {
            city: city.to_string(),
            date,
            aqi,
            pm25: 10.0,
            pm10: 20.0,
            no2: 5.0,
            so2: 2.0,
            temperature: 21.0,
            humidity: 50.0,
            latitude: None,
            longitude: None,
        }
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                record("CityA", 40, day(1)),
                record("CityB", 120, day(2)),
                record("CityA", 60, day(3)),
            ],
            false,
        )
    }

    fn criteria(cities: &[&str], start: NaiveDate, end: NaiveDate, aqi: (u32, u32)) -> FilterCriteria {
        FilterCriteria {
            cities: cities.iter().map(|c| c.to_string()).collect(),
            start,
            end,
            aqi_min: aqi.0,
            aqi_max: aqi.1,
        }
    }

    #[test]
    fn keeps_only_matching_city() {
        let filtered = filter(&sample(), &criteria(&["CityA"], day(1), day(3), (0, 500)));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.records.iter().all(|r| r.city == "CityA"));
    }

    #[test]
    fn bounds_are_inclusive() {
        let dataset = sample();
        let filtered = filter(&dataset, &criteria(&["CityA", "CityB"], day(2), day(3), (60, 120)));
        let aqis: Vec<_> = filtered.records.iter().map(|r| r.aqi).collect();
        assert_eq!(aqis, vec![120, 60]);
    }

    #[test]
    fn empty_city_set_selects_nothing() {
        let filtered = filter(&sample(), &criteria(&[], day(1), day(3), (0, 500)));
        assert!(filtered.is_empty());
    }

    #[test]
    fn no_false_positives_or_negatives() {
        let dataset = sample();
        let criteria = criteria(&["CityB", "CityA"], day(1), day(2), (41, 500));
        let filtered = filter(&dataset, &criteria);
        for record in &dataset.records {
            assert_eq!(filtered.records.contains(record), criteria.matches(record));
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let criteria = criteria(&["CityA"], day(1), day(2), (0, 100));
        let once = filter(&sample(), &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn query_defaults_select_everything() {
        let dataset = sample();
        let controls = FilterControls::for_dataset(&dataset).unwrap();
        let criteria = DashboardQuery::default().resolve(&controls).unwrap();
        assert_eq!(criteria.cities.len(), 2);
        assert_eq!((criteria.start, criteria.end), (day(1), day(3)));
        assert_eq!((criteria.aqi_min, criteria.aqi_max), (40, 120));
        assert_eq!(filter(&dataset, &criteria).len(), 3);
    }

    #[test]
    fn partial_date_selection_falls_back_to_full_range() {
        let controls = FilterControls::for_dataset(&sample()).unwrap();
        let query = DashboardQuery {
            start: Some(day(2)),
            ..Default::default()
        };
        let criteria = query.resolve(&controls).unwrap();
        assert_eq!((criteria.start, criteria.end), (day(1), day(3)));
    }

    #[test]
    fn explicit_empty_city_list_is_respected() {
        let controls = FilterControls::for_dataset(&sample()).unwrap();
        let query = DashboardQuery {
            cities: Some(vec![String::new()]),
            ..Default::default()
        };
        assert!(query.resolve(&controls).unwrap().cities.is_empty());
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_city_params_keep_commas_in_names() {
        let dataset = Dataset::new(
            vec![
                record("Washington, D.C.", 70, day(1)),
                record("Washington", 30, day(2)),
                record("D.C.", 90, day(3)),
            ],
            false,
        );
        let controls = FilterControls::for_dataset(&dataset).unwrap();
        let query = DashboardQuery::from_pairs(pairs(&[
            ("cities", "Washington, D.C."),
            ("aqi_min", "0"),
            ("aqi_max", "500"),
        ]))
        .unwrap();
        assert_eq!(query.cities, Some(vec!["Washington, D.C.".to_string()]));

        let filtered = filter(&dataset, &query.resolve(&controls).unwrap());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records[0].city, "Washington, D.C.");
    }

    #[test]
    fn query_pairs_collect_every_city() {
        let query = DashboardQuery::from_pairs(pairs(&[
            ("cities", "CityA"),
            ("start", "2024-01-02"),
            ("cities", "CityB"),
            ("end", "2024-01-03"),
            ("pollutant", "PM2.5"),
            ("unrelated", "x"),
        ]))
        .unwrap();
        assert_eq!(query.cities, Some(vec!["CityA".to_string(), "CityB".to_string()]));
        assert_eq!((query.start, query.end), (Some(day(2)), Some(day(3))));
        assert_eq!(query.pollutant, Some(Pollutant::Pm25));

        let controls = FilterControls::for_dataset(&sample()).unwrap();
        assert_eq!(query.resolve(&controls).unwrap().cities.len(), 2);
    }

    #[test]
    fn absent_and_blank_city_params_differ() {
        let controls = FilterControls::for_dataset(&sample()).unwrap();
        let absent = DashboardQuery::from_pairs(Vec::new()).unwrap();
        assert_eq!(absent.resolve(&controls).unwrap().cities.len(), 2);

        let blank = DashboardQuery::from_pairs(pairs(&[("cities", "")])).unwrap();
        assert!(blank.resolve(&controls).unwrap().cities.is_empty());
    }

    #[test]
    fn malformed_params_are_bad_requests() {
        assert!(DashboardQuery::from_pairs(pairs(&[("aqi_min", "low")])).is_err());
        assert!(DashboardQuery::from_pairs(pairs(&[("start", "01/02/2024")])).is_err());
        assert!(DashboardQuery::from_pairs(pairs(&[("pollutant", "CO")])).is_err());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let controls = FilterControls::for_dataset(&sample()).unwrap();
        let dates = DashboardQuery {
            start: Some(day(3)),
            end: Some(day(1)),
            ..Default::default()
        };
        assert!(dates.resolve(&controls).is_err());

        let aqi = DashboardQuery {
            aqi_min: Some(300),
            aqi_max: Some(10),
            ..Default::default()
        };
        assert!(aqi.resolve(&controls).is_err());
    }

    #[test]
    fn single_date_dataset_uses_static_selector() {
        let dataset = Dataset::new(
            vec![record("CityA", 40, day(5)), record("CityB", 90, day(5))],
            false,
        );
        let controls = FilterControls::for_dataset(&dataset).unwrap();
        assert_eq!(controls.date_selector, DateSelector::Single { date: day(5) });

        let query = DashboardQuery {
            start: Some(day(1)),
            end: Some(day(2)),
            ..Default::default()
        };
        let criteria = query.resolve(&controls).unwrap();
        assert_eq!((criteria.start, criteria.end), (day(5), day(5)));
        assert_eq!(filter(&dataset, &criteria).len(), 2);
    }
}
