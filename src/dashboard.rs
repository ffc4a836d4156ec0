//! The filter-and-render pipeline behind one page render.

use crate::charts::{Charts, build_charts};
use crate::errors::AppError;
use crate::filter::{DashboardQuery, FilterControls, FilterCriteria, filter};
use crate::models::{Dataset, Notice, Pollutant};
use crate::refresh::RefreshStatus;
use crate::stats::{DatasetOverview, Insight, KpiSummary, insights, overview, summarize};
use crate::storage::LoadedDataset;
use crate::table::{StyledTable, style};
use serde::Serialize;
use tracing::debug;

pub const NO_FILTER_MATCH: &str = "No data available for the selected filters.";
pub const EMPTY_DATASET: &str = "The dataset contains no records.";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub notices: Vec<Notice>,
    pub controls: Option<FilterControls>,
    pub criteria: Option<FilterCriteria>,
    pub pollutant: Pollutant,
    pub overview: Option<DatasetOverview>,
    pub row_count: usize,
    pub kpis: Option<KpiSummary>,
    pub charts: Option<Charts>,
    pub table: Option<StyledTable>,
    pub insight: Option<Insight>,
    pub refresh: Option<RefreshStatus>,
}

/// Runs the whole pipeline. Every downstream section is skipped when no rows survive.
pub fn render(loaded: &LoadedDataset, query: &DashboardQuery) -> Result<DashboardResponse, AppError> {
    let mut response = DashboardResponse {
        notices: Vec::new(),
        controls: None,
        criteria: None,
        pollutant: query.pollutant.unwrap_or_default(),
        overview: None,
        row_count: 0,
        kpis: None,
        charts: None,
        table: None,
        insight: None,
        refresh: None,
    };

    if let Some(message) = &loaded.error {
        response.notices.push(Notice::error(message.clone()));
    }

    let dataset = loaded.dataset.as_ref();
    let Some(controls) = FilterControls::for_dataset(dataset) else {
        if loaded.error.is_none() {
            response.notices.push(Notice::error(EMPTY_DATASET));
        }
        return Ok(response);
    };

    let criteria = query.resolve(&controls)?;
    let filtered = filter(dataset, &criteria);
    debug!(
        total = dataset.len(),
        matched = filtered.len(),
        "applied dashboard filters"
    );

    response.overview = Some(overview(dataset));
    response.row_count = filtered.len();
    response.controls = Some(controls);
    response.criteria = Some(criteria);

    if filtered.is_empty() {
        response.notices.push(Notice::warning(NO_FILTER_MATCH));
        return Ok(response);
    }

    render_sections(&mut response, &filtered);
    Ok(response)
}

fn render_sections(response: &mut DashboardResponse, filtered: &Dataset) {
    response.kpis = summarize(filtered);
    response.charts = Some(build_charts(filtered, response.pollutant));
    response.table = Some(style(filtered));
    response.insight = insights(filtered);
}

/// Rows selected by the same query, for the CSV download.
pub fn filtered_rows(loaded: &LoadedDataset, query: &DashboardQuery) -> Result<Dataset, AppError> {
    let dataset = loaded.dataset.as_ref();
    match FilterControls::for_dataset(dataset) {
        Some(controls) => Ok(filter(dataset, &query.resolve(&controls)?)),
        None => Ok(Dataset::new(Vec::new(), dataset.has_coordinates)),
    }
}
