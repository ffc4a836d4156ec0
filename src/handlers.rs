use crate::dashboard::{DashboardResponse, filtered_rows, render};
use crate::errors::AppError;
use crate::filter::DashboardQuery;
use crate::refresh::{RefreshState, RefreshStatus};
use crate::state::AppState;
use crate::table::{EXPORT_FILE_NAME, export_csv};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound on one long-poll before the page asks again.
const WAIT_LIMIT: Duration = Duration::from_secs(25);

/// Raw query pairs, so a repeated `cities` key keeps every value.
type QueryPairs = Query<Vec<(String, String)>>;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let status = state.refresh.status().await;
    Html(render_index(&status))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<DashboardResponse>, AppError> {
    let query = DashboardQuery::from_pairs(pairs)?;
    let loaded = state.dataset.get().await;
    let mut response = render(loaded, &query)?;

    state.refresh.touch().await;
    response.refresh = Some(state.refresh.status().await);

    Ok(Json(response))
}

pub async fn export(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<impl IntoResponse, AppError> {
    let query = DashboardQuery::from_pairs(pairs)?;
    let loaded = state.dataset.get().await;
    let rows = filtered_rows(loaded, &query)?;
    let body = export_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub enabled: Option<bool>,
}

pub async fn get_refresh(State(state): State<AppState>) -> Json<RefreshStatus> {
    Json(state.refresh.status().await)
}

pub async fn set_refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Json<RefreshStatus> {
    let status = match payload.enabled {
        Some(true) => state.refresh.set(RefreshState::On).await,
        Some(false) => state.refresh.set(RefreshState::Off).await,
        None => state.refresh.toggle().await,
    };
    Json(status)
}

pub async fn toggle_refresh(State(state): State<AppState>) -> Redirect {
    state.refresh.toggle().await;
    Redirect::to("/")
}

#[derive(Debug, Deserialize)]
pub struct WaitQuery {
    pub since: u64,
}

/// Resolves once the refresh generation passes `since`, or after [`WAIT_LIMIT`].
pub async fn wait_refresh(
    State(state): State<AppState>,
    Query(params): Query<WaitQuery>,
) -> Json<RefreshStatus> {
    let mut ticks = state.refresh.subscribe();
    let _ = timeout(WAIT_LIMIT, ticks.wait_for(|generation| *generation > params.since)).await;
    Json(state.refresh.status().await)
}
