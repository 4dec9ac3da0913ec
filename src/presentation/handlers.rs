// HTTP request handlers
use crate::application::progress_service::VisibleMetrics;
use crate::domain::entry::{EntryDraft, SortDirection, SortKey, SortOrder};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    pub metrics: Option<String>,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List entries for the table view, sorted by entry date or last modification
pub async fn list_entries(
    query: Result<Query<ListQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let order = SortOrder::new(
        query.sort.unwrap_or_default(),
        query.direction.unwrap_or_default(),
    );
    let entries = state.entry_service.list_entries(order).await?;
    Ok(respond(StatusCode::OK, &entries, &headers).await)
}

pub async fn create_entry(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    draft: Result<Json<EntryDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(draft) = draft?;
    let entries = state.entry_service.add_entry(draft).await?;
    Ok(respond(StatusCode::CREATED, &entries, &headers).await)
}

pub async fn update_entry(
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    draft: Result<Json<EntryDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(draft) = draft?;
    let entries = state.entry_service.update_entry(&id, draft).await?;
    Ok(respond(StatusCode::OK, &entries, &headers).await)
}

pub async fn delete_entry(
    id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let entries = state.entry_service.delete_entry(&id).await?;
    Ok(respond(StatusCode::OK, &entries, &headers).await)
}

/// Chart points with trend lines for the visible metrics
pub async fn progress_chart(
    query: Result<Query<ProgressQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let visible = match query.metrics.as_deref() {
        Some(list) => VisibleMetrics::parse(list).map_err(ApiError::BadRequest)?,
        None => VisibleMetrics::default(),
    };
    let chart = state.progress_service.progress_chart(visible).await?;
    Ok(respond(StatusCode::OK, &chart, &headers).await)
}
