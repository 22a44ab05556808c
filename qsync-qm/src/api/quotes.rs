//! Quote collection API handlers
//!
//! CRUD-ish surface over the collection: listing, adding, random selection,
//! categories, filter selection, JSON import/export and reset-to-defaults.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use qsync_common::Quote;

use crate::error::{ApiError, ApiResult};
use crate::repository::ALL_CATEGORIES;
use crate::services::import_export::{export_json, parse_import, ImportMode};
use crate::AppState;

/// GET /quotes response
#[derive(Debug, Serialize)]
pub struct ListQuotesResponse {
    pub quotes: Vec<Quote>,
    pub count: usize,
}

/// POST /quotes request
#[derive(Debug, Deserialize)]
pub struct AddQuoteRequest {
    pub text: String,
    pub category: String,
}

/// POST /quotes response
#[derive(Debug, Serialize)]
pub struct AddQuoteResponse {
    pub quote: Quote,
    pub total: usize,
    pub persisted: bool,
}

/// GET /quotes/random query parameters
#[derive(Debug, Deserialize)]
pub struct RandomQuoteParams {
    /// One-off category constraint; defaults to the persisted filter
    pub category: Option<String>,
}

/// GET /quotes/categories response
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// GET and PUT /filter payloads
#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub filter: String,
    /// Quotes matching the filter
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SetFilterRequest {
    pub category: String,
}

/// POST /quotes/import query parameters
#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// "replace" or "merge" (default)
    pub mode: Option<String>,
}

/// POST /quotes/import response
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped_duplicates: usize,
    pub skipped_invalid: usize,
    pub total: usize,
    pub persisted: bool,
}

/// DELETE /quotes response
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub total: usize,
    pub persisted: bool,
}

/// GET /quotes
pub async fn list_quotes(State(state): State<AppState>) -> Json<ListQuotesResponse> {
    let quotes = state.repo.quotes().await;
    Json(ListQuotesResponse {
        count: quotes.len(),
        quotes,
    })
}

/// POST /quotes
pub async fn add_quote(
    State(state): State<AppState>,
    Json(request): Json<AddQuoteRequest>,
) -> ApiResult<Json<AddQuoteResponse>> {
    let outcome = state.repo.add(&request.text, &request.category).await?;

    tracing::info!(category = %outcome.quote.category, "Quote added");

    Ok(Json(AddQuoteResponse {
        quote: outcome.quote,
        total: state.repo.len().await,
        persisted: outcome.persisted,
    }))
}

/// GET /quotes/random
pub async fn random_quote(
    State(state): State<AppState>,
    Query(params): Query<RandomQuoteParams>,
) -> ApiResult<Json<Quote>> {
    let quote = state
        .repo
        .random_quote_in(params.category.as_deref())
        .await
        .ok_or_else(|| {
            ApiError::NotFound("No quotes available in this category".to_string())
        })?;

    state.session.record_view(&quote).await;

    Ok(Json(quote))
}

/// GET /quotes/categories
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.repo.categories().await,
    })
}

/// GET /filter
pub async fn get_filter(State(state): State<AppState>) -> Json<FilterResponse> {
    let filter = state.repo.filter().await;
    let count = state.repo.filtered_quotes().await.len();
    Json(FilterResponse { filter, count })
}

/// PUT /filter
pub async fn set_filter(
    State(state): State<AppState>,
    Json(request): Json<SetFilterRequest>,
) -> ApiResult<Json<FilterResponse>> {
    let category = request.category.trim();
    if category != ALL_CATEGORIES
        && !state.repo.categories().await.iter().any(|c| c == category)
    {
        return Err(ApiError::BadRequest(format!(
            "Unknown category: {}",
            category
        )));
    }
    state.repo.set_filter(category).await?;

    let filter = state.repo.filter().await;
    let count = state.repo.filtered_quotes().await.len();
    tracing::info!(filter = %filter, count, "Filter selected");

    Ok(Json(FilterResponse { filter, count }))
}

/// GET /quotes/export
///
/// Returns the collection as a pretty JSON array suitable for re-import.
pub async fn export_quotes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let quotes = state.repo.quotes().await;
    let payload = export_json(&quotes)?;

    tracing::info!(count = quotes.len(), "Collection exported");

    Ok(([(header::CONTENT_TYPE, "application/json")], payload))
}

/// POST /quotes/import
///
/// Body: JSON array of quotes. Invalid records are discarded; a payload with
/// no valid record is rejected without mutating the collection.
pub async fn import_quotes(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    payload: String,
) -> ApiResult<Json<ImportResponse>> {
    let mode = match params.mode.as_deref() {
        Some("replace") => ImportMode::Replace,
        Some("merge") | None => ImportMode::Merge,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown import mode: {} (expected replace or merge)",
                other
            )))
        }
    };

    let parsed = parse_import(&payload)?;
    let outcome = state.repo.import(parsed, mode).await;

    tracing::info!(
        imported = outcome.imported,
        skipped_duplicates = outcome.skipped_duplicates,
        skipped_invalid = outcome.skipped_invalid,
        "Import applied"
    );

    Ok(Json(ImportResponse {
        imported: outcome.imported,
        skipped_duplicates: outcome.skipped_duplicates,
        skipped_invalid: outcome.skipped_invalid,
        total: outcome.total,
        persisted: outcome.persisted,
    }))
}

/// DELETE /quotes
///
/// Restores the default collection and clears session state.
pub async fn clear_quotes(State(state): State<AppState>) -> Json<ClearResponse> {
    let persisted = state.repo.clear().await;
    state.session.clear().await;

    tracing::info!("All quotes cleared, defaults restored");

    Json(ClearResponse {
        total: state.repo.len().await,
        persisted,
    })
}

/// Build quote collection routes
pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_quotes).post(add_quote).delete(clear_quotes))
        .route("/quotes/random", get(random_quote))
        .route("/quotes/categories", get(categories))
        .route("/quotes/export", get(export_quotes))
        .route("/quotes/import", axum::routing::post(import_quotes))
        .route("/filter", get(get_filter).put(set_filter))
}
