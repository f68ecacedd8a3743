//! HTTP handlers for the coin catalog API

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use coin_intake::{intake, ImageFile};
use coin_types::{check_document_size, validate_draft, CoinDraft, CoinRecord, RecordBrowser};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "coin-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /api/images/intake
///
/// The body is the raw image file and `Content-Type` its MIME type. An
/// empty body means no file was selected and yields 204.
pub async fn intake_image(headers: HeaderMap, body: Bytes) -> Result<Response, ApiError> {
    let file = (!body.is_empty()).then(|| {
        let bytes = body.to_vec();
        match headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|mime| mime.starts_with("image/"))
        {
            Some(mime) => ImageFile::new(bytes, mime),
            None => ImageFile::detect(bytes),
        }
    });

    // Decode and re-encode off the async workers
    let outcome = tokio::task::spawn_blocking(move || intake(file.as_ref())).await??;
    match outcome {
        Some(outcome) => Ok(Json(outcome).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Handler: GET /api/coins/exists?coinNo=
pub async fn check_coin_no(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExistsQuery>,
) -> Json<ExistsResponse> {
    let exists = state.store.coin_no_taken(&query.coin_no).await;
    Json(ExistsResponse {
        coin_no: query.coin_no,
        exists,
    })
}

/// Handler: POST /api/coins
///
/// Validates the draft, stamps it, checks its serialized size against the
/// store ceiling, then re-checks the coin number before writing. The
/// number check and the insert are not atomic.
pub async fn create_coin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CoinDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CoinRecord>), ApiError> {
    let Json(draft) = payload?;
    validate_draft(&draft)?;

    let document = draft.into_document(Utc::now());
    let size = check_document_size(&document)?;
    tracing::debug!("Document size for coin {}: {} bytes", document.coin_no, size);

    if state.store.coin_no_taken(&document.coin_no).await {
        return Err(ApiError::DuplicateCoinNo(document.coin_no));
    }

    let record = CoinRecord::new(document);
    state
        .store
        .insert(&record)
        .await
        .map_err(ApiError::SubmissionFailed)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler: GET /api/coins
pub async fn list_coins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let records = state.store.list(query.sort_by, query.order).await?;

    let mut browser = RecordBrowser::new(records);
    browser.set_search(&query.search);
    browser.go_to_page(query.page.unwrap_or(1));

    Ok(Json(ListResponse {
        coins: browser.page_items().into_iter().cloned().collect(),
        page: browser.current_page(),
        total_pages: browser.total_pages(),
        total_count: browser.filtered_count(),
    }))
}

/// Handler: GET /api/coins/report
///
/// Exports every record matching the search, not just one page.
pub async fn export_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.list(query.sort_by, query.order).await?;

    let mut browser = RecordBrowser::new(records);
    browser.set_search(&query.search);
    let filtered: Vec<CoinRecord> = browser.filtered().into_iter().cloned().collect();

    let pdf = tokio::task::spawn_blocking(move || coin_report::export_report(&filtered)).await??;
    let file_name = coin_report::report_file_name(Utc::now().date_naive());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        pdf,
    ))
}
