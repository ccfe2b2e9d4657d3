use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use tally_core::services::{paginate, ChartKind, ImportRequest, TransactionFilter};
use tally_core::{NewField, TallyContext, TemplateFormData, Transaction};

use crate::{error::ApiError, Result};

pub type AppState = Arc<TallyContext>;

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ============================================================================
// Bank statements
// ============================================================================

/// GET /api/bank-statements
pub async fn get_bank_statements(State(ctx): State<AppState>) -> Result<impl IntoResponse> {
    let transactions = ctx.transactions.load().await?;
    Ok(Json(transactions))
}

/// POST /api/bank-statements
/// Replaces the stored batch; the body must be a JSON array
pub async fn save_bank_statements(State(ctx): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse> {
    if !body.is_array() {
        return Err(ApiError::BadRequest("Transactions must be an array".to_string()));
    }
    let transactions: Vec<Transaction> =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(format!("Invalid transaction: {}", e)))?;

    let receipt = ctx.transactions.save(transactions).await?;

    Ok(Json(json!({
        "message": "Bank statements saved successfully",
        "count": receipt.count,
    })))
}

// ============================================================================
// Templates
// ============================================================================

/// GET /api/templates
pub async fn get_templates(State(ctx): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(ctx.template_store.list()?))
}

/// GET /api/templates/:id
pub async fn get_template(State(ctx): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let template = ctx
        .template_store
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Template {} not found", id)))?;
    Ok(Json(template))
}

/// POST /api/templates
pub async fn create_template(
    State(ctx): State<AppState>,
    Json(form): Json<TemplateFormData>,
) -> Result<impl IntoResponse> {
    let template = ctx.template_store.create(form)?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/templates/:id
pub async fn update_template(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<TemplateFormData>,
) -> Result<impl IntoResponse> {
    let template = ctx.template_store.update(&id, form)?;
    Ok(Json(template))
}

/// DELETE /api/templates/:id
pub async fn delete_template(State(ctx): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    if !ctx.template_store.delete(&id)? {
        return Err(ApiError::NotFound(format!("Template {} not found", id)));
    }
    Ok(Json(json!({ "message": "Template deleted", "id": id })))
}

// ============================================================================
// Fields
// ============================================================================

/// GET /api/fields
pub async fn get_fields(State(ctx): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(ctx.field_registry.list_fields()?))
}

/// POST /api/fields
pub async fn add_field(State(ctx): State<AppState>, Json(candidate): Json<NewField>) -> Result<impl IntoResponse> {
    let field = ctx.field_registry.add_field(candidate)?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// DELETE /api/fields/:id
/// Unknown ids are a no-op, reported through `removed`
pub async fn remove_field(State(ctx): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let removed = ctx.field_registry.remove_field(&id)?;
    Ok(Json(json!({ "id": id, "removed": removed })))
}

// ============================================================================
// Import
// ============================================================================

/// POST /api/import/preview
pub async fn preview_import(
    State(ctx): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<impl IntoResponse> {
    Ok(Json(ctx.import_service.preview(&request)?))
}

/// POST /api/import
pub async fn run_import(State(ctx): State<AppState>, Json(request): Json<ImportRequest>) -> Result<impl IntoResponse> {
    Ok(Json(ctx.import_service.import(&request).await?))
}

// ============================================================================
// Charts and browsing
// ============================================================================

/// GET /api/charts/:kind
pub async fn get_chart(State(ctx): State<AppState>, Path(kind): Path<String>) -> Result<impl IntoResponse> {
    let kind: ChartKind = kind.parse().map_err(ApiError::NotFound)?;
    Ok(Json(ctx.chart_service.chart(kind).await?))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

/// GET /api/transactions?from=&to=&search=&type=&minAmount=&maxAmount=&page=
pub async fn get_transactions(
    State(ctx): State<AppState>,
    Query(filter): Query<TransactionFilter>,
    Query(paging): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let transactions = ctx.transactions.load().await?;
    Ok(Json(paginate(filter.apply(transactions), paging.page)))
}
