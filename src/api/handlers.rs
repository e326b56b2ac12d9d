use crate::models::DocumentUpload;
use crate::service::intake::{DocumentPreview, IntakeReport};
use crate::service::{IntakeContext, IntakeService, ReportService};
use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: documents to parse and reconcile
#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    pub company_id: i64,
    pub branch_id: i64,
    pub user_id: Option<i64>,
    pub documents: Vec<DocumentUpload>,
}

/// Response body for a batch intake
#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub success: bool,
    pub message: String,
    pub report: Option<IntakeReport>,
}

/// Request body: documents to parse only
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub documents: Vec<DocumentUpload>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub documents: Vec<DocumentPreview>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub company_id: i64,
    pub branch_id: i64,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Parse the submitted documents without touching the catalog
pub async fn preview_documents(
    State(service): State<Arc<IntakeService>>,
    Json(req): Json<PreviewRequest>,
) -> Response {
    let documents = service.preview(&req.documents);
    let response = PreviewResponse {
        success: documents.iter().all(|doc| doc.error.is_none()),
        documents,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Parse and reconcile a batch of supplier documents.
///
/// Per-file and per-item failures come back inside the report; only an empty
/// request is rejected outright.
pub async fn batch_intake(
    State(service): State<Arc<IntakeService>>,
    Json(req): Json<IntakeRequest>,
) -> Response {
    if req.documents.is_empty() {
        let response = IntakeResponse {
            success: false,
            message: "no documents submitted".to_string(),
            report: None,
        };
        return (StatusCode::BAD_REQUEST, Json(response)).into_response();
    }

    let ctx = IntakeContext {
        company_id: req.company_id,
        branch_id: req.branch_id,
        user_id: req.user_id,
    };
    let report = service.batch_intake(ctx, &req.documents).await;

    let response = IntakeResponse {
        success: report.is_clean(),
        message: format!(
            "Processed {} documents, {} items ({} created, {} updated, {} failed)",
            report.documents.len(),
            report.items_processed,
            report.created,
            report.updated,
            report.failed
        ),
        report: Some(report),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// CSV template download
pub async fn inventory_template() -> Response {
    match ReportService::template_csv() {
        Ok(csv) => csv_attachment("plantilla_inventario.csv", csv),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
    }
}

/// CSV inventory report for one company/branch
pub async fn inventory_report(
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ReportQuery>,
) -> Response {
    match service
        .inventory_report_csv(query.company_id, query.branch_id)
        .await
    {
        Ok(csv) => csv_attachment("reporte_inventario.csv", csv),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
    }
}

fn csv_attachment(file_name: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}
