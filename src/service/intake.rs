use crate::models::{DocumentUpload, SupplierDocument};
use crate::parser::{self, DocumentFormat, ParseError};
use crate::pricing::PricingPolicy;
use crate::service::reconciler::{IntakeContext, ReconcileOutcome, StockReconciler};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use sqlx::PgPool;

/// Per-document outcome of a batch intake
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub file_name: String,
    pub format: Option<DocumentFormat>,
    pub proveedor: Option<String>,
    pub costo_total: Option<i64>,
    pub items_parsed: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Parse failure for this file, contained here instead of aborting the batch
    pub error: Option<String>,
}

impl DocumentReport {
    fn parse_failure(file_name: &str, error: &ParseError) -> Self {
        Self {
            file_name: file_name.to_string(),
            format: None,
            proveedor: None,
            costo_total: None,
            items_parsed: 0,
            created: 0,
            updated: 0,
            failed: 0,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate outcome of a batch intake
#[derive(Debug, Default, Serialize)]
pub struct IntakeReport {
    pub documents: Vec<DocumentReport>,
    pub items_processed: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl IntakeReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.documents.iter().all(|doc| doc.error.is_none())
    }
}

/// Parse-only result for one uploaded file
#[derive(Debug, Serialize)]
pub struct DocumentPreview {
    pub file_name: String,
    pub document: Option<SupplierDocument>,
    pub error: Option<String>,
}

/// Orchestrates an upload session: per-file extraction, then sequential
/// item-by-item reconciliation. Failures stay contained to the file or item
/// that caused them.
pub struct IntakeService {
    reconciler: StockReconciler,
    policy: PricingPolicy,
}

impl IntakeService {
    pub fn new(pool: PgPool, policy: PricingPolicy) -> Self {
        Self {
            reconciler: StockReconciler::new(pool, policy),
            policy,
        }
    }

    /// Extract every upload without touching the catalog
    pub fn preview(&self, uploads: &[DocumentUpload]) -> Vec<DocumentPreview> {
        uploads
            .iter()
            .map(|upload| match self.parse_upload(upload) {
                Ok(document) => DocumentPreview {
                    file_name: upload.file_name.clone(),
                    document: Some(document),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Documento {} no se pudo leer: {}", upload.file_name, e);
                    DocumentPreview {
                        file_name: upload.file_name.clone(),
                        document: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }

    /// Parse and reconcile the whole batch, best effort: a broken file or a
    /// failed item is reported and skipped, never fatal to the session.
    pub async fn batch_intake(
        &self,
        ctx: IntakeContext,
        uploads: &[DocumentUpload],
    ) -> IntakeReport {
        let mut report = IntakeReport::default();

        for upload in uploads {
            let document_report = match self.parse_upload(upload) {
                Ok(document) => self.reconcile_document(&ctx, &document).await,
                Err(e) => {
                    tracing::error!("Documento {} no se pudo leer: {}", upload.file_name, e);
                    DocumentReport::parse_failure(&upload.file_name, &e)
                }
            };

            report.items_processed += document_report.items_parsed;
            report.created += document_report.created;
            report.updated += document_report.updated;
            report.failed += document_report.failed;
            report.documents.push(document_report);
        }

        tracing::info!(
            "Ingreso completado: {} documentos, {} items ({} creados, {} actualizados, {} fallidos)",
            report.documents.len(),
            report.items_processed,
            report.created,
            report.updated,
            report.failed
        );
        report
    }

    /// Strictly sequential: one item finishes (or fails) before the next starts
    async fn reconcile_document(
        &self,
        ctx: &IntakeContext,
        document: &SupplierDocument,
    ) -> DocumentReport {
        let mut created = 0;
        let mut updated = 0;
        let mut failed = 0;

        for item in &document.items {
            match self
                .reconciler
                .reconcile_item(ctx, item, &document.file_name)
                .await
            {
                Ok(ReconcileOutcome::Created { .. }) => created += 1,
                Ok(ReconcileOutcome::Updated { .. }) => updated += 1,
                Err(e) => {
                    tracing::error!(
                        "Item {} de {} no se pudo conciliar: {}",
                        item.name,
                        document.file_name,
                        e
                    );
                    failed += 1;
                }
            }
        }

        tracing::info!(
            "Documento {}: {} items, {} creados, {} actualizados, {} fallidos",
            document.file_name,
            document.items.len(),
            created,
            updated,
            failed
        );

        DocumentReport {
            file_name: document.file_name.clone(),
            format: document.format,
            proveedor: document.proveedor.clone(),
            costo_total: document.costo_total,
            items_parsed: document.items.len(),
            created,
            updated,
            failed,
            error: None,
        }
    }

    fn parse_upload(&self, upload: &DocumentUpload) -> Result<SupplierDocument, ParseError> {
        let data = decode_payload(upload)?;
        parser::extract_document(
            &upload.file_name,
            upload.mime_type.as_deref(),
            &data,
            &self.policy,
        )
    }
}

/// Text uploads travel as-is; spreadsheet binaries travel base64-encoded
fn decode_payload(upload: &DocumentUpload) -> Result<Vec<u8>, ParseError> {
    if let Some(content) = &upload.content {
        return Ok(content.clone().into_bytes());
    }
    if let Some(encoded) = &upload.content_base64 {
        return BASE64
            .decode(encoded)
            .map_err(|e| ParseError::Payload(e.to_string()));
    }
    Err(ParseError::Payload("document has no content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_payloads_pass_through() {
        let upload = DocumentUpload {
            file_name: "stock.csv".to_string(),
            mime_type: None,
            content: Some("Producto,Cantidad,Costo\n".to_string()),
            content_base64: None,
        };
        assert_eq!(decode_payload(&upload).unwrap(), b"Producto,Cantidad,Costo\n");
    }

    #[test]
    fn base64_payloads_are_decoded() {
        let upload = DocumentUpload {
            file_name: "lista.xlsx".to_string(),
            mime_type: None,
            content: None,
            content_base64: Some("aG9sYQ==".to_string()),
        };
        assert_eq!(decode_payload(&upload).unwrap(), b"hola");
    }

    #[test]
    fn missing_and_broken_payloads_are_parse_errors() {
        let empty = DocumentUpload {
            file_name: "nada.csv".to_string(),
            mime_type: None,
            content: None,
            content_base64: None,
        };
        assert!(matches!(
            decode_payload(&empty),
            Err(ParseError::Payload(_))
        ));

        let broken = DocumentUpload {
            file_name: "lista.xlsx".to_string(),
            mime_type: None,
            content: None,
            content_base64: Some("!!no-base64!!".to_string()),
        };
        assert!(matches!(
            decode_payload(&broken),
            Err(ParseError::Payload(_))
        ));
    }
}
