use axum::{
    routing::{get, post},
    Router,
};
use inventory_intake_rust::{api, create_pool, AppConfig, IntakeService, ReportService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");

    let intake = Arc::new(IntakeService::new(pool.clone(), config.pricing));
    let reports = Arc::new(ReportService::new(pool));

    let intake_routes = Router::new()
        .route("/api/intake/preview", post(api::preview_documents))
        .route("/api/intake/batch", post(api::batch_intake))
        .with_state(intake);

    let report_routes = Router::new()
        .route("/api/inventory/template", get(api::inventory_template))
        .route("/api/inventory/report", get(api::inventory_report))
        .with_state(reports);

    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(intake_routes)
        .merge(report_routes)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/intake/preview     - parse supplier documents");
    info!("  POST /api/intake/batch       - parse and reconcile into inventory");
    info!("  GET  /api/inventory/template - CSV template download");
    info!("  GET  /api/inventory/report   - CSV inventory report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
