//! HTTP surface
//!
//! One route matters: `GET /` regenerates both charts from their fixed
//! constants and returns the composed page. Nothing is cached. Chart
//! drawing is CPU-bound synchronous work, so it runs on the blocking
//! thread pool.

pub mod page;

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error};

use crate::churn::{churn_figure, ChurnTable};
use crate::error::DashboardError;
use crate::forecast::{forecast_figure, ForecastTemplate};
use crate::render::render_png;

pub fn router() -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/healthz", get(healthz))
}

/// Liveness probe
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Root page: both charts generated fresh, embedded inline
pub async fn dashboard() -> Result<Html<String>, (StatusCode, &'static str)> {
    match build_dashboard_page().await {
        Ok(page) => Ok(Html(page)),
        Err(err) => {
            error!("dashboard request failed: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "chart rendering failed"))
        }
    }
}

/// Generate and render both charts, then compose the page
pub async fn build_dashboard_page() -> Result<String, DashboardError> {
    let forecast_task = tokio::task::spawn_blocking(render_forecast_chart);
    let churn_task = tokio::task::spawn_blocking(render_churn_chart);

    let (forecast_png, churn_png) = tokio::try_join!(forecast_task, churn_task)
        .map_err(|e| DashboardError::render(format!("blocking render task failed: {e}")))?;
    let forecast_png = forecast_png?;
    let churn_png = churn_png?;

    debug!(
        "rendered charts: forecast {} bytes, churn {} bytes",
        forecast_png.len(),
        churn_png.len()
    );
    Ok(page::render_page(&forecast_png, &churn_png))
}

/// Generate the forecast series and render its chart to PNG
pub fn render_forecast_chart() -> Result<Vec<u8>, DashboardError> {
    let (history, forecast) = ForecastTemplate::new().generate()?;
    render_png(&forecast_figure(&history, &forecast))
}

/// Rank the churn factors and render their chart to PNG
pub fn render_churn_chart() -> Result<Vec<u8>, DashboardError> {
    let ranked = ChurnTable::new().ranked()?;
    render_png(&churn_figure(&ranked))
}
