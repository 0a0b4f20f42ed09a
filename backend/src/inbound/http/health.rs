//! Health endpoint for load balancers and liveness polling.

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Version reported by the health endpoint.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    #[schema(format = "date-time")]
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Report service liveness.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    ),
    tags = ["health"],
    operation_id = "health",
    security([])
)]
#[get("/health")]
pub async fn health() -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        success: true,
        message: "Feedback API is running".to_owned(),
        timestamp: Utc::now(),
        version: API_VERSION.to_owned(),
    })
}
