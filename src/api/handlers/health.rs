use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub message: &'static str,
    pub status: &'static str,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is running", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Status of the trip generation endpoint
#[utoipa::path(
    get,
    path = "/api/generate-trip",
    responses((status = 200, description = "Trip generation is available", body = ServiceStatus)),
    tag = "trips"
)]
pub async fn generate_trip_status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: "Trip generation API",
        status: "healthy",
    })
}
