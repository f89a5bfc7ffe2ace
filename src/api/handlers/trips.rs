use crate::{
    types::{GeneratedTrip, TripRequest},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TripResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<GeneratedTrip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(TripResponse {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

/// Generate a complete trip plan
///
/// Agent failures fall back to a sample plan (`source = "mock"`); only an
/// unreadable request body or an out-of-range traveler count fails the call.
#[utoipa::path(
    post,
    path = "/api/generate-trip",
    request_body = TripRequest,
    responses(
        (status = 200, description = "Generated trip", body = TripResponse),
        (status = 400, description = "Traveler count out of range", body = TripResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Request could not be processed", body = TripResponse)
    ),
    tag = "trips",
    security(("api_key" = []))
)]
pub async fn generate_trip(
    State(state): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!(error = %rejection.body_text(), "Error generating trip");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text());
        }
    };

    let max_travelers = state.config_manager.config().planner.max_travelers;
    if !(1..=max_travelers).contains(&request.num_travelers) {
        warn!(travelers = request.num_travelers, "Rejected trip request");
        return failure(
            StatusCode::BAD_REQUEST,
            format!("Number of travelers must be between 1 and {}", max_travelers),
        );
    }

    info!(travelers = request.num_travelers, "Generating trip plan");
    let trip = state.planner().generate(&request).await;

    Json(TripResponse {
        success: true,
        data: Some(trip),
        error: None,
    })
    .into_response()
}
