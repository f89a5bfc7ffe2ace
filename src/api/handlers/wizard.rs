//! Trip wizard endpoints
//!
//! Every call returns the session's [`WizardSnapshot`]. Form submissions are
//! only accepted on the matching step; out-of-order calls get `409`.

use crate::{
    types::{AppError, HotelPreferences, Result},
    wizard::{
        BookingConfirmation, BookingDetails, BudgetForm, DatesForm, GenerationGuard,
        SelectionUpdate, TravelersForm, WizardSession, WizardSnapshot,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

fn snapshot(state: &AppState, session: &WizardSession) -> Json<WizardSnapshot> {
    Json(session.snapshot(state.planner().pricing()))
}

/// Apply `f` to the session and return its new snapshot.
fn step<F>(state: &AppState, id: Uuid, f: F) -> Result<Json<WizardSnapshot>>
where
    F: FnOnce(&mut WizardSession) -> Result<()>,
{
    let session = state.sessions.update(id, |session| {
        f(session)?;
        Ok(session.clone())
    })?;
    Ok(snapshot(state, &session))
}

/// Start a wizard session
#[utoipa::path(
    post,
    path = "/api/wizard",
    responses((status = 201, description = "New session on step 1", body = WizardSnapshot)),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<WizardSnapshot>) {
    let session = state.sessions.create();
    info!(session = %session.id, "Wizard session started");
    (StatusCode::CREATED, snapshot(&state, &session))
}

/// Get a wizard session
#[utoipa::path(
    get,
    path = "/api/wizard/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current session state", body = WizardSnapshot),
        (status = 404, description = "Unknown session")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>> {
    let session = state.sessions.get(id)?;
    Ok(snapshot(&state, &session))
}

/// Step 1: travel dates
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/dates",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = DatesForm,
    responses(
        (status = 200, description = "Dates accepted", body = WizardSnapshot),
        (status = 400, description = "Invalid dates"),
        (status = 409, description = "Session is on another step")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn submit_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<DatesForm>,
) -> Result<Json<WizardSnapshot>> {
    let limits = state.config_manager.config().planner.clone();
    let today = Utc::now().date_naive();
    step(&state, id, |s| s.submit_dates(&form, today, &limits))
}

/// Step 2: traveler details
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/travelers",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = TravelersForm,
    responses(
        (status = 200, description = "Travelers accepted", body = WizardSnapshot),
        (status = 400, description = "Invalid traveler details"),
        (status = 409, description = "Session is on another step")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn submit_travelers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<TravelersForm>,
) -> Result<Json<WizardSnapshot>> {
    let limits = state.config_manager.config().planner.clone();
    step(&state, id, |s| s.submit_travelers(&form, &limits))
}

/// Step 3: hotel preferences
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/hotels",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = HotelPreferences,
    responses(
        (status = 200, description = "Preferences accepted", body = WizardSnapshot),
        (status = 400, description = "Invalid star rating"),
        (status = 409, description = "Session is on another step")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn submit_hotels(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(preferences): Json<HotelPreferences>,
) -> Result<Json<WizardSnapshot>> {
    step(&state, id, |s| s.submit_hotels(&preferences))
}

/// Step 4: budget, flight preferences and special requirements
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/budget",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = BudgetForm,
    responses(
        (status = 200, description = "Budget accepted", body = WizardSnapshot),
        (status = 400, description = "Budget out of range or unsupported currency"),
        (status = 409, description = "Session is on another step")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn submit_budget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<BudgetForm>,
) -> Result<Json<WizardSnapshot>> {
    let limits = state.config_manager.config().planner.clone();
    step(&state, id, |s| s.submit_budget(&form, &limits))
}

/// Step 5: generate the trip plan
///
/// Only one generation may run per session at a time.
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/generate",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Plan generated, session on step 6", body = WizardSnapshot),
        (status = 409, description = "Generation already running or session on another step")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>> {
    let (guard, request) = GenerationGuard::begin(&state.sessions, id)?;
    info!(session = %id, "Generating trip plan");

    // Runs to completion even if the client disconnects.
    let planner = state.planner();
    let generated = tokio::spawn(async move {
        let trip = planner.generate(&request).await;
        guard.finish(trip)
    })
    .await;

    match generated {
        Ok(session) => Ok(snapshot(&state, &session?)),
        Err(e) => {
            error!(session = %id, error = %e, "Trip generation task failed");
            Err(AppError::Internal(format!("Trip generation failed: {}", e)))
        }
    }
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/back",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Previous step", body = WizardSnapshot),
        (status = 409, description = "Generation in progress")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>> {
    step(&state, id, |s| s.back())
}

/// Start over from step 1
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/reset",
    params(("id" = Uuid, Path, description = "Session id")),
    responses((status = 200, description = "Session cleared", body = WizardSnapshot)),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>> {
    step(&state, id, |s| {
        s.start_over();
        Ok(())
    })
}

/// Choose a flight and hotels from the generated plan
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/select",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SelectionUpdate,
    responses(
        (status = 200, description = "Selection and cost breakdown", body = WizardSnapshot),
        (status = 400, description = "Option index out of range"),
        (status = 409, description = "No plan generated yet")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn select(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<SelectionUpdate>,
) -> Result<Json<WizardSnapshot>> {
    step(&state, id, |s| s.select(update))
}

/// Confirm the booking
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/booking",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = BookingDetails,
    responses(
        (status = 200, description = "Booking recorded", body = BookingConfirmation),
        (status = 400, description = "Missing selection, mismatched emails or terms not accepted"),
        (status = 409, description = "No plan generated yet")
    ),
    tag = "wizard",
    security(("api_key" = []))
)]
pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(details): Json<BookingDetails>,
) -> Result<Json<BookingConfirmation>> {
    let pricing = *state.planner().pricing();
    let confirmation = state
        .sessions
        .update(id, |s| s.confirm_booking(&details, &pricing))?;
    info!(session = %id, reference = %confirmation.reference, "Booking confirmed");
    Ok(Json(confirmation))
}
