//! OpenAPI document, served at `/api-docs/openapi.json`.

use crate::api::handlers::{agents, health, invocations, trips, wizard};
use crate::planner::Selection;
use crate::types::{
    Activity, AgentType, AiInsights, Budget, CityHotelPreference, CostBreakdown, FlightLeg,
    FlightOption, FlightPreferences, GeneratedTrip, HotelOption, HotelOptions, HotelPreferences,
    InvocationRequest, InvocationResponse, InvocationStatus, Itinerary, ItineraryDay, PlanSource,
    SpecialRequirements, TravelDates, Traveler, TravelerVisa, TripPlan, TripRequest, VisaSummary,
};
use crate::wizard::{
    BookingConfirmation, BookingDetails, BudgetForm, DatesForm, PaymentMethod, SelectionUpdate,
    Step, TravelersForm, WizardSnapshot,
};
use axum::Json;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Umrah Planner API",
        description = "Multi-agent Umrah trip planning.

Protected endpoints take the shared API key as `Authorization: Bearer <key>`
or `X-API-Key: <key>`."
    ),
    paths(
        health::health,
        health::generate_trip_status,
        trips::generate_trip,
        agents::list_agents,
        invocations::invoke_agent,
        wizard::create_session,
        wizard::get_session,
        wizard::submit_dates,
        wizard::submit_travelers,
        wizard::submit_hotels,
        wizard::submit_budget,
        wizard::generate,
        wizard::back,
        wizard::reset,
        wizard::select,
        wizard::confirm_booking,
    ),
    components(schemas(
        health::HealthResponse,
        health::ServiceStatus,
        trips::TripResponse,
        agents::AgentInfo,
        AgentType,
        InvocationRequest,
        InvocationResponse,
        InvocationStatus,
        TripRequest,
        TravelDates,
        Traveler,
        HotelPreferences,
        CityHotelPreference,
        Budget,
        FlightPreferences,
        SpecialRequirements,
        GeneratedTrip,
        PlanSource,
        TripPlan,
        FlightOption,
        FlightLeg,
        HotelOptions,
        HotelOption,
        VisaSummary,
        TravelerVisa,
        Itinerary,
        ItineraryDay,
        Activity,
        CostBreakdown,
        AiInsights,
        Selection,
        Step,
        DatesForm,
        TravelersForm,
        BudgetForm,
        SelectionUpdate,
        BookingDetails,
        BookingConfirmation,
        PaymentMethod,
        WizardSnapshot,
    )),
    modifiers(&ApiKeyAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "trips", description = "One-shot trip generation"),
        (name = "agents", description = "Planning agents"),
        (name = "wizard", description = "Step-by-step trip wizard"),
    )
)]
pub struct ApiDoc;

struct ApiKeyAuth;

impl Modify for ApiKeyAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_wizard_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/wizard/{id}/booking"));
        assert!(doc.paths.paths.contains_key("/agents/{agent}/invocations"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("api_key")));
    }
}
