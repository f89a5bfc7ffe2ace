//! Trip request and trip plan types shared by the planner, wizard and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= Trip Request =============

/// Everything collected from the traveler before planning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct TripRequest {
    pub travel_dates: TravelDates,
    pub num_travelers: u32,
    pub travelers: Vec<Traveler>,
    pub hotel_preferences: HotelPreferences,
    pub budget: Budget,
    pub flight_preferences: FlightPreferences,
    pub special_requirements: SpecialRequirements,
}

impl TripRequest {
    /// Departure airport, falling back to `default` when unset or blank.
    pub fn departure_airport_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.travel_dates
            .departure_airport
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default)
    }

    pub fn currency(&self) -> &str {
        &self.budget.currency
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct TravelDates {
    pub departure_country: Option<String>,
    pub departure_airport: Option<String>,
    pub departure: Option<NaiveDate>,
    #[serde(rename = "return")]
    pub return_date: Option<NaiveDate>,
    pub duration: Option<u32>,
    pub arrival_city: Option<String>,
    pub departure_city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct Traveler {
    pub name: String,
    pub nationality: String,
    pub age: u32,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct HotelPreferences {
    pub makkah: CityHotelPreference,
    pub madinah: CityHotelPreference,
    pub room_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct CityHotelPreference {
    pub proximity: String,
    pub star_rating: u8,
    pub haram_view: bool,
    pub amenities: Vec<String>,
}

impl Default for CityHotelPreference {
    fn default() -> Self {
        Self {
            proximity: "Walking distance".to_string(),
            star_rating: 4,
            haram_view: false,
            amenities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct Budget {
    pub currency: String,
    pub per_person: f64,
    pub total: f64,
    pub flexibility: String,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            per_person: 0.0,
            total: 0.0,
            flexibility: "Moderate".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct FlightPreferences {
    pub cabin_class: String,
    pub direct_flights: bool,
    pub preferred_airlines: Vec<String>,
    pub baggage_extra: bool,
}

impl Default for FlightPreferences {
    fn default() -> Self {
        Self {
            cabin_class: "Economy".to_string(),
            direct_flights: true,
            preferred_airlines: Vec::new(),
            baggage_extra: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct SpecialRequirements {
    pub wheelchair_access: bool,
    pub elderly_travelers: bool,
    pub dietary_requirements: bool,
    pub female_only_group: bool,
    pub first_time_umrah: bool,
    pub group_coordinator: bool,
    pub additional_notes: String,
    pub custom_itinerary: String,
}

// ============= Trip Plan =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FlightLeg {
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub stops: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FlightOption {
    pub airline: String,
    /// Price per person.
    pub price: u32,
    pub currency: String,
    pub cabin_class: String,
    pub baggage: String,
    pub outbound: FlightLeg,
    #[serde(rename = "return")]
    pub return_leg: FlightLeg,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HotelOption {
    pub name: String,
    pub stars: u8,
    pub distance: String,
    pub price_per_night: u32,
    pub total_price: u32,
    pub currency: String,
    pub amenities: Vec<String>,
    pub rating: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HotelOptions {
    pub makkah: Vec<HotelOption>,
    pub madinah: Vec<HotelOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TravelerVisa {
    pub name: String,
    pub nationality: String,
    pub visa_type: String,
    pub processing_time: String,
    pub validity: String,
    pub cost: u32,
    pub currency: String,
    pub required_documents: Vec<String>,
    pub application_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct VisaSummary {
    pub currency: String,
    pub total_cost: i64,
    pub travelers: Vec<TravelerVisa>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Activity {
    pub time: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub location: String,
    pub date: Option<NaiveDate>,
    pub activities: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Itinerary {
    pub days: Vec<ItineraryDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CostBreakdown {
    pub currency: String,
    pub flights: i64,
    pub hotels: i64,
    pub visa: i64,
    pub service_fee: i64,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

/// Raw agent texts kept alongside the parsed plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AiInsights {
    pub orchestrator_summary: String,
    pub visa_details: String,
    pub flight_recommendations: String,
    pub hotel_recommendations: String,
    pub itinerary_suggestions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TripPlan {
    pub currency: String,
    pub total_cost: f64,
    pub duration: Option<u32>,
    pub num_travelers: u32,
    pub savings: f64,
    pub flights: Vec<FlightOption>,
    pub hotels: HotelOptions,
    pub visa: VisaSummary,
    pub itinerary: Itinerary,
    pub cost_breakdown: CostBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<AiInsights>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// Parsed from live agent output.
    Agents,
    /// Built-in sample data (demo mode or agent failure).
    Mock,
}

/// A generated plan together with the request it answers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedTrip {
    pub ai_response: Option<String>,
    pub user_data: TripRequest,
    pub generated_at: DateTime<Utc>,
    pub plan: TripPlan,
    pub source: PlanSource,
}
