//! Trip planning
//!
//! The orchestrator answers in free text. [`parse`] pulls flight and hotel
//! options out of that text, [`plan`] assembles a [`TripPlan`](crate::types::TripPlan)
//! around them, and [`TripPlanner`] ties both to an
//! [`AgentInvoker`](crate::runtime::AgentInvoker) with a sample-plan fallback.

pub mod parse;
pub mod plan;
mod service;

pub use parse::{parse_flights_from_text, parse_hotels_from_text};
pub use plan::{
    generate_mock_trip_plan, generate_trip_plan_from_ai, selection_breakdown, AiResponses,
    Pricing, Selection,
};
pub use service::TripPlanner;
