//! Tools callable by agents
//!
//! # Module Structure
//!
//! - [`registry`](crate::tools::registry) - the [`Tool`](registry::Tool) trait and [`ToolRegistry`]
//! - [`flight`](crate::tools::flight) - flight search and airport code lookup
//! - [`hotel`](crate::tools::hotel) - hotel search and city code lookup
//! - [`delegate`](crate::tools::delegate) - orchestrator tools that call the specialist agents
//!
//! Specialist agents get their tools from [`specialist_tools`]; the
//! orchestrator gets the delegation tools from [`orchestrator_tools`]. The two
//! sets never mix, so a specialist cannot call back into another agent.
//!
//! ```ignore
//! let registry = specialist_tools(&config, &travel);
//! let result = registry
//!     .execute("get_airport_code", json!({"city_name": "Medina"}))
//!     .await?;
//! ```

/// Orchestrator delegation tools.
pub mod delegate;
/// Flight agent tools.
pub mod flight;
/// Hotel agent tools.
pub mod hotel;
/// Tool registry for managing available tools.
pub mod registry;

pub use registry::{Tool, ToolRegistry};

use crate::runtime::AgentInvoker;
use crate::travel::TravelServices;
use crate::utils::toml_config::UmrahConfig;
use std::sync::Arc;

/// Every tool name the crate provides; `[agents.*].tools` may only name these.
pub const BUILTIN_TOOL_NAMES: &[&str] = &[
    "search_flights",
    "get_airport_code",
    "search_hotels",
    "get_city_code",
    "search_flights_agent",
    "search_hotels_agent",
    "get_visa_info",
    "create_itinerary",
];

/// Tools used by the flight and hotel agents.
pub fn specialist_tools(config: &UmrahConfig, travel: &TravelServices) -> ToolRegistry {
    let mut registry = ToolRegistry::with_config(config);
    registry.register(Arc::new(flight::SearchFlightsTool::new(travel.clone())));
    registry.register(Arc::new(flight::AirportCodeTool));
    registry.register(Arc::new(hotel::SearchHotelsTool::new(travel.clone())));
    registry.register(Arc::new(hotel::CityCodeTool));
    registry
}

/// Delegation tools used by the orchestrator.
pub fn orchestrator_tools(config: &UmrahConfig, invoker: Arc<dyn AgentInvoker>) -> ToolRegistry {
    let mut registry = ToolRegistry::with_config(config);
    for tool in delegate::DelegateTool::all(invoker) {
        registry.register(Arc::new(tool));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialist_tools() {
        let registry = specialist_tools(&UmrahConfig::default(), &TravelServices::default());
        assert_eq!(
            registry.tool_names(),
            vec!["get_airport_code", "get_city_code", "search_flights", "search_hotels"]
        );
    }

    #[test]
    fn test_builtin_names_cover_every_tool() {
        let registry = specialist_tools(&UmrahConfig::default(), &TravelServices::default());
        for name in registry.tool_names() {
            assert!(BUILTIN_TOOL_NAMES.contains(&name.as_str()));
        }
        for name in ["search_flights_agent", "search_hotels_agent", "get_visa_info", "create_itinerary"] {
            assert!(BUILTIN_TOOL_NAMES.contains(&name));
        }
    }
}
