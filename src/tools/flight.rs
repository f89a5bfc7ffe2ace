use crate::tools::registry::{parse_args, Tool};
use crate::travel::codes::airport_code_message;
use crate::travel::{FlightQuery, TravelServices};
use crate::types::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Live flight search through the configured flight backend.
pub struct SearchFlightsTool {
    travel: TravelServices,
}

impl SearchFlightsTool {
    pub fn new(travel: TravelServices) -> Self {
        Self { travel }
    }
}

#[async_trait]
impl Tool for SearchFlightsTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Search for real flights using the Amadeus API. Returns JSON with prices, times and airlines."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "description": "Departure airport code (e.g., 'JFK', 'LAX', 'MAN')"
                },
                "destination": {
                    "type": "string",
                    "description": "Arrival airport code - use 'JED' for Jeddah or 'MED' for Medina"
                },
                "departure_date": {
                    "type": "string",
                    "description": "Departure date in YYYY-MM-DD format"
                },
                "return_date": {
                    "type": "string",
                    "description": "Return date in YYYY-MM-DD format (omit for one-way)"
                },
                "adults": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of adult passengers (default: 1)"
                },
                "travel_class": {
                    "type": "string",
                    "enum": ["ECONOMY", "PREMIUM_ECONOMY", "BUSINESS", "FIRST"]
                },
                "non_stop": {
                    "type": "boolean",
                    "description": "True for direct flights only"
                }
            },
            "required": ["origin", "destination", "departure_date"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query: FlightQuery = parse_args(self.name(), args)?;

        let backend = match self.travel.flights() {
            Ok(backend) => backend,
            Err(e) => return Ok(json!({ "error": e.to_string() })),
        };

        Ok(Value::String(backend.search_flights(&query).await?))
    }
}

#[derive(Debug, Deserialize)]
struct CityArgs {
    city_name: String,
}

pub struct AirportCodeTool;

#[async_trait]
impl Tool for AirportCodeTool {
    fn name(&self) -> &str {
        "get_airport_code"
    }

    fn description(&self) -> &str {
        "Get the IATA airport code for a city name."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city_name": {
                    "type": "string",
                    "description": "Name of the city (e.g., 'New York', 'Jeddah')"
                }
            },
            "required": ["city_name"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: CityArgs = parse_args(self.name(), args)?;
        Ok(Value::String(airport_code_message(&args.city_name)))
    }
}
