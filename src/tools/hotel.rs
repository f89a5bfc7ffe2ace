use crate::tools::registry::{parse_args, Tool};
use crate::travel::codes::city_code_message;
use crate::travel::{HotelQuery, TravelServices};
use crate::types::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Live hotel search through the configured hotel backend.
pub struct SearchHotelsTool {
    travel: TravelServices,
}

impl SearchHotelsTool {
    pub fn new(travel: TravelServices) -> Self {
        Self { travel }
    }
}

#[async_trait]
impl Tool for SearchHotelsTool {
    fn name(&self) -> &str {
        "search_hotels"
    }

    fn description(&self) -> &str {
        "Search for real hotels in Makkah or Medina. Returns JSON with prices, ratings and distances to the Haram."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name - use 'Makkah' or 'Medina' for Umrah"
                },
                "check_in": {
                    "type": "string",
                    "description": "Check-in date in YYYY-MM-DD format"
                },
                "check_out": {
                    "type": "string",
                    "description": "Check-out date in YYYY-MM-DD format"
                },
                "adults": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of adult guests (default: 2)"
                },
                "star_rating": {
                    "type": "string",
                    "description": "Star rating filter - use '4,5' for 4 and 5 star hotels"
                },
                "near_haram": {
                    "type": "boolean",
                    "description": "Search near the Haram (default: true)"
                },
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of results (default: 10)"
                }
            },
            "required": ["city", "check_in", "check_out"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query: HotelQuery = parse_args(self.name(), args)?;

        let backend = match self.travel.hotels() {
            Ok(backend) => backend,
            Err(e) => return Ok(json!({ "error": e.to_string() })),
        };

        Ok(Value::String(backend.search_hotels(&query).await?))
    }
}

#[derive(Debug, Deserialize)]
struct CityArgs {
    city_name: String,
}

pub struct CityCodeTool;

#[async_trait]
impl Tool for CityCodeTool {
    fn name(&self) -> &str {
        "get_city_code"
    }

    fn description(&self) -> &str {
        "Get the IATA city code used for hotel search."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city_name": {
                    "type": "string",
                    "description": "Name of the city (e.g., 'Makkah', 'Medina')"
                }
            },
            "required": ["city_name"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: CityArgs = parse_args(self.name(), args)?;
        Ok(Value::String(city_code_message(&args.city_name)))
    }
}
