use super::codes::{city_code, landmark_for, unknown_city_error};
use super::{FlightQuery, FlightSearch, HotelQuery, HotelSearch};
use crate::gateway::GatewayClient;
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::instrument;

pub const SEARCH_FLIGHTS_TOOL: &str = "amadeus-api___searchFlights";
pub const HOTELS_BY_LOCATION_TOOL: &str = "amadeus-api___searchHotelsByLocation";
pub const HOTELS_BY_CITY_TOOL: &str = "amadeus-api___searchHotelsByCity";

/// Flight and hotel search through the gateway's Amadeus tools.
pub struct GatewayTravel {
    client: Arc<GatewayClient>,
}

impl GatewayTravel {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        Self { client }
    }
}

/// Arguments for `amadeus-api___searchFlights`.
pub fn flight_arguments(query: &FlightQuery) -> Value {
    let mut args = Map::new();
    args.insert("originLocationCode".into(), json!(query.origin.to_uppercase()));
    args.insert(
        "destinationLocationCode".into(),
        json!(query.destination.to_uppercase()),
    );
    args.insert(
        "departureDate".into(),
        json!(query.departure_date.format("%Y-%m-%d").to_string()),
    );
    args.insert("adults".into(), json!(query.adults));
    args.insert("max".into(), json!(query.max_results));

    if let Some(return_date) = query.return_date {
        args.insert(
            "returnDate".into(),
            json!(return_date.format("%Y-%m-%d").to_string()),
        );
    }

    let travel_class = query.travel_class.to_uppercase();
    if !travel_class.is_empty() && travel_class != "ECONOMY" {
        args.insert("travelClass".into(), json!(travel_class));
    }

    if query.non_stop {
        args.insert("nonStop".into(), json!(true));
    }

    Value::Object(args)
}

/// Tool name and arguments for a hotel search, or the error text for an
/// unknown city.
pub fn hotel_request(query: &HotelQuery) -> std::result::Result<(&'static str, Value), String> {
    if query.near_haram {
        if let Some(landmark) = landmark_for(&query.city) {
            return Ok((
                HOTELS_BY_LOCATION_TOOL,
                json!({
                    "latitude": landmark.latitude,
                    "longitude": landmark.longitude,
                    "radius": 2,
                    "radiusUnit": "KM"
                }),
            ));
        }
    }

    match city_code(&query.city) {
        Some(code) => Ok((
            HOTELS_BY_CITY_TOOL,
            json!({
                "cityCode": code,
                "radius": 5,
                "radiusUnit": "KM"
            }),
        )),
        None => Err(unknown_city_error(&query.city)),
    }
}

#[async_trait]
impl FlightSearch for GatewayTravel {
    #[instrument(skip(self), fields(origin = %query.origin, destination = %query.destination))]
    async fn search_flights(&self, query: &FlightQuery) -> Result<String> {
        self.client
            .call_tool(SEARCH_FLIGHTS_TOOL, flight_arguments(query))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "gateway"
    }
}

#[async_trait]
impl HotelSearch for GatewayTravel {
    #[instrument(skip(self), fields(city = %query.city))]
    async fn search_hotels(&self, query: &HotelQuery) -> Result<String> {
        match hotel_request(query) {
            Ok((tool, arguments)) => self.client.call_tool(tool, arguments).await,
            Err(error_text) => Ok(error_text),
        }
    }

    fn backend_name(&self) -> &'static str {
        "gateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn flight_query() -> FlightQuery {
        FlightQuery {
            origin: "jfk".to_string(),
            destination: "jed".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            return_date: None,
            adults: 2,
            travel_class: "economy".to_string(),
            non_stop: false,
            max_results: 5,
        }
    }

    fn hotel_query(city: &str, near_haram: bool) -> HotelQuery {
        HotelQuery {
            city: city.to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 3, 21).unwrap(),
            adults: 2,
            star_rating: None,
            near_haram,
            max_results: 10,
        }
    }

    #[test]
    fn test_economy_one_way_arguments() {
        let args = flight_arguments(&flight_query());
        assert_eq!(args["originLocationCode"], "JFK");
        assert_eq!(args["destinationLocationCode"], "JED");
        assert_eq!(args["departureDate"], "2026-03-15");
        assert_eq!(args["adults"], 2);
        assert_eq!(args["max"], 5);
        assert!(args.get("travelClass").is_none());
        assert!(args.get("nonStop").is_none());
        assert!(args.get("returnDate").is_none());
    }

    #[test]
    fn test_business_direct_return_arguments() {
        let mut query = flight_query();
        query.travel_class = "business".to_string();
        query.non_stop = true;
        query.return_date = NaiveDate::from_ymd_opt(2026, 3, 25);

        let args = flight_arguments(&query);
        assert_eq!(args["travelClass"], "BUSINESS");
        assert_eq!(args["nonStop"], true);
        assert_eq!(args["returnDate"], "2026-03-25");
    }

    #[test]
    fn test_near_haram_uses_landmark() {
        let (tool, args) = hotel_request(&hotel_query("Mecca", true)).unwrap();
        assert_eq!(tool, HOTELS_BY_LOCATION_TOOL);
        assert_eq!(args["latitude"], 21.4225);
        assert_eq!(args["radius"], 2);

        let (_, args) = hotel_request(&hotel_query("Madinah", true)).unwrap();
        assert_eq!(args["longitude"], 39.6111);
    }

    #[test]
    fn test_city_search() {
        let (tool, args) = hotel_request(&hotel_query("Makkah", false)).unwrap();
        assert_eq!(tool, HOTELS_BY_CITY_TOOL);
        assert_eq!(args["cityCode"], "MEC");
        assert_eq!(args["radius"], 5);

        let (tool, args) = hotel_request(&hotel_query("Jeddah", true)).unwrap();
        assert_eq!(tool, HOTELS_BY_CITY_TOOL);
        assert_eq!(args["cityCode"], "JED");
    }

    #[test]
    fn test_unknown_city() {
        let error = hotel_request(&hotel_query("Taif", true)).unwrap_err();
        let parsed: Value = serde_json::from_str(&error).unwrap();
        assert_eq!(
            parsed["error"],
            "Unknown city: Taif. Please use 'Makkah' or 'Medina'"
        );
    }
}
