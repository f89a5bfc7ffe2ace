use super::codes::{city_code, landmark_for, unknown_city_error, Landmark};
use super::{FlightQuery, FlightSearch, HotelQuery, HotelSearch};
use crate::auth::{ClientCredentials, TokenCache};
use crate::types::{AppError, Result};
use crate::utils::toml_config::{AmadeusConfig, ClientAuthMethod};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// The hotel-offers endpoint accepts at most this many hotel ids.
const MAX_HOTEL_IDS: usize = 50;
const NEAR_LANDMARK_RADIUS_KM: u32 = 2;
const CITY_RADIUS_KM: u32 = 5;

// ============= Response shapes =============

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FlightOffer {
    id: Option<String>,
    itineraries: Vec<Itinerary>,
    price: OfferPrice,
    number_of_bookable_seats: Option<u32>,
    validating_airline_codes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Itinerary {
    duration: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Segment {
    departure: Value,
    arrival: Value,
    carrier_code: String,
    number: String,
    duration: String,
    aircraft: Option<Aircraft>,
    cabin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Aircraft {
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OfferPrice {
    total: Option<String>,
    currency: Option<String>,
    base: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelListing {
    hotel_id: String,
    #[serde(default)]
    distance: Option<Distance>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct Distance {
    value: Option<f64>,
    unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HotelAvailability {
    hotel: HotelInfo,
    offers: Vec<HotelOffer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HotelInfo {
    hotel_id: Option<String>,
    name: Option<String>,
    rating: Option<Value>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Address,
    amenities: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Address {
    lines: Vec<String>,
    city_name: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HotelOffer {
    price: OfferPrice,
    room: Room,
    policies: Policies,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Room {
    #[serde(rename = "type")]
    room_type: Option<String>,
    type_estimated: RoomEstimate,
    description: RoomDescription,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RoomEstimate {
    category: Option<String>,
    beds: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RoomDescription {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Policies {
    cancellation: Option<Value>,
    payment_type: Option<String>,
}

// ============= Client =============

/// Direct client for the Amadeus self-service REST APIs.
pub struct AmadeusClient {
    base_url: String,
    currency: String,
    http: reqwest::Client,
    token: TokenCache,
}

impl AmadeusClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let credentials = ClientCredentials {
            token_endpoint: format!("{}/v1/security/oauth2/token", base_url),
            client_id: api_key.into(),
            client_secret: api_secret.into(),
            scope: None,
            method: ClientAuthMethod::Form,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            currency: currency.into(),
            token: TokenCache::with_client(credentials, http.clone()),
            http,
        })
    }

    pub fn from_config(config: &AmadeusConfig) -> Result<Self> {
        let key = read_env(&config.api_key_env)?;
        let secret = read_env(&config.api_secret_env)?;
        Self::new(&config.base_url, key, secret, &config.currency)
    }

    /// Search flight offers and simplify them for the flight agent.
    #[instrument(skip(self), fields(origin = %query.origin, destination = %query.destination))]
    pub async fn flight_offers(&self, query: &FlightQuery) -> Result<Value> {
        let origin = query.origin.to_uppercase();
        let destination = query.destination.to_uppercase();
        let departure = query.departure_date.format("%Y-%m-%d").to_string();

        let mut params = vec![
            ("originLocationCode", origin.clone()),
            ("destinationLocationCode", destination.clone()),
            ("departureDate", departure.clone()),
            ("adults", query.adults.to_string()),
            ("travelClass", query.travel_class.to_uppercase()),
            ("nonStop", query.non_stop.to_string()),
            ("max", query.max_results.to_string()),
            ("currencyCode", self.currency.clone()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
        }

        let offers: DataEnvelope<FlightOffer> = self.get("/v2/shopping/flight-offers", &params).await?;

        if offers.data.is_empty() {
            return Ok(json!({
                "error": "No flights found",
                "message": format!(
                    "No flights available from {} to {} on {}",
                    origin, destination, departure
                )
            }));
        }

        let flights: Vec<Value> = offers
            .data
            .iter()
            .take(query.max_results as usize)
            .map(|offer| simplify_flight(offer, &self.currency))
            .collect();

        Ok(json!({
            "success": true,
            "count": flights.len(),
            "flights": flights
        }))
    }

    /// Hotels within a radius of a landmark, priced for the requested stay.
    #[instrument(skip(self, query), fields(landmark = landmark.name))]
    pub async fn hotels_near(&self, landmark: Landmark, query: &HotelQuery) -> Result<Value> {
        let mut params = vec![
            ("latitude", landmark.latitude.to_string()),
            ("longitude", landmark.longitude.to_string()),
            ("radius", NEAR_LANDMARK_RADIUS_KM.to_string()),
            ("radiusUnit", "KM".to_string()),
            ("hotelSource", "ALL".to_string()),
        ];
        push_ratings(&mut params, query);

        let listings: DataEnvelope<HotelListing> = self
            .get("/v1/reference-data/locations/hotels/by-geocode", &params)
            .await?;

        if listings.data.is_empty() {
            return Ok(json!({
                "error": "No hotels found",
                "message": format!(
                    "No hotels near coordinates ({}, {})",
                    landmark.latitude, landmark.longitude
                )
            }));
        }

        let listings: Vec<HotelListing> = listings
            .data
            .into_iter()
            .take(query.max_results as usize)
            .collect();
        let ids: Vec<String> = listings.iter().map(|l| l.hotel_id.clone()).collect();
        let distances: HashMap<String, Distance> = listings
            .into_iter()
            .filter_map(|l| l.distance.map(|d| (l.hotel_id, d)))
            .collect();

        let mut result = self.hotel_offers(&ids, query).await?;
        if let Some(hotels) = result.get_mut("hotels").and_then(Value::as_array_mut) {
            for hotel in hotels {
                let distance = hotel
                    .get("hotel_id")
                    .and_then(Value::as_str)
                    .and_then(|id| distances.get(id));
                if let Some(distance) = distance {
                    hotel["distance_to_landmark"] = json!({
                        "value": distance.value,
                        "unit": distance.unit
                    });
                }
            }
        }

        Ok(result)
    }

    /// Hotels in an IATA city, priced for the requested stay.
    #[instrument(skip(self, query))]
    pub async fn hotels_in_city(&self, city_code: &str, query: &HotelQuery) -> Result<Value> {
        let mut params = vec![
            ("cityCode", city_code.to_string()),
            ("radius", CITY_RADIUS_KM.to_string()),
            ("radiusUnit", "KM".to_string()),
            ("hotelSource", "ALL".to_string()),
        ];
        push_ratings(&mut params, query);

        let listings: DataEnvelope<HotelListing> = self
            .get("/v1/reference-data/locations/hotels/by-city", &params)
            .await?;

        if listings.data.is_empty() {
            return Ok(json!({
                "error": "No hotels found",
                "message": format!("No hotels available in city code {}", city_code)
            }));
        }

        let ids: Vec<String> = listings
            .data
            .into_iter()
            .take(query.max_results as usize)
            .map(|l| l.hotel_id)
            .collect();

        self.hotel_offers(&ids, query).await
    }

    /// Best-rate offers for specific hotels.
    pub async fn hotel_offers(&self, hotel_ids: &[String], query: &HotelQuery) -> Result<Value> {
        let check_in = query.check_in.format("%Y-%m-%d").to_string();
        let check_out = query.check_out.format("%Y-%m-%d").to_string();
        let ids: Vec<&str> = hotel_ids
            .iter()
            .take(MAX_HOTEL_IDS)
            .map(String::as_str)
            .collect();

        let params = vec![
            ("hotelIds", ids.join(",")),
            ("checkInDate", check_in.clone()),
            ("checkOutDate", check_out.clone()),
            ("adults", query.adults.to_string()),
            ("roomQuantity", "1".to_string()),
            ("currency", self.currency.clone()),
            ("bestRateOnly", "true".to_string()),
        ];

        let offers: DataEnvelope<HotelAvailability> =
            self.get("/v3/shopping/hotel-offers", &params).await?;

        if offers.data.is_empty() {
            return Ok(json!({
                "error": "No hotel offers found",
                "message": "No availability for the selected dates"
            }));
        }

        let nights = query.nights();
        let hotels: Vec<Value> = offers
            .data
            .iter()
            .filter_map(|h| simplify_hotel(h, nights, &check_in, &check_out, &self.currency))
            .collect();

        Ok(json!({
            "success": true,
            "count": hotels.len(),
            "hotels": hotels,
            "check_in": check_in,
            "check_out": check_out
        }))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut response = self.send(&url, params).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Amadeus rejected access token, refreshing");
            self.token.invalidate().await;
            response = self.send(&url, params).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Amadeus returned {} for {}: {}",
                status,
                path,
                body.chars().take(300).collect::<String>()
            )));
        }

        debug!(path, "Amadeus request succeeded");

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid Amadeus response: {}", e)))
    }

    async fn send(&self, url: &str, params: &[(&str, String)]) -> Result<reqwest::Response> {
        let token = self.token.bearer_token().await?;
        self.http
            .get(url)
            .bearer_auth(token)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Amadeus request failed: {}", e)))
    }
}

#[async_trait]
impl FlightSearch for AmadeusClient {
    async fn search_flights(&self, query: &FlightQuery) -> Result<String> {
        Ok(self.flight_offers(query).await?.to_string())
    }

    fn backend_name(&self) -> &'static str {
        "amadeus"
    }
}

#[async_trait]
impl HotelSearch for AmadeusClient {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<String> {
        if query.near_haram {
            if let Some(landmark) = landmark_for(&query.city) {
                return Ok(self.hotels_near(landmark, query).await?.to_string());
            }
        }

        match city_code(&query.city) {
            Some(code) => Ok(self.hotels_in_city(code, query).await?.to_string()),
            None => Ok(unknown_city_error(&query.city)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "amadeus"
    }
}

fn read_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| AppError::Configuration(format!("Environment variable '{}' is not set", name)))
}

fn push_ratings(params: &mut Vec<(&str, String)>, query: &HotelQuery) {
    let ratings = query.ratings();
    if !ratings.is_empty() {
        let joined: Vec<String> = ratings.iter().map(u8::to_string).collect();
        params.push(("ratings", joined.join(",")));
    }
}

fn simplify_flight(offer: &FlightOffer, default_currency: &str) -> Value {
    let leg = |itinerary: &Itinerary| {
        let first = itinerary.segments.first();
        let last = itinerary.segments.last();
        json!({
            "departure": first.map(|s| s.departure.clone()).unwrap_or_else(|| json!({})),
            "arrival": last.map(|s| s.arrival.clone()).unwrap_or_else(|| json!({})),
            "duration": itinerary.duration,
            "stops": itinerary.segments.len().saturating_sub(1),
        })
    };

    let mut outbound = offer.itineraries.first().map(leg).unwrap_or_else(|| json!({}));
    let segments: Vec<Value> = offer
        .itineraries
        .first()
        .map(|it| {
            it.segments
                .iter()
                .map(|seg| {
                    json!({
                        "airline": seg.carrier_code,
                        "flight_number": format!("{}{}", seg.carrier_code, seg.number),
                        "departure": seg.departure,
                        "arrival": seg.arrival,
                        "duration": seg.duration,
                        "aircraft": seg.aircraft.as_ref().and_then(|a| a.code.clone()),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    outbound["segments"] = Value::Array(segments);

    let inbound = offer
        .itineraries
        .get(1)
        .filter(|it| !it.segments.is_empty())
        .map(leg);

    let cabin = offer
        .itineraries
        .first()
        .and_then(|it| it.segments.first())
        .and_then(|s| s.cabin.clone())
        .unwrap_or_else(|| "ECONOMY".to_string());

    json!({
        "id": offer.id,
        "price": {
            "total": offer.price.total,
            "currency": offer.price.currency.as_deref().unwrap_or(default_currency),
            "per_person": offer.price.total,
        },
        "outbound": outbound,
        "return": inbound,
        "seats_available": offer
            .number_of_bookable_seats
            .map(Value::from)
            .unwrap_or_else(|| json!("Unknown")),
        "cabin_class": cabin,
        "validating_airline": offer.validating_airline_codes.first().cloned().unwrap_or_default(),
    })
}

/// `None` when the hotel has no offer for the dates.
fn simplify_hotel(
    availability: &HotelAvailability,
    nights: i64,
    check_in: &str,
    check_out: &str,
    default_currency: &str,
) -> Option<Value> {
    let offer = availability.offers.first()?;
    let hotel = &availability.hotel;

    let total: f64 = offer
        .price
        .total
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or(0.0);
    let per_night = if nights > 0 { total / nights as f64 } else { 0.0 };

    Some(json!({
        "hotel_id": hotel.hotel_id,
        "name": hotel.name.as_deref().unwrap_or("Unknown Hotel"),
        "rating": hotel.rating,
        "latitude": hotel.latitude,
        "longitude": hotel.longitude,
        "address": {
            "lines": hotel.address.lines,
            "city": hotel.address.city_name,
            "country": hotel.address.country_code,
        },
        "amenities": hotel.amenities,
        "price": {
            "total": offer.price.total,
            "currency": offer.price.currency.as_deref().unwrap_or(default_currency),
            "per_night": per_night,
            "nights": nights,
            "base": offer.price.base,
        },
        "room": {
            "type": offer.room.room_type,
            "category": offer.room.type_estimated.category,
            "beds": offer.room.type_estimated.beds,
            "description": offer.room.description.text,
        },
        "policies": {
            "cancellation": offer.policies.cancellation,
            "payment_type": offer.policies.payment_type,
        },
        "check_in": check_in,
        "check_out": check_out,
    }))
}
