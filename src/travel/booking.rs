use super::codes::is_holy_city;
use super::{HotelQuery, HotelSearch};
use crate::types::{AppError, Result};
use crate::utils::toml_config::BookingConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

const DESTINATION_IDS: &[(&str, &str)] = &[
    ("makkah", "-2092611"),
    ("mecca", "-2092611"),
    ("medina", "-2096394"),
    ("madinah", "-2096394"),
    ("jeddah", "-2094342"),
    ("riyadh", "-2092174"),
];

/// Booking.com destination id for the Saudi cities we know about.
pub fn known_destination_id(city: &str) -> Option<&'static str> {
    let key = city.trim().to_lowercase();
    DESTINATION_IDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, id)| *id)
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    dest_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    result: Vec<HotelResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HotelResult {
    hotel_id: Option<Value>,
    hotel_name: Option<String>,
    class: Option<f64>,
    address: Option<String>,
    city: Option<String>,
    distance: Option<Value>,
    price_breakdown: PriceBreakdown,
    composite_price_breakdown: CompositePrice,
    min_total_price: Option<f64>,
    review_score: Option<f64>,
    review_score_word: Option<String>,
    review_nr: Option<u64>,
    hotel_facilities: Option<String>,
    unit_configuration_label: Option<String>,
    main_photo_url: Option<String>,
    url: Option<String>,
    is_free_cancellable: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceBreakdown {
    all_inclusive_price: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompositePrice {
    all_inclusive_amount: Amount,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Amount {
    value: Option<f64>,
    currency: Option<String>,
}

/// Hotel search against the Booking.com API on RapidAPI.
pub struct BookingClient {
    base_url: String,
    host: String,
    api_key: String,
    locale: String,
    currency: String,
    http: reqwest::Client,
}

impl BookingClient {
    pub fn new(
        base_url: impl Into<String>,
        host: impl Into<String>,
        api_key: impl Into<String>,
        locale: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            host: host.into(),
            api_key: api_key.into(),
            locale: locale.into(),
            currency: "USD".to_string(),
            http,
        })
    }

    pub fn from_config(config: &BookingConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            AppError::Configuration(format!(
                "Environment variable '{}' is not set",
                config.api_key_env
            ))
        })?;
        Self::new(&config.base_url, &config.host, api_key, &config.locale)
    }

    /// Destination id for a city, asking the locations endpoint for cities
    /// outside the built-in table.
    pub async fn destination_id(&self, city: &str) -> Result<Option<String>> {
        if let Some(id) = known_destination_id(city) {
            return Ok(Some(id.to_string()));
        }

        let locations: Vec<Location> = self
            .get(
                "/hotels/locations",
                &[("name", city.to_string()), ("locale", self.locale.clone())],
            )
            .await?;

        Ok(locations
            .into_iter()
            .next()
            .and_then(|l| l.dest_id)
            .map(|id| match id {
                Value::String(s) => s,
                other => other.to_string(),
            }))
    }

    /// Search hotels in a city and simplify the results.
    #[instrument(skip(self), fields(city = %query.city))]
    pub async fn hotels(&self, query: &HotelQuery) -> Result<Value> {
        let Some(dest_id) = self.destination_id(&query.city).await? else {
            return Ok(json!({
                "error": "City not found",
                "message": format!("Could not find destination ID for {}", query.city)
            }));
        };

        let mut params = vec![
            ("dest_id", dest_id),
            ("dest_type", "city".to_string()),
            ("checkin_date", query.check_in.format("%Y-%m-%d").to_string()),
            ("checkout_date", query.check_out.format("%Y-%m-%d").to_string()),
            ("adults_number", query.adults.to_string()),
            ("room_number", "1".to_string()),
            ("order_by", "popularity".to_string()),
            ("filter_by_currency", self.currency.clone()),
            ("locale", self.locale.clone()),
            ("units", "metric".to_string()),
            ("page_number", "0".to_string()),
        ];

        let ratings = query.ratings();
        if !ratings.is_empty() {
            let filters: Vec<String> = ratings.iter().map(|r| format!("class::{}", r)).collect();
            params.push(("categories_filter_ids", filters.join(",")));
        }

        let response: SearchResponse = self.get("/hotels/search", &params).await?;

        if response.result.is_empty() {
            return Ok(json!({
                "error": "No hotels found",
                "message": format!("No hotels available in {} for the selected dates", query.city)
            }));
        }

        let hotels: Vec<Value> = response
            .result
            .iter()
            .take(query.max_results as usize)
            .map(|h| simplify_hotel(h, &query.city))
            .collect();

        Ok(json!({
            "success": true,
            "count": hotels.len(),
            "hotels": hotels,
            "city": query.city
        }))
    }

    /// Full property record for one hotel.
    pub async fn hotel_details(&self, hotel_id: &str) -> Result<Value> {
        let hotel: Value = self
            .get(
                "/hotels/data",
                &[("hotel_id", hotel_id.to_string()), ("locale", self.locale.clone())],
            )
            .await?;

        Ok(json!({ "success": true, "hotel": hotel }))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Booking request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Booking returned {} for {}: {}",
                status,
                path,
                body.chars().take(300).collect::<String>()
            )));
        }

        debug!(path, "Booking request succeeded");

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid Booking response: {}", e)))
    }
}

#[async_trait]
impl HotelSearch for BookingClient {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<String> {
        Ok(self.hotels(query).await?.to_string())
    }

    fn backend_name(&self) -> &'static str {
        "booking"
    }
}

fn simplify_hotel(hotel: &HotelResult, city: &str) -> Value {
    let total = hotel
        .price_breakdown
        .all_inclusive_price
        .or(hotel.composite_price_breakdown.all_inclusive_amount.value)
        .or(hotel.min_total_price)
        .unwrap_or(0.0);
    let currency = hotel
        .price_breakdown
        .currency
        .clone()
        .or_else(|| hotel.composite_price_breakdown.all_inclusive_amount.currency.clone())
        .unwrap_or_else(|| "USD".to_string());

    let distance = hotel.distance.clone().unwrap_or_else(|| json!(""));
    let distance_to_haram = if is_holy_city(city) && hotel.distance.is_some() {
        distance.clone()
    } else {
        Value::Null
    };

    let amenities: Vec<&str> = hotel
        .hotel_facilities
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(|f| f.split(", ").collect())
        .unwrap_or_default();

    json!({
        "id": hotel.hotel_id,
        "name": hotel.hotel_name.as_deref().unwrap_or("Unknown Hotel"),
        "star_rating": hotel.class.unwrap_or(0.0),
        "address": hotel.address.as_deref().unwrap_or(""),
        "city": hotel.city.as_deref().unwrap_or(city),
        "distance_to_center": distance,
        "distance_to_haram": distance_to_haram,
        "price": {
            "total": total,
            "currency": currency,
            "per_night": total,
        },
        "rating": {
            "score": hotel.review_score.unwrap_or(0.0),
            "text": hotel.review_score_word.as_deref().unwrap_or(""),
            "count": hotel.review_nr.unwrap_or(0),
        },
        "amenities": amenities,
        "room_type": hotel.unit_configuration_label.as_deref().unwrap_or("Standard Room"),
        "photos": hotel.main_photo_url.iter().collect::<Vec<_>>(),
        "url": hotel.url.as_deref().unwrap_or(""),
        "is_free_cancellable": hotel.is_free_cancellable == Some(1),
        "latitude": hotel.latitude,
        "longitude": hotel.longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> BookingClient {
        BookingClient::new(server.uri(), "booking-com.p.rapidapi.com", "rapid-key", "en-us").unwrap()
    }

    fn query(city: &str) -> HotelQuery {
        HotelQuery {
            city: city.to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 3, 21).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 3, 24).unwrap(),
            adults: 2,
            star_rating: Some("4,5".to_string()),
            near_haram: true,
            max_results: 10,
        }
    }

    #[test]
    fn test_known_destinations() {
        assert_eq!(known_destination_id("Mecca"), Some("-2092611"));
        assert_eq!(known_destination_id(" madinah "), Some("-2096394"));
        assert_eq!(known_destination_id("Cairo"), None);
    }

    #[tokio::test]
    async fn test_search_parses_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hotels/search"))
            .and(header("X-RapidAPI-Key", "rapid-key"))
            .and(query_param("dest_id", "-2096394"))
            .and(query_param("categories_filter_ids", "class::4,class::5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{
                    "hotel_id": 101,
                    "hotel_name": "Pullman Zamzam Madinah",
                    "class": 5,
                    "distance": "0.2",
                    "price_breakdown": {"all_inclusive_price": 750.5, "currency": "USD"},
                    "review_score": 8.7,
                    "review_score_word": "Fabulous",
                    "review_nr": 1200,
                    "hotel_facilities": "WiFi, Parking",
                    "is_free_cancellable": 1
                }]
            })))
            .mount(&server)
            .await;

        let result = client(&server).hotels(&query("Medina")).await.unwrap();
        assert_eq!(result["count"], 1);
        let hotel = &result["hotels"][0];
        assert_eq!(hotel["name"], "Pullman Zamzam Madinah");
        assert_eq!(hotel["price"]["total"], 750.5);
        assert_eq!(hotel["distance_to_haram"], "0.2");
        assert_eq!(hotel["amenities"], json!(["WiFi", "Parking"]));
        assert_eq!(hotel["room_type"], "Standard Room");
        assert_eq!(hotel["is_free_cancellable"], true);
        assert_eq!(hotel["rating"]["text"], "Fabulous");
    }

    #[tokio::test]
    async fn test_unknown_city_uses_location_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hotels/locations"))
            .and(query_param("name", "Taif"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"dest_id": "-3000000"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hotels/search"))
            .and(query_param("dest_id", "-3000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
            .mount(&server)
            .await;

        let result = client(&server).hotels(&query("Taif")).await.unwrap();
        assert_eq!(result["error"], "No hotels found");
        assert_eq!(
            result["message"],
            "No hotels available in Taif for the selected dates"
        );
    }

    #[tokio::test]
    async fn test_unresolvable_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hotels/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = client(&server).hotels(&query("Atlantis")).await.unwrap();
        assert_eq!(result["error"], "City not found");
    }

    #[tokio::test]
    async fn test_hotel_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hotels/data"))
            .and(query_param("hotel_id", "101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Pullman"})))
            .mount(&server)
            .await;

        let result = client(&server).hotel_details("101").await.unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["hotel"]["name"], "Pullman");
    }
}
