//! Travel API backends
//!
//! Flight and hotel searches sit behind the [`FlightSearch`] and
//! [`HotelSearch`] traits. The backend is chosen in `[travel]`:
//!
//! | Backend | Flights | Hotels | Auth |
//! |---------|---------|--------|------|
//! | `gateway` | ✅ | ✅ | gateway OAuth |
//! | `amadeus` | ✅ | ✅ | Amadeus client credentials |
//! | `booking` | - | ✅ | RapidAPI key |
//!
//! Every backend returns the text handed to the agent (usually JSON).
//! "Nothing found" is a successful `{"error": ...}` payload; transport
//! failures are `Err`.

/// Amadeus REST client.
pub mod amadeus;
/// Booking.com (RapidAPI) hotel client.
pub mod booking;
/// City, airport and landmark lookups.
pub mod codes;
/// Searches routed through the MCP gateway.
pub mod gateway;

use crate::gateway::GatewayClient;
use crate::types::{AppError, Result};
use crate::utils::toml_config::{FlightBackend, HotelBackend, UmrahConfig};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use amadeus::AmadeusClient;
pub use booking::BookingClient;
pub use gateway::GatewayTravel;

/// Parameters of a flight search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default = "default_travel_class")]
    pub travel_class: String,
    #[serde(default)]
    pub non_stop: bool,
    #[serde(default = "default_max_flights")]
    pub max_results: u32,
}

fn default_adults() -> u32 {
    1
}

fn default_travel_class() -> String {
    "ECONOMY".to_string()
}

fn default_max_flights() -> u32 {
    5
}

/// Parameters of a hotel search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelQuery {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub adults: u32,
    /// Comma separated star ratings, e.g. "4,5"
    #[serde(default)]
    pub star_rating: Option<String>,
    #[serde(default = "default_near_haram")]
    pub near_haram: bool,
    #[serde(default = "default_max_hotels")]
    pub max_results: u32,
}

fn default_guests() -> u32 {
    2
}

fn default_near_haram() -> bool {
    true
}

fn default_max_hotels() -> u32 {
    10
}

impl HotelQuery {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Star ratings parsed from `star_rating`; invalid entries are skipped.
    pub fn ratings(&self) -> Vec<u8> {
        self.star_rating
            .as_deref()
            .map(|s| {
                s.split(',')
                    .filter_map(|r| r.trim().parse::<u8>().ok())
                    .filter(|r| (1..=5).contains(r))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search_flights(&self, query: &FlightQuery) -> Result<String>;

    fn backend_name(&self) -> &'static str;
}

#[async_trait]
pub trait HotelSearch: Send + Sync {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<String>;

    fn backend_name(&self) -> &'static str;
}

/// Flight and hotel backends selected by `[travel]`.
#[derive(Clone, Default)]
pub struct TravelServices {
    pub flights: Option<Arc<dyn FlightSearch>>,
    pub hotels: Option<Arc<dyn HotelSearch>>,
}

impl TravelServices {
    /// Build the configured backends.
    ///
    /// A gateway backend without `[gateway].url` is left unset; the search
    /// tools then report that flight or hotel search is unavailable.
    pub fn from_config(config: &UmrahConfig) -> Result<Self> {
        let gateway = GatewayClient::from_config(&config.gateway)?.map(Arc::new);

        let needs_amadeus = config.travel.flight_backend == FlightBackend::Amadeus
            || config.travel.hotel_backend == HotelBackend::Amadeus;
        let amadeus = if needs_amadeus {
            Some(Arc::new(AmadeusClient::from_config(&config.amadeus)?))
        } else {
            None
        };

        let flights: Option<Arc<dyn FlightSearch>> = match config.travel.flight_backend {
            FlightBackend::Gateway => gateway
                .clone()
                .map(|g| Arc::new(GatewayTravel::new(g)) as Arc<dyn FlightSearch>),
            FlightBackend::Amadeus => amadeus.clone().map(|a| a as Arc<dyn FlightSearch>),
        };

        let hotels: Option<Arc<dyn HotelSearch>> = match config.travel.hotel_backend {
            HotelBackend::Gateway => {
                gateway.map(|g| Arc::new(GatewayTravel::new(g)) as Arc<dyn HotelSearch>)
            }
            HotelBackend::Amadeus => amadeus.map(|a| a as Arc<dyn HotelSearch>),
            HotelBackend::Booking => Some(Arc::new(BookingClient::from_config(&config.booking)?)),
        };

        Ok(Self { flights, hotels })
    }

    pub fn flights(&self) -> Result<&Arc<dyn FlightSearch>> {
        self.flights
            .as_ref()
            .ok_or_else(|| AppError::Configuration("Flight search is not configured".to_string()))
    }

    pub fn hotels(&self) -> Result<&Arc<dyn HotelSearch>> {
        self.hotels
            .as_ref()
            .ok_or_else(|| AppError::Configuration("Hotel search is not configured".to_string()))
    }
}
