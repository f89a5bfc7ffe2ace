//! Building a [`TripPlan`] from agent output or from sample data.

use crate::planner::parse::{parse_flights_from_text, parse_hotels_from_text};
use crate::types::{
    Activity, AiInsights, CostBreakdown, FlightLeg, FlightOption, HotelOption, HotelOptions,
    Itinerary, ItineraryDay, TravelerVisa, TripPlan, TripRequest, VisaSummary,
};
use crate::utils::toml_config::PlannerConfig;
use chrono::Days;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Share of the budget quoted as the plan's total cost.
const QUOTED_SHARE: f64 = 0.95;
/// Subtotal above which a selection earns the discount.
const DISCOUNT_THRESHOLD: i64 = 2000;

/// Fees applied to every plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub visa_fee: u32,
    pub service_fee: u32,
    pub discount: u32,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            visa_fee: 150,
            service_fee: 100,
            discount: 200,
        }
    }
}

impl From<&PlannerConfig> for Pricing {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            visa_fee: config.visa_fee,
            service_fee: config.service_fee,
            discount: config.discount,
        }
    }
}

/// Text returned by each agent; only the orchestrator is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(default)]
pub struct AiResponses {
    pub orchestrator: String,
    pub flight: String,
    pub hotel: String,
    pub visa: String,
    pub itinerary: String,
}

/// Chosen options by index into a plan's flights and hotels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Selection {
    pub flight: Option<usize>,
    pub makkah_hotel: Option<usize>,
    pub madinah_hotel: Option<usize>,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.flight.is_some() && self.makkah_hotel.is_some() && self.madinah_hotel.is_some()
    }
}

fn visa_summary(request: &TripRequest, pricing: &Pricing) -> VisaSummary {
    let currency = request.currency();
    let travelers = request
        .travelers
        .iter()
        .map(|t| TravelerVisa {
            name: t.name.clone(),
            nationality: t.nationality.clone(),
            visa_type: "Umrah Visa (90 days)".to_string(),
            processing_time: "3-5 business days".to_string(),
            validity: "90 days from issue".to_string(),
            cost: pricing.visa_fee,
            currency: currency.to_string(),
            required_documents: [
                "Valid passport (min 6 months validity)",
                "Recent passport-size photo",
                "Confirmed hotel booking",
                "Return flight ticket",
                "Vaccination certificate (Meningitis)",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            application_steps: [
                "1. Complete online application at visa.visitsaudi.com",
                "2. Upload required documents",
                "3. Pay visa fee online",
                "4. Receive e-visa via email",
                "5. Print visa for immigration",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        })
        .collect();

    VisaSummary {
        currency: currency.to_string(),
        total_cost: i64::from(pricing.visa_fee) * i64::from(request.num_travelers),
        travelers,
    }
}

fn activities(items: &[(&str, &str)]) -> Vec<Activity> {
    items
        .iter()
        .map(|(time, description)| Activity {
            time: time.to_string(),
            description: description.to_string(),
        })
        .collect()
}

fn day_date(request: &TripRequest, day: u32) -> Option<chrono::NaiveDate> {
    request
        .travel_dates
        .departure
        .and_then(|d| d.checked_add_days(Days::new(u64::from(day.saturating_sub(1)))))
}

fn breakdown(
    currency: &str,
    flights: i64,
    hotels: i64,
    visa: i64,
    pricing: &Pricing,
    discount: i64,
) -> CostBreakdown {
    let service_fee = i64::from(pricing.service_fee);
    let subtotal = flights + hotels + visa + service_fee;
    CostBreakdown {
        currency: currency.to_string(),
        flights,
        hotels,
        visa,
        service_fee,
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

/// Structured plan from the orchestrator's free-text answer.
pub fn generate_trip_plan_from_ai(
    responses: &AiResponses,
    request: &TripRequest,
    pricing: &Pricing,
) -> TripPlan {
    let text = &responses.orchestrator;
    let flights = parse_flights_from_text(text, request);
    let makkah = parse_hotels_from_text(text, "Makkah", request);
    let madinah = parse_hotels_from_text(text, "Madinah", request);
    let travelers = i64::from(request.num_travelers);

    let flight_cost = flights
        .first()
        .map(|f| i64::from(f.price) * travelers)
        .unwrap_or(0);
    let hotel_cost = match (makkah.first(), madinah.first()) {
        (Some(m), Some(d)) => i64::from(m.total_price) + i64::from(d.total_price),
        _ => 0,
    };

    let itinerary = Itinerary {
        days: vec![ItineraryDay {
            day: 1,
            title: "Arrival & First Umrah".to_string(),
            location: "Makkah".to_string(),
            date: day_date(request, 1),
            activities: activities(&[
                ("06:45", "Arrive at airport"),
                ("09:30", "Transfer to Makkah"),
                ("11:00", "Check-in at hotel"),
                ("17:00", "Perform Umrah (Tawaf & Sa'i)"),
            ]),
            notes: None,
        }],
    };

    TripPlan {
        currency: request.currency().to_string(),
        total_cost: request.budget.total * QUOTED_SHARE,
        duration: request.travel_dates.duration,
        num_travelers: request.num_travelers,
        savings: request.budget.total * (1.0 - QUOTED_SHARE),
        visa: visa_summary(request, pricing),
        itinerary,
        cost_breakdown: breakdown(
            request.currency(),
            flight_cost,
            hotel_cost,
            i64::from(pricing.visa_fee) * travelers,
            pricing,
            i64::from(pricing.discount),
        ),
        ai_insights: Some(AiInsights {
            orchestrator_summary: responses.orchestrator.clone(),
            visa_details: responses.visa.clone(),
            flight_recommendations: responses.flight.clone(),
            hotel_recommendations: responses.hotel.clone(),
            itinerary_suggestions: responses.itinerary.clone(),
        }),
        flights,
        hotels: HotelOptions { makkah, madinah },
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_flight(
    request: &TripRequest,
    airline: &str,
    price: u32,
    baggage: &str,
    outbound: (&str, &str, &str),
    inbound: (&str, &str, &str),
    stops: &str,
) -> FlightOption {
    let origin = request.departure_airport_or("JFK");
    FlightOption {
        airline: airline.to_string(),
        price,
        currency: request.currency().to_string(),
        cabin_class: request.flight_preferences.cabin_class.clone(),
        baggage: baggage.to_string(),
        outbound: FlightLeg {
            departure: format!("{} {}", origin, outbound.0),
            arrival: outbound.1.to_string(),
            duration: outbound.2.to_string(),
            stops: stops.to_string(),
        },
        return_leg: FlightLeg {
            departure: inbound.0.to_string(),
            arrival: format!("{} {}", origin, inbound.1),
            duration: inbound.2.to_string(),
            stops: stops.to_string(),
        },
    }
}

fn sample_hotel(
    request: &TripRequest,
    name: &str,
    distance: &str,
    price_per_night: u32,
    total_price: u32,
    amenities: &[&str],
    rating: f64,
) -> HotelOption {
    HotelOption {
        name: name.to_string(),
        stars: 5,
        distance: distance.to_string(),
        price_per_night,
        total_price,
        currency: request.currency().to_string(),
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        rating,
    }
}

/// Sample plan used in demo mode and when the agents fail.
pub fn generate_mock_trip_plan(request: &TripRequest, pricing: &Pricing) -> TripPlan {
    let travelers = i64::from(request.num_travelers);

    let flights = vec![
        sample_flight(
            request,
            "Saudi Airlines",
            850,
            "2 x 23kg checked bags",
            ("10:30 AM", "JED 6:45 AM +1", "12h 15m"),
            ("JED 11:30 PM", "6:15 AM +1", "13h 45m"),
            "Direct",
        ),
        sample_flight(
            request,
            "Emirates",
            920,
            "2 x 30kg checked bags",
            ("11:45 PM", "JED 10:30 PM +1", "16h 45m"),
            ("JED 2:30 AM", "11:45 AM", "17h 15m"),
            "1 stop (DXB)",
        ),
    ];

    let hotels = HotelOptions {
        makkah: vec![
            sample_hotel(
                request,
                "Swissotel Makkah",
                "200m from Haram",
                180,
                900,
                &["WiFi", "Breakfast", "Haram View", "Restaurant", "Elevator"],
                9.2,
            ),
            sample_hotel(
                request,
                "Hilton Makkah Convention",
                "150m from Haram",
                220,
                1100,
                &["WiFi", "Breakfast", "Haram View", "Pool", "Spa"],
                9.5,
            ),
        ],
        madinah: vec![
            sample_hotel(
                request,
                "Pullman Zamzam Madinah",
                "100m from Haram",
                150,
                450,
                &["WiFi", "Breakfast", "Haram View", "Restaurant"],
                9.0,
            ),
            sample_hotel(
                request,
                "Oberoi Madinah",
                "50m from Haram",
                200,
                600,
                &["WiFi", "Breakfast", "Haram View", "Concierge", "Spa"],
                9.7,
            ),
        ],
    };

    let itinerary = Itinerary {
        days: vec![
            ItineraryDay {
                day: 1,
                title: "Arrival in Jeddah & Transfer to Makkah".to_string(),
                location: "Jeddah → Makkah".to_string(),
                date: day_date(request, 1),
                activities: activities(&[
                    ("06:45", "Arrive at Jeddah Airport"),
                    ("08:00", "Immigration & customs clearance"),
                    ("09:30", "Private transfer to Makkah (90 min)"),
                    ("11:00", "Check-in at hotel"),
                    ("13:00", "Rest and prepare for Umrah"),
                    ("16:00", "Enter Ihram state"),
                    ("17:00", "Perform Umrah (Tawaf & Sa'i)"),
                    ("20:00", "Dinner near Haram"),
                ]),
                notes: Some("Take it easy on first day. Stay hydrated.".to_string()),
            },
            ItineraryDay {
                day: 2,
                title: "Makkah - Worship & Ziyarat".to_string(),
                location: "Makkah".to_string(),
                date: day_date(request, 2),
                activities: activities(&[
                    ("05:00", "Fajr prayer at Masjid al-Haram"),
                    ("09:00", "Breakfast at hotel"),
                    ("11:00", "Visit Jabal al-Nour (Cave of Hira)"),
                    ("14:00", "Lunch and rest"),
                    ("16:00", "Prayers at Haram"),
                    ("19:00", "Visit Jannat al-Mu'alla cemetery"),
                    ("21:00", "Taraweeh/Tahajjud prayers"),
                ]),
                notes: None,
            },
            ItineraryDay {
                day: 3,
                title: "Transfer to Madinah".to_string(),
                location: "Makkah → Madinah".to_string(),
                date: day_date(request, 3),
                activities: activities(&[
                    ("08:00", "Fajr prayer and breakfast"),
                    ("10:00", "Check-out from hotel"),
                    ("11:00", "Depart for Madinah (4-5 hours)"),
                    ("16:00", "Arrive and check-in at Madinah hotel"),
                    ("17:30", "First visit to Masjid an-Nabawi"),
                    ("19:00", "Maghrib prayer at Prophet's Mosque"),
                    ("21:00", "Isha and Taraweeh prayers"),
                ]),
                notes: Some("Try to pray in Rawdah (the blessed garden)".to_string()),
            },
        ],
    };

    TripPlan {
        currency: request.currency().to_string(),
        total_cost: request.budget.total * QUOTED_SHARE,
        duration: request.travel_dates.duration,
        num_travelers: request.num_travelers,
        savings: request.budget.total * (1.0 - QUOTED_SHARE),
        flights,
        hotels,
        visa: visa_summary(request, pricing),
        itinerary,
        cost_breakdown: breakdown(
            request.currency(),
            850 * travelers,
            1350 * travelers,
            i64::from(pricing.visa_fee) * travelers,
            pricing,
            i64::from(pricing.discount),
        ),
        ai_insights: None,
    }
}

/// Costs of the selected options. Unselected items cost nothing; the
/// discount applies only above a 2000 subtotal.
pub fn selection_breakdown(plan: &TripPlan, selection: &Selection, pricing: &Pricing) -> CostBreakdown {
    let flights = selection
        .flight
        .and_then(|i| plan.flights.get(i))
        .map(|f| i64::from(f.price) * i64::from(plan.num_travelers))
        .unwrap_or(0);
    let hotel_total = |options: &[HotelOption], index: Option<usize>| {
        index
            .and_then(|i| options.get(i))
            .map(|h| i64::from(h.total_price))
            .unwrap_or(0)
    };
    let hotels = hotel_total(&plan.hotels.makkah, selection.makkah_hotel)
        + hotel_total(&plan.hotels.madinah, selection.madinah_hotel);
    let visa = plan.visa.total_cost;

    let subtotal = flights + hotels + visa + i64::from(pricing.service_fee);
    let discount = if subtotal > DISCOUNT_THRESHOLD {
        i64::from(pricing.discount)
    } else {
        0
    };

    breakdown(&plan.currency, flights, hotels, visa, pricing, discount)
}
