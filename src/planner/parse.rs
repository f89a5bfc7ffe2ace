//! Free-text parsing of the orchestrator's answer.
//!
//! The orchestrator is asked to number its flight options
//! (`Option 1 (Morning) - $748.26`) and list hotels per city
//! (`1. Le Meridien Makkah (380m from Haram)`). Anything that does not
//! match falls back to sample options so a plan can always be shown.

use crate::types::{FlightLeg, FlightOption, HotelOption, TripRequest};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_FLIGHTS: usize = 5;
pub const MAX_HOTELS_PER_CITY: usize = 3;

const DEFAULT_AIRLINE: &str = "Turkish Airlines";
const DEFAULT_DEPARTURE: &str = "MAN";
const PARSED_DURATION: &str = "13h 15m";
const PARSED_STOPS: &str = "1 stop (IST)";
const BAGGAGE: &str = "2 x 23kg checked bags";

/// Characters after an option header searched when no next option follows.
const OPTION_WINDOW: usize = 500;
/// Characters after an outbound leg searched for "next day".
const NEXT_DAY_WINDOW: usize = 20;

static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Option\s+(\d+)\s*\(([^)]+)\)\s*-\s*\$?([\d,]+\.?\d*)")
        .expect("option pattern is valid")
});

static AIRLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)through\s+([A-Z][a-zA-Z\s]+(?:Airlines?|Airways?))")
        .expect("airline pattern is valid")
});

static OUTBOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Outbound:\s*([A-Z]{3})\s+([\d:]+)\s*→\s*([A-Z]{3})\s+([\d:]+)")
        .expect("outbound pattern is valid")
});

static RETURN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Return:\s*([A-Z]{3})\s+([\d:]+)\s*→\s*([A-Z]{3})\s+([\d:]+)")
        .expect("return pattern is valid")
});

static MAKKAH_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Makkah[^:]*:(.*?)(?:Madinah|DETAILED|RECOMMENDATIONS|$)")
        .expect("makkah section pattern is valid")
});

static MADINAH_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Madinah[^:]*:(.*?)(?:DETAILED|RECOMMENDATIONS|$)")
        .expect("madinah section pattern is valid")
});

static HOTEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\.\s+([^(]+)\s*\((\d+)m\s+from\s+Haram\)")
        .expect("hotel pattern is valid")
});

/// Byte offset `chars` characters after `start`, clamped to the end of `text`.
fn advance_chars(text: &str, start: usize, chars: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| start + offset)
        .unwrap_or(text.len())
}

fn leg_text(re: &Regex, section: &str) -> Option<(String, usize, usize)> {
    re.captures(section).and_then(|caps| {
        let whole = caps.get(0)?;
        Some((
            format!("{} {} → {} {}", &caps[1], &caps[2], &caps[3], &caps[4]),
            whole.start(),
            whole.end(),
        ))
    })
}

/// Flight options found in `text`, at most [`MAX_FLIGHTS`]; one default
/// option when none parse.
pub fn parse_flights_from_text(text: &str, request: &TripRequest) -> Vec<FlightOption> {
    let options: Vec<regex::Captures> = OPTION_RE.captures_iter(text).collect();
    let base_airline = AIRLINE_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| DEFAULT_AIRLINE.to_string());
    let departure_airport = request.departure_airport_or(DEFAULT_DEPARTURE);

    let mut flights = Vec::new();
    for (i, caps) in options.iter().enumerate() {
        let Some(header) = caps.get(0) else { continue };
        let Ok(price) = caps[3].replace(',', "").parse::<f64>() else {
            continue;
        };
        let time_label = caps[2].trim();

        let start = header.end();
        let end = match options.get(i + 1).and_then(|next| next.get(0)) {
            Some(next) => next.start(),
            None => advance_chars(text, start, OPTION_WINDOW),
        };
        let section = &text[start..end.max(start)];

        let outbound = match leg_text(&OUTBOUND_RE, section) {
            Some((mut leg, leg_start, leg_end)) => {
                let window_end = advance_chars(section, leg_end, NEXT_DAY_WINDOW);
                if section[leg_start..window_end]
                    .to_lowercase()
                    .contains("next day")
                {
                    leg.push_str(" +1");
                }
                leg
            }
            None => format!("{} → JED", departure_airport),
        };

        let inbound = leg_text(&RETURN_RE, section)
            .map(|(leg, _, _)| leg)
            .unwrap_or_else(|| format!("JED → {}", departure_airport));

        flights.push(FlightOption {
            airline: format!("{} ({})", base_airline, time_label),
            price: price as u32,
            currency: request.currency().to_string(),
            cabin_class: request.flight_preferences.cabin_class.clone(),
            baggage: BAGGAGE.to_string(),
            outbound: parsed_leg(outbound),
            return_leg: parsed_leg(inbound),
        });
    }

    if flights.is_empty() {
        flights.push(default_flight(request));
    }

    flights.truncate(MAX_FLIGHTS);
    flights
}

fn parsed_leg(departure: String) -> FlightLeg {
    FlightLeg {
        departure,
        arrival: String::new(),
        duration: PARSED_DURATION.to_string(),
        stops: PARSED_STOPS.to_string(),
    }
}

fn default_flight(request: &TripRequest) -> FlightOption {
    let dates = &request.travel_dates;
    let origin = request.departure_airport_or("Origin");
    let arrival_city = dates
        .arrival_city
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("Jeddah");
    let return_city = dates
        .departure_city
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(arrival_city);

    FlightOption {
        airline: "Available Flight Option".to_string(),
        price: 850,
        currency: request.currency().to_string(),
        cabin_class: request.flight_preferences.cabin_class.clone(),
        baggage: BAGGAGE.to_string(),
        outbound: FlightLeg {
            departure: format!("{} 10:30 AM", origin),
            arrival: format!("{} 6:45 AM +1", arrival_city),
            duration: "12h 30m".to_string(),
            stops: "Direct".to_string(),
        },
        return_leg: FlightLeg {
            departure: format!("{} 11:30 PM", return_city),
            arrival: format!("{} 6:15 AM +1", origin),
            duration: "13h 45m".to_string(),
            stops: "Direct".to_string(),
        },
    }
}

fn is_makkah(city: &str) -> bool {
    let city = city.to_lowercase();
    city.contains("makkah") || city.contains("mecca")
}

fn stars_for(name: &str) -> u8 {
    let name = name.to_lowercase();
    if ["mövenpick", "moevenpick", "shaza"]
        .iter()
        .any(|brand| name.contains(brand))
    {
        4
    } else {
        5
    }
}

/// Hotel options for `city` found in `text`, at most
/// [`MAX_HOTELS_PER_CITY`]; two defaults when none parse.
pub fn parse_hotels_from_text(text: &str, city: &str, request: &TripRequest) -> Vec<HotelOption> {
    let makkah = is_makkah(city);
    let section_re: &Regex = if makkah {
        &MAKKAH_SECTION_RE
    } else {
        &MADINAH_SECTION_RE
    };
    let nights = if makkah { 5 } else { 3 };
    let currency = request.currency();

    let mut hotels: Vec<HotelOption> = section_re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|section| {
            HOTEL_RE
                .captures_iter(section.as_str())
                .filter_map(|caps| {
                    let name = caps[2].trim().to_string();
                    let distance: u32 = caps[3].parse().ok()?;
                    let stars = stars_for(&name);
                    let price_per_night = match (distance < 400, stars == 5) {
                        (true, true) => 200,
                        (true, false) => 150,
                        (false, true) => 180,
                        (false, false) => 130,
                    };

                    Some(HotelOption {
                        name,
                        stars,
                        distance: format!("{}m from Haram", distance),
                        price_per_night,
                        total_price: price_per_night * nights,
                        currency: currency.to_string(),
                        amenities: ["WiFi", "Breakfast", "Restaurant", "Elevator", "Haram View"]
                            .iter()
                            .map(|a| a.to_string())
                            .collect(),
                        rating: 8.5 + (f64::from(stars) - 3.0) * 0.5,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if hotels.is_empty() {
        hotels = default_hotels(makkah, currency);
    }

    hotels.truncate(MAX_HOTELS_PER_CITY);
    hotels
}

fn default_hotels(makkah: bool, currency: &str) -> Vec<HotelOption> {
    let hotel = |name: &str, stars: u8, distance: &str, per_night: u32, total: u32, rating: f64| {
        let mut amenities = vec!["WiFi", "Breakfast"];
        if stars == 5 {
            amenities.push("Haram View");
        }
        amenities.push("Restaurant");
        HotelOption {
            name: name.to_string(),
            stars,
            distance: distance.to_string(),
            price_per_night: per_night,
            total_price: total,
            currency: currency.to_string(),
            amenities: amenities.into_iter().map(str::to_string).collect(),
            rating,
        }
    };

    if makkah {
        vec![
            hotel("Makkah Hotel Near Haram", 5, "200m from Haram", 180, 900, 9.0),
            hotel("Makkah Budget Hotel", 4, "400m from Haram", 150, 750, 8.5),
        ]
    } else {
        vec![
            hotel("Madinah Hotel Near Haram", 5, "100m from Haram", 150, 450, 9.0),
            hotel("Madinah Budget Hotel", 4, "300m from Haram", 120, 360, 8.5),
        ]
    }
}
