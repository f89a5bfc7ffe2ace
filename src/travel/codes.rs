//! Airport, hotel-city and landmark lookups for Umrah travel.

const AIRPORT_CODES: &[(&str, &str)] = &[
    ("jeddah", "JED"),
    ("medina", "MED"),
    ("madinah", "MED"),
    ("makkah", "JED"),
    ("mecca", "JED"),
    ("new york", "JFK"),
    ("los angeles", "LAX"),
    ("london", "LHR"),
    ("manchester", "MAN"),
    ("dubai", "DXB"),
    ("istanbul", "IST"),
    ("riyadh", "RUH"),
];

const CITY_CODES: &[(&str, &str)] = &[
    ("makkah", "MEC"),
    ("mecca", "MEC"),
    ("medina", "MED"),
    ("madinah", "MED"),
    ("jeddah", "JED"),
    ("riyadh", "RUH"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const MASJID_AL_HARAM: Landmark = Landmark {
    name: "Masjid al-Haram (Makkah)",
    latitude: 21.4225,
    longitude: 39.8262,
};

pub const MASJID_AN_NABAWI: Landmark = Landmark {
    name: "Masjid an-Nabawi (Medina)",
    latitude: 24.4672,
    longitude: 39.6111,
};

fn lookup(table: &[(&str, &'static str)], city: &str) -> Option<&'static str> {
    let key = city.trim().to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
}

/// IATA airport code serving a city. Makkah maps to Jeddah.
pub fn airport_code(city: &str) -> Option<&'static str> {
    lookup(AIRPORT_CODES, city)
}

/// IATA city code used by hotel searches.
pub fn city_code(city: &str) -> Option<&'static str> {
    lookup(CITY_CODES, city)
}

/// The Haram nearest to a holy city.
pub fn landmark_for(city: &str) -> Option<Landmark> {
    match city.trim().to_lowercase().as_str() {
        "makkah" | "mecca" => Some(MASJID_AL_HARAM),
        "medina" | "madinah" => Some(MASJID_AN_NABAWI),
        _ => None,
    }
}

pub fn is_holy_city(city: &str) -> bool {
    landmark_for(city).is_some()
}

/// `{"error": ...}` text for a hotel city outside the supported list.
pub fn unknown_city_error(city: &str) -> String {
    serde_json::json!({
        "error": format!("Unknown city: {}. Please use 'Makkah' or 'Medina'", city)
    })
    .to_string()
}

/// Human-readable airport lookup result, as returned to agents.
pub fn airport_code_message(city: &str) -> String {
    match airport_code(city) {
        Some(code) => format!("Airport code for {}: {}", city, code),
        None => format!(
            "Airport code not found for {}. Common codes: JED (Jeddah), MED (Medina), JFK (New York), LAX (Los Angeles), MAN (Manchester)",
            city
        ),
    }
}

/// Human-readable city code lookup result, as returned to agents.
pub fn city_code_message(city: &str) -> String {
    match city_code(city) {
        Some(code) => format!("City code for {}: {}", city, code),
        None => format!(
            "City code not found for {}. Common codes: MEC (Makkah), MED (Medina), JED (Jeddah)",
            city
        ),
    }
}
