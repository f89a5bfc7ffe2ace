//! Wizard steps and the validation applied to each form.

use crate::types::{
    AppError, FlightPreferences, HotelPreferences, Result, SpecialRequirements, TravelDates,
    Traveler,
};
use crate::utils::toml_config::PlannerConfig;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shortest trip that does not produce a comfort warning.
const RECOMMENDED_TRIP_DAYS: u32 = 7;
const MAX_TRAVELER_AGE: u32 = 120;
const STAR_RATINGS: std::ops::RangeInclusive<u8> = 3..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    TravelDates,
    TravelerDetails,
    HotelPreferences,
    BudgetRequirements,
    ReviewGenerate,
    TripOptions,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::TravelDates,
        Step::TravelerDetails,
        Step::HotelPreferences,
        Step::BudgetRequirements,
        Step::ReviewGenerate,
        Step::TripOptions,
    ];

    /// 1-based position in the wizard.
    pub fn number(self) -> u8 {
        match self {
            Step::TravelDates => 1,
            Step::TravelerDetails => 2,
            Step::HotelPreferences => 3,
            Step::BudgetRequirements => 4,
            Step::ReviewGenerate => 5,
            Step::TripOptions => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::TravelDates => "Travel Dates",
            Step::TravelerDetails => "Traveler Details",
            Step::HotelPreferences => "Hotel Preferences",
            Step::BudgetRequirements => "Budget & Requirements",
            Step::ReviewGenerate => "Review & Generate Plan",
            Step::TripOptions => "Trip Options",
        }
    }

    pub fn next(self) -> Step {
        Self::ALL
            .get(self.number() as usize)
            .copied()
            .unwrap_or(Step::TripOptions)
    }

    pub fn previous(self) -> Step {
        match self.number() {
            1 => Step::TravelDates,
            n => Self::ALL[n as usize - 2],
        }
    }

    /// Fraction of the wizard completed, 0.0 on the first step and 1.0 on the last.
    pub fn progress(self) -> f64 {
        f64::from(self.number() - 1) / 5.0
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

// ============= Forms =============

/// Step 1 input.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatesForm {
    #[serde(default)]
    pub departure_country: Option<String>,
    #[serde(default)]
    pub departure_airport: Option<String>,
    pub departure: NaiveDate,
    #[serde(rename = "return")]
    pub return_date: NaiveDate,
    #[serde(default = "default_arrival_city")]
    pub arrival_city: String,
    /// "Same as arrival" or absent reuses the arrival city.
    #[serde(default)]
    pub departure_city: Option<String>,
}

fn default_arrival_city() -> String {
    "Jeddah (JED)".to_string()
}

/// Step 2 input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TravelersForm {
    pub travelers: Vec<Traveler>,
}

/// Step 4 input.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetForm {
    #[serde(default = "default_currency")]
    pub currency: String,
    pub per_person: f64,
    #[serde(default = "default_flexibility")]
    pub flexibility: String,
    #[serde(default)]
    pub flight_preferences: FlightPreferences,
    #[serde(default)]
    pub special_requirements: SpecialRequirements,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_flexibility() -> String {
    "Moderate".to_string()
}

// ============= Validation =============

/// Validated step 1 data plus any advisory warnings.
pub fn validate_dates(
    form: &DatesForm,
    today: NaiveDate,
    limits: &PlannerConfig,
) -> Result<(TravelDates, Vec<String>)> {
    let earliest = today
        .checked_add_days(Days::new(u64::from(limits.min_advance_days)))
        .ok_or_else(|| AppError::InvalidInput("Departure date is out of range".into()))?;
    if form.departure < earliest {
        return Err(AppError::InvalidInput(format!(
            "Departure must be on or after {} ({} days from today)",
            earliest, limits.min_advance_days
        )));
    }

    let duration = (form.return_date - form.departure).num_days();
    if duration < i64::from(limits.min_trip_days) {
        return Err(AppError::InvalidInput(format!(
            "Return must be at least {} days after departure",
            limits.min_trip_days
        )));
    }
    if duration > i64::from(limits.max_trip_days) {
        return Err(AppError::InvalidInput(format!(
            "Trips longer than {} days are not supported",
            limits.max_trip_days
        )));
    }
    let duration = duration as u32;

    let mut warnings = Vec::new();
    if duration < RECOMMENDED_TRIP_DAYS {
        warnings.push(
            "We recommend at least 7 days for a comfortable Umrah experience.".to_string(),
        );
    } else if duration > limits.warn_trip_days {
        warnings.push("Extended stays may require additional visa considerations.".to_string());
    }

    let departure_city = match form.departure_city.as_deref() {
        None | Some("Same as arrival") => form.arrival_city.clone(),
        Some(city) => city.to_string(),
    };

    let dates = TravelDates {
        departure_country: form.departure_country.clone(),
        departure_airport: form.departure_airport.clone(),
        departure: Some(form.departure),
        return_date: Some(form.return_date),
        duration: Some(duration),
        arrival_city: Some(form.arrival_city.clone()),
        departure_city: Some(departure_city),
    };
    Ok((dates, warnings))
}

pub fn validate_travelers(form: &TravelersForm, limits: &PlannerConfig) -> Result<Vec<Traveler>> {
    let count = form.travelers.len();
    if count == 0 || count > limits.max_travelers as usize {
        return Err(AppError::InvalidInput(format!(
            "Number of travelers must be between 1 and {}",
            limits.max_travelers
        )));
    }
    if form.travelers.iter().any(|t| t.name.trim().is_empty()) {
        return Err(AppError::InvalidInput(
            "Please fill in all traveler names".into(),
        ));
    }
    for traveler in &form.travelers {
        if !(1..=MAX_TRAVELER_AGE).contains(&traveler.age) {
            return Err(AppError::InvalidInput(format!(
                "Age for {} must be between 1 and {}",
                traveler.name, MAX_TRAVELER_AGE
            )));
        }
        if traveler.nationality.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Nationality is required for {}",
                traveler.name
            )));
        }
    }

    Ok(form
        .travelers
        .iter()
        .map(|t| Traveler {
            name: t.name.trim().to_string(),
            passport_number: t
                .passport_number
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            ..t.clone()
        })
        .collect())
}

pub fn validate_hotels(preferences: &HotelPreferences) -> Result<()> {
    for (city, pref) in [
        ("Makkah", &preferences.makkah),
        ("Madinah", &preferences.madinah),
    ] {
        if !STAR_RATINGS.contains(&pref.star_rating) {
            return Err(AppError::InvalidInput(format!(
                "{} hotel star rating must be between 3 and 5",
                city
            )));
        }
    }
    Ok(())
}

pub fn validate_budget(form: &BudgetForm, limits: &PlannerConfig) -> Result<()> {
    if !limits
        .currencies
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&form.currency))
    {
        return Err(AppError::InvalidInput(format!(
            "Unsupported currency '{}'. Supported: {}",
            form.currency,
            limits.currencies.join(", ")
        )));
    }
    if !form.per_person.is_finite()
        || form.per_person < limits.min_budget_per_person
        || form.per_person > limits.max_budget_per_person
    {
        return Err(AppError::InvalidInput(format!(
            "Budget per person must be between {} and {}",
            limits.min_budget_per_person, limits.max_budget_per_person
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn dates(departure: &str, return_date: &str) -> DatesForm {
        DatesForm {
            departure_country: Some("United Kingdom".into()),
            departure_airport: Some("Manchester (MAN)".into()),
            departure: departure.parse().unwrap(),
            return_date: return_date.parse().unwrap(),
            arrival_city: default_arrival_city(),
            departure_city: Some("Same as arrival".into()),
        }
    }

    fn traveler(name: &str, age: u32) -> Traveler {
        Traveler {
            name: name.into(),
            nationality: "United Kingdom".into(),
            age,
            gender: "Female".into(),
            passport_number: None,
        }
    }

    #[test]
    fn test_step_navigation() {
        assert_eq!(Step::TravelDates.previous(), Step::TravelDates);
        assert_eq!(Step::TripOptions.next(), Step::TripOptions);
        assert_eq!(Step::HotelPreferences.next(), Step::BudgetRequirements);
        assert_eq!(Step::HotelPreferences.previous(), Step::TravelerDetails);
        assert_eq!(Step::TravelDates.progress(), 0.0);
        assert_eq!(Step::TripOptions.progress(), 1.0);
        assert_eq!(Step::ReviewGenerate.to_string(), "5 (Review & Generate Plan)");
    }

    #[test]
    fn test_valid_dates() {
        let (dates, warnings) =
            validate_dates(&dates("2026-02-01", "2026-02-11"), today(), &PlannerConfig::default())
                .unwrap();
        assert_eq!(dates.duration, Some(10));
        assert_eq!(dates.departure_city.as_deref(), Some("Jeddah (JED)"));
        assert!(warnings.is_empty());
    }

    #[rstest]
    #[case::too_soon("2026-01-20", "2026-02-01")]
    #[case::too_short("2026-02-01", "2026-02-05")]
    #[case::return_before_departure("2026-02-10", "2026-02-01")]
    #[case::too_long("2026-02-01", "2026-06-01")]
    fn test_rejected_dates(#[case] departure: &str, #[case] return_date: &str) {
        let result = validate_dates(
            &dates(departure, return_date),
            today(),
            &PlannerConfig::default(),
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_long_trip_warns() {
        let (_, warnings) =
            validate_dates(&dates("2026-02-01", "2026-03-15"), today(), &PlannerConfig::default())
                .unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("visa"));
    }

    #[test]
    fn test_short_trip_warns_when_allowed() {
        let limits = PlannerConfig {
            min_trip_days: 3,
            ..Default::default()
        };
        let (_, warnings) =
            validate_dates(&dates("2026-02-01", "2026-02-05"), today(), &limits).unwrap();
        assert!(warnings[0].contains("at least 7 days"));
    }

    #[test]
    fn test_missing_name_message() {
        let form = TravelersForm {
            travelers: vec![traveler("Aisha", 30), traveler(" ", 40)],
        };
        let err = validate_travelers(&form, &PlannerConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Please fill in all traveler names");
    }

    #[test]
    fn test_passport_number_is_optional() {
        let mut with_passport = traveler(" Aisha ", 30);
        with_passport.passport_number = Some(" 123456789 ".into());
        let mut blank_passport = traveler("Yusuf", 32);
        blank_passport.passport_number = Some("  ".into());
        let form = TravelersForm {
            travelers: vec![with_passport, blank_passport, traveler("Maryam", 8)],
        };

        let travelers = validate_travelers(&form, &PlannerConfig::default()).unwrap();
        assert_eq!(travelers[0].name, "Aisha");
        assert_eq!(travelers[0].passport_number.as_deref(), Some("123456789"));
        assert!(travelers[1].passport_number.is_none());
        assert!(travelers[2].passport_number.is_none());
    }

    #[rstest]
    #[case::none(0, 30)]
    #[case::too_many(21, 30)]
    #[case::age_zero(1, 0)]
    #[case::age_too_high(1, 121)]
    fn test_rejected_travelers(#[case] count: usize, #[case] age: u32) {
        let form = TravelersForm {
            travelers: (0..count).map(|i| traveler(&format!("T{}", i), age)).collect(),
        };
        assert!(validate_travelers(&form, &PlannerConfig::default()).is_err());
    }

    #[test]
    fn test_star_rating_bounds() {
        let mut prefs = HotelPreferences::default();
        assert!(validate_hotels(&prefs).is_ok());
        prefs.madinah.star_rating = 2;
        assert!(validate_hotels(&prefs).is_err());
    }

    #[rstest]
    #[case("USD", 3000.0, true)]
    #[case("gbp", 500.0, true)]
    #[case("USD", 499.0, false)]
    #[case("USD", 50001.0, false)]
    #[case("XYZ", 3000.0, false)]
    fn test_budget(#[case] currency: &str, #[case] per_person: f64, #[case] ok: bool) {
        let form = BudgetForm {
            currency: currency.into(),
            per_person,
            flexibility: default_flexibility(),
            flight_preferences: FlightPreferences::default(),
            special_requirements: SpecialRequirements::default(),
        };
        assert_eq!(validate_budget(&form, &PlannerConfig::default()).is_ok(), ok);
    }
}
