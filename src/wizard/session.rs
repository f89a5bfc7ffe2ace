use crate::planner::{selection_breakdown, Pricing, Selection};
use crate::types::{AppError, CostBreakdown, GeneratedTrip, HotelPreferences, Result, TripRequest};
use crate::utils::toml_config::PlannerConfig;
use crate::wizard::booking::{booking_reference, BookingConfirmation, BookingDetails};
use crate::wizard::steps::{
    validate_budget, validate_dates, validate_hotels, validate_travelers, BudgetForm, DatesForm,
    Step, TravelersForm,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial update of the chosen options; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SelectionUpdate {
    pub flight: Option<usize>,
    pub makkah_hotel: Option<usize>,
    pub madinah_hotel: Option<usize>,
}

/// One traveler's progress through the wizard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WizardSession {
    pub id: Uuid,
    pub step: Step,
    pub data: TripRequest,
    pub warnings: Vec<String>,
    pub generating: bool,
    pub trip: Option<GeneratedTrip>,
    pub selection: Selection,
    pub booking: Option<BookingConfirmation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Serializable view of a session returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WizardSnapshot {
    pub id: Uuid,
    pub step: u8,
    pub step_title: String,
    pub progress: f64,
    pub data: TripRequest,
    pub warnings: Vec<String>,
    pub generating: bool,
    pub trip: Option<GeneratedTrip>,
    pub selection: Selection,
    pub breakdown: Option<CostBreakdown>,
    pub booking: Option<BookingConfirmation>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: Step::TravelDates,
            data: TripRequest::default(),
            warnings: Vec::new(),
            generating: false,
            trip: None,
            selection: Selection::default(),
            booking: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn progress(&self) -> f64 {
        self.step.progress()
    }

    pub fn snapshot(&self, pricing: &Pricing) -> WizardSnapshot {
        WizardSnapshot {
            id: self.id,
            step: self.step.number(),
            step_title: self.step.title().to_string(),
            progress: self.progress(),
            data: self.data.clone(),
            warnings: self.warnings.clone(),
            generating: self.generating,
            trip: self.trip.clone(),
            selection: self.selection,
            breakdown: self.breakdown(pricing),
            booking: self.booking.clone(),
        }
    }

    fn expect_step(&self, step: Step) -> Result<()> {
        if self.generating {
            return Err(AppError::Conflict(
                "A trip plan is being generated for this session".into(),
            ));
        }
        if self.step != step {
            return Err(AppError::Conflict(format!(
                "Wizard is on step {}, not step {}",
                self.step, step
            )));
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.step = self.step.next();
    }

    pub fn submit_dates(
        &mut self,
        form: &DatesForm,
        today: NaiveDate,
        limits: &PlannerConfig,
    ) -> Result<()> {
        self.expect_step(Step::TravelDates)?;
        let (dates, warnings) = validate_dates(form, today, limits)?;
        self.data.travel_dates = dates;
        self.warnings = warnings;
        self.advance();
        Ok(())
    }

    pub fn submit_travelers(&mut self, form: &TravelersForm, limits: &PlannerConfig) -> Result<()> {
        self.expect_step(Step::TravelerDetails)?;
        let travelers = validate_travelers(form, limits)?;
        self.data.num_travelers = travelers.len() as u32;
        self.data.travelers = travelers;
        self.advance();
        Ok(())
    }

    pub fn submit_hotels(&mut self, preferences: &HotelPreferences) -> Result<()> {
        self.expect_step(Step::HotelPreferences)?;
        validate_hotels(preferences)?;
        self.data.hotel_preferences = preferences.clone();
        self.advance();
        Ok(())
    }

    pub fn submit_budget(&mut self, form: &BudgetForm, limits: &PlannerConfig) -> Result<()> {
        self.expect_step(Step::BudgetRequirements)?;
        validate_budget(form, limits)?;

        let travelers = self.data.num_travelers.max(1);
        self.data.budget.currency = form.currency.to_ascii_uppercase();
        self.data.budget.per_person = form.per_person;
        self.data.budget.total = form.per_person * f64::from(travelers);
        self.data.budget.flexibility = form.flexibility.clone();
        self.data.flight_preferences = form.flight_preferences.clone();
        self.data.special_requirements = form.special_requirements.clone();
        self.advance();
        Ok(())
    }

    /// One step back; a no-op on the first step.
    pub fn back(&mut self) -> Result<()> {
        if self.generating {
            return Err(AppError::Conflict(
                "A trip plan is being generated for this session".into(),
            ));
        }
        self.step = self.step.previous();
        Ok(())
    }

    /// Clears everything collected so far and returns to step 1.
    pub fn start_over(&mut self) {
        self.step = Step::TravelDates;
        self.data = TripRequest::default();
        self.warnings.clear();
        self.generating = false;
        self.trip = None;
        self.selection = Selection::default();
        self.booking = None;
    }

    /// Marks a generation as in flight and returns the request to plan.
    pub fn begin_generation(&mut self) -> Result<TripRequest> {
        self.expect_step(Step::ReviewGenerate)?;
        self.generating = true;
        Ok(self.data.clone())
    }

    pub fn finish_generation(&mut self, trip: GeneratedTrip) -> Result<()> {
        if !self.generating {
            return Err(AppError::Conflict(
                "No trip plan generation is in progress".into(),
            ));
        }
        self.generating = false;
        self.trip = Some(trip);
        self.selection = Selection::default();
        self.booking = None;
        self.step = Step::TripOptions;
        Ok(())
    }

    pub fn abort_generation(&mut self) {
        self.generating = false;
    }

    pub fn select(&mut self, update: SelectionUpdate) -> Result<()> {
        let plan = &self
            .trip
            .as_ref()
            .ok_or_else(|| AppError::Conflict("No trip plan has been generated yet".into()))?
            .plan;

        let check = |index: Option<usize>, len: usize, what: &str| match index {
            Some(i) if i >= len => Err(AppError::InvalidInput(format!(
                "{} option {} does not exist ({} available)",
                what, i, len
            ))),
            _ => Ok(()),
        };
        check(update.flight, plan.flights.len(), "Flight")?;
        check(update.makkah_hotel, plan.hotels.makkah.len(), "Makkah hotel")?;
        check(update.madinah_hotel, plan.hotels.madinah.len(), "Madinah hotel")?;

        if update.flight.is_some() {
            self.selection.flight = update.flight;
        }
        if update.makkah_hotel.is_some() {
            self.selection.makkah_hotel = update.makkah_hotel;
        }
        if update.madinah_hotel.is_some() {
            self.selection.madinah_hotel = update.madinah_hotel;
        }
        Ok(())
    }

    /// Costs of the current selection, once a plan exists.
    pub fn breakdown(&self, pricing: &Pricing) -> Option<CostBreakdown> {
        self.trip
            .as_ref()
            .map(|trip| selection_breakdown(&trip.plan, &self.selection, pricing))
    }

    pub fn confirm_booking(
        &mut self,
        details: &BookingDetails,
        pricing: &Pricing,
    ) -> Result<BookingConfirmation> {
        let trip = self
            .trip
            .as_ref()
            .ok_or_else(|| AppError::Conflict("No trip plan has been generated yet".into()))?;

        let (Some(f), Some(mk), Some(md)) = (
            self.selection.flight,
            self.selection.makkah_hotel,
            self.selection.madinah_hotel,
        ) else {
            return Err(AppError::InvalidInput(
                "Please select your preferred flight and hotels before booking".into(),
            ));
        };
        details.validate()?;

        let plan = &trip.plan;
        let missing = || AppError::Internal("Selection no longer matches the plan".into());
        let confirmation = BookingConfirmation {
            reference: booking_reference(&details.email),
            email: details.email.trim().to_string(),
            phone: details.phone.trim().to_string(),
            emergency_contact: details.emergency_contact.clone(),
            emergency_phone: details.emergency_phone.clone(),
            payment_method: details.payment_method,
            flight: plan.flights.get(f).ok_or_else(missing)?.clone(),
            makkah_hotel: plan.hotels.makkah.get(mk).ok_or_else(missing)?.clone(),
            madinah_hotel: plan.hotels.madinah.get(md).ok_or_else(missing)?.clone(),
            breakdown: selection_breakdown(plan, &self.selection, pricing),
            confirmed_at: Utc::now(),
        };
        self.booking = Some(confirmation.clone());
        Ok(confirmation)
    }
}
