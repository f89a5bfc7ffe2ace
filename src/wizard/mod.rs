//! Trip wizard
//!
//! A six-step flow: travel dates, traveler details, hotel preferences,
//! budget and requirements, review and generate, trip options. Each form is
//! validated before the session advances. Once a plan is generated the
//! traveler picks a flight and one hotel per city and confirms the booking.
//!
//! Sessions live in a [`SessionStore`] and are driven over HTTP by
//! `api::handlers::wizard`.

mod booking;
mod session;
mod steps;
mod store;

pub use booking::{booking_reference, BookingConfirmation, BookingDetails, PaymentMethod};
pub use session::{SelectionUpdate, WizardSession, WizardSnapshot};
pub use steps::{
    validate_budget, validate_dates, validate_hotels, validate_travelers, BudgetForm, DatesForm,
    Step, TravelersForm,
};
pub use store::{GenerationGuard, SessionStore};
