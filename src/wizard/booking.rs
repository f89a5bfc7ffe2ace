//! Booking confirmation for a completed selection.
//!
//! Nothing is charged and no payment card data is accepted: the request only
//! carries contact details and the chosen payment method.

use crate::types::{AppError, CostBreakdown, FlightOption, HotelOption, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    BankTransfer,
    PayPal,
    /// Three interest-free installments.
    Installments,
}

/// Contact details submitted with a booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookingDetails {
    pub email: String,
    pub confirm_email: String,
    pub phone: String,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub agree_terms: bool,
}

impl BookingDetails {
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() || self.confirm_email.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Please fill in all required fields".into(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        if email != self.confirm_email.trim() {
            return Err(AppError::InvalidInput("Email addresses do not match".into()));
        }
        if !self.agree_terms {
            return Err(AppError::InvalidInput(
                "Please agree to the terms and conditions".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BookingConfirmation {
    pub reference: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub flight: FlightOption,
    pub makkah_hotel: HotelOption,
    pub madinah_hotel: HotelOption,
    pub breakdown: CostBreakdown,
    pub confirmed_at: DateTime<Utc>,
}

/// `UMRAH-nnnnnn`, stable for a given email address.
pub fn booking_reference(email: &str) -> String {
    let mut hasher = DefaultHasher::new();
    email.trim().hash(&mut hasher);
    format!("UMRAH-{:06}", hasher.finish() % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> BookingDetails {
        BookingDetails {
            email: "pilgrim@example.com".into(),
            confirm_email: "pilgrim@example.com".into(),
            phone: "+441234567890".into(),
            agree_terms: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_format_is_stable() {
        let reference = booking_reference("pilgrim@example.com");
        assert!(reference.starts_with("UMRAH-"));
        assert_eq!(reference.len(), "UMRAH-".len() + 6);
        assert!(reference["UMRAH-".len()..].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(reference, booking_reference(" pilgrim@example.com "));
    }

    #[test]
    fn test_valid_details() {
        assert!(details().validate().is_ok());
    }

    #[test]
    fn test_mismatched_emails() {
        let mut d = details();
        d.confirm_email = "other@example.com".into();
        let err = d.validate().unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn test_terms_required() {
        let mut d = details();
        d.agree_terms = false;
        assert!(d.validate().unwrap_err().to_string().contains("terms"));
    }

    #[test]
    fn test_card_fields_are_ignored() {
        let d: BookingDetails = serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "confirm_email": "a@b.com",
            "agree_terms": true,
            "payment_method": "card",
            "card_number": "4111111111111111",
            "cvv": "123"
        }))
        .unwrap();
        let echoed = serde_json::to_string(&d).unwrap();
        assert!(!echoed.contains("4111"));
        assert!(!echoed.contains("cvv"));
    }
}
