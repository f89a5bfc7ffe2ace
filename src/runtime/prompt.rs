use crate::types::TripRequest;
use serde_json::Value;
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Whole amounts print without decimals; zero means "not given".
fn amount(value: f64) -> String {
    if value <= 0.0 {
        NOT_AVAILABLE.to_string()
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Natural-language prompt describing a trip request for the orchestrator.
pub fn format_requirements_prompt(request: &TripRequest) -> String {
    let dates = &request.travel_dates;
    let budget = &request.budget;
    let hotels = &request.hotel_preferences;
    let flights = &request.flight_preferences;
    let special = &request.special_requirements;
    let currency = or_default(&budget.currency, "USD");

    let mut prompt = String::from("I want to plan an Umrah trip with the following details:\n\n");

    // Writing to a String cannot fail.
    let _ = writeln!(prompt, "**Travel Dates:**");
    let _ = writeln!(prompt, "- Departing from: {}", or_na(dates.departure_airport.as_deref()));
    let _ = writeln!(prompt, "- Departure date: {}", or_na(dates.departure));
    let _ = writeln!(prompt, "- Return date: {}", or_na(dates.return_date));
    let _ = writeln!(prompt, "- Duration: {} days", or_na(dates.duration));
    let _ = writeln!(
        prompt,
        "- Arrival city: {}",
        or_default(dates.arrival_city.as_deref().unwrap_or(""), "Jeddah")
    );

    let _ = writeln!(prompt, "\n**Travelers:**");
    let _ = writeln!(prompt, "- Number of travelers: {}", request.travelers.len());
    for (i, traveler) in request.travelers.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "- Traveler {}: {}, {}, Age {}",
            i + 1,
            or_na(Some(&traveler.name)),
            or_na(Some(&traveler.nationality)),
            or_na(Some(traveler.age).filter(|age| *age > 0)),
        );
    }

    let _ = writeln!(prompt, "\n**Budget:**");
    let _ = writeln!(prompt, "- Total budget: {} {}", currency, amount(budget.total));
    let _ = writeln!(prompt, "- Per person: {} {}", currency, amount(budget.per_person));
    let _ = writeln!(
        prompt,
        "- Flexibility: {}",
        or_default(&budget.flexibility, "Moderate")
    );

    let _ = writeln!(prompt, "\n**Hotel Preferences:**");
    for (city, pref) in [("Makkah", &hotels.makkah), ("Madinah", &hotels.madinah)] {
        let stars = if pref.star_rating == 0 { 4 } else { pref.star_rating };
        let _ = writeln!(
            prompt,
            "- {}: {} stars, {}",
            city,
            stars,
            or_default(&pref.proximity, "Walking distance")
        );
    }

    let _ = writeln!(prompt, "\n**Flight Preferences:**");
    let _ = writeln!(
        prompt,
        "- Cabin class: {}",
        or_default(&flights.cabin_class, "Economy")
    );
    let _ = writeln!(prompt, "- Direct flights: {}", yes_no(flights.direct_flights));

    let _ = writeln!(prompt, "\n**Special Requirements:**");
    if special.wheelchair_access {
        prompt.push_str("- Wheelchair accessibility required\n");
    }
    if special.elderly_travelers {
        prompt.push_str("- Elderly travelers need special assistance\n");
    }
    if special.first_time_umrah {
        prompt.push_str("- First time performing Umrah\n");
    }
    if !special.additional_notes.trim().is_empty() {
        let _ = writeln!(prompt, "- Additional notes: {}", special.additional_notes);
    }

    if !special.custom_itinerary.trim().is_empty() {
        let _ = writeln!(
            prompt,
            "\n**Custom Itinerary Requirements:**\n{}",
            special.custom_itinerary
        );
        prompt.push_str(
            "\nIMPORTANT: Please follow this custom itinerary when booking hotels. \
             Book hotels in each city for the specified number of days.\n",
        );
    }

    prompt.push_str(
        "\nPlease help me plan this Umrah trip with MULTIPLE flight options (at least 2-3 options), \
         MULTIPLE hotel recommendations for each city (at least 2-3 options per city), \
         visa requirements, and a detailed itinerary.",
    );
    prompt.push_str(
        "\n\nFor flights: Provide at least 2-3 different flight options with different airlines, \
         times, and price points.",
    );
    prompt.push_str(
        "\nFor hotels: Provide at least 2-3 hotel options for each city (Makkah and Madinah) \
         with different star ratings and distances from Haram.",
    );

    prompt
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Readable text of an agent response.
///
/// `error` wins; then `result.content[].text` joined by newlines; then the
/// result itself; then the whole response.
pub fn extract_text_from_response(response: &Value) -> String {
    if let Some(error) = response.get("error") {
        return format!("Error: {}", render(error));
    }

    let Some(result) = response.get("result") else {
        return render(response);
    };

    if let Some(items) = result.get("content").and_then(Value::as_array) {
        let texts: Vec<&str> = items
            .iter()
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .collect();
        if !texts.is_empty() {
            return texts.join("\n");
        }
    }

    render(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Traveler;
    use chrono::NaiveDate;
    use serde_json::json;

    fn request() -> TripRequest {
        let mut request = TripRequest::default();
        request.travel_dates.departure_airport = Some("MAN".into());
        request.travel_dates.departure = NaiveDate::from_ymd_opt(2026, 3, 15);
        request.travel_dates.return_date = NaiveDate::from_ymd_opt(2026, 3, 25);
        request.travel_dates.duration = Some(10);
        request.num_travelers = 2;
        request.travelers = vec![
            Traveler {
                name: "Aisha".into(),
                nationality: "British".into(),
                age: 34,
                gender: "Female".into(),
                passport_number: None,
            },
            Traveler::default(),
        ];
        request.budget.per_person = 3000.0;
        request.budget.total = 6000.0;
        request
    }

    #[test]
    fn test_prompt_sections() {
        let prompt = format_requirements_prompt(&request());

        assert!(prompt.starts_with("I want to plan an Umrah trip"));
        assert!(prompt.contains("- Departing from: MAN\n"));
        assert!(prompt.contains("- Departure date: 2026-03-15\n"));
        assert!(prompt.contains("- Duration: 10 days\n"));
        assert!(prompt.contains("- Arrival city: Jeddah\n"));
        assert!(prompt.contains("- Number of travelers: 2\n"));
        assert!(prompt.contains("- Traveler 1: Aisha, British, Age 34\n"));
        assert!(prompt.contains("- Traveler 2: N/A, N/A, Age N/A\n"));
        assert!(prompt.contains("- Total budget: USD 6000\n"));
        assert!(prompt.contains("- Flexibility: Moderate\n"));
        assert!(prompt.contains("- Makkah: 4 stars, Walking distance\n"));
        assert!(prompt.contains("- Cabin class: Economy\n"));
        assert!(prompt.contains("- Direct flights: Yes\n"));
        assert!(prompt.contains("at least 2-3 hotel options for each city"));
        assert!(!prompt.contains("Custom Itinerary"));
    }

    #[test]
    fn test_missing_values_render_na() {
        let prompt = format_requirements_prompt(&TripRequest::default());
        assert!(prompt.contains("- Departing from: N/A\n"));
        assert!(prompt.contains("- Return date: N/A\n"));
        assert!(prompt.contains("- Duration: N/A days\n"));
        assert!(prompt.contains("- Per person: USD N/A\n"));
    }

    #[test]
    fn test_special_requirements_and_custom_itinerary() {
        let mut request = request();
        request.flight_preferences.direct_flights = false;
        request.special_requirements.wheelchair_access = true;
        request.special_requirements.first_time_umrah = true;
        request.special_requirements.additional_notes = "Vegetarian meals".into();
        request.special_requirements.custom_itinerary = "4 days Madinah then 6 days Makkah".into();

        let prompt = format_requirements_prompt(&request);
        assert!(prompt.contains("- Direct flights: No\n"));
        assert!(prompt.contains("- Wheelchair accessibility required\n"));
        assert!(!prompt.contains("Elderly travelers"));
        assert!(prompt.contains("- First time performing Umrah\n"));
        assert!(prompt.contains("- Additional notes: Vegetarian meals\n"));
        assert!(prompt.contains("**Custom Itinerary Requirements:**\n4 days Madinah then 6 days Makkah"));
        assert!(prompt.contains("IMPORTANT: Please follow this custom itinerary"));
    }

    #[test]
    fn test_extract_error() {
        let text = extract_text_from_response(&json!({"error": "timeout", "agent_type": "flight"}));
        assert_eq!(text, "Error: timeout");
    }

    #[test]
    fn test_extract_content_items() {
        let response = json!({"result": {"role": "assistant", "content": [
            {"text": "Option 1"},
            {"image": "..."},
            {"text": "Option 2"}
        ]}});
        assert_eq!(extract_text_from_response(&response), "Option 1\nOption 2");
    }

    #[test]
    fn test_extract_plain_and_structured_results() {
        assert_eq!(
            extract_text_from_response(&json!({"result": "Here is your plan"})),
            "Here is your plan"
        );
        assert_eq!(
            extract_text_from_response(&json!({"result": {"content": []}})),
            r#"{"content":[]}"#
        );
        assert_eq!(
            extract_text_from_response(&json!({"status": "ok"})),
            r#"{"status":"ok"}"#
        );
    }
}
