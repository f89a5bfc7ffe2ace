//! Colored output helpers for CLI
//!
//! Consistent, colored terminal output for the `umrah-planner` binary.

use owo_colors::OwoColorize;
use crate::types::GeneratedTrip;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Umrah Planner banner
    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}",
                "☪ Umrah Planner".bright_green().bold(),
                version.dimmed()
            );
            println!(
                "   {}\n",
                "Multi-agent pilgrimage trip planning".bright_white()
            );
        } else {
            println!("\n   Umrah Planner {}", version);
            println!("   Multi-agent pilgrimage trip planning\n");
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a directory creation message
    pub fn created_dir(&self, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                "directory".dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] directory {}", path);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        if self.colored {
            let header: String = columns
                .iter()
                .map(|c| format!("{:<15}", c))
                .collect::<Vec<_>>()
                .join(" ");
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            let header: String = columns
                .iter()
                .map(|c| format!("{:<15}", c))
                .collect::<Vec<_>>()
                .join(" ");
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<15}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }

    /// Print the headline numbers of a generated trip
    pub fn trip_summary(&self, trip: &GeneratedTrip) {
        let plan = &trip.plan;
        self.header("Trip Plan");
        self.kv("Source", &format!("{:?}", trip.source));
        self.kv("Travelers", &plan.num_travelers.to_string());
        if let Some(duration) = plan.duration {
            self.kv("Duration", &format!("{} days", duration));
        }
        self.kv(
            "Estimated total",
            &format!("{} {:.0}", plan.currency, plan.total_cost),
        );

        self.subheader("Flights");
        self.table_header(&["Airline", "Cabin", "Price"]);
        for flight in &plan.flights {
            self.table_row(&[
                &flight.airline,
                &flight.cabin_class,
                &format!("{} {}", flight.currency, flight.price),
            ]);
        }

        for (city, hotels) in [("Makkah", &plan.hotels.makkah), ("Madinah", &plan.hotels.madinah)] {
            self.subheader(&format!("{} hotels", city));
            for hotel in hotels {
                self.list_item(&format!(
                    "{} ({}★, {}) {} {}/night",
                    hotel.name, hotel.stars, hotel.distance, hotel.currency, hotel.price_per_night
                ));
            }
        }

        self.subheader("Visa");
        for visa in &plan.visa.travelers {
            self.list_item(&format!(
                "{} ({}): {}, {}",
                visa.name, visa.nationality, visa.visa_type, visa.processing_time
            ));
        }

        self.subheader("Itinerary");
        for day in &plan.itinerary.days {
            self.list_item(&format!("Day {}: {} ({})", day.day, day.title, day.location));
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{generate_mock_trip_plan, Pricing};
    use crate::types::{PlanSource, TripRequest};
    use chrono::Utc;

    #[test]
    fn test_output_constructors() {
        assert!(Output::new().colored);
        assert!(Output::default().colored);
        assert!(!Output::no_color().colored);
    }

    #[test]
    fn test_table_handles_empty_rows() {
        let output = Output::no_color();
        output.table_header(&[]);
        output.table_row(&[]);
        output.table_header(&["Agent", "Model", "Tools"]);
        output.table_row(&["orchestrator", "planner", "4"]);
    }

    #[test]
    fn test_output_methods_no_panic() {
        for output in [Output::no_color(), Output::new()] {
            output.banner();
            output.success("done");
            output.info("info");
            output.warning("careful");
            output.error("failed");
            output.created("config", "umrah.toml");
            output.skipped(".gitignore", "already exists");
            output.created_dir("trips");
            output.header("Header");
            output.subheader("Subheader");
            output.kv("key", "value");
            output.list_item("item");
            output.hint("hint");
            output.command("umrah-planner serve");
            output.complete("complete");
            output.newline();
        }
    }

    #[test]
    fn test_trip_summary_prints_mock_plan() {
        let request = TripRequest::default();
        let trip = GeneratedTrip {
            ai_response: None,
            plan: generate_mock_trip_plan(&request, &Pricing::default()),
            user_data: request,
            generated_at: Utc::now(),
            source: PlanSource::Mock,
        };
        Output::no_color().trip_summary(&trip);
    }
}
