//! Rendering of published store state

use serde::Serialize;

use libco2footprint::equivalents::{self, Equivalent};
use libco2footprint::{AppState, ErrorInfo, SearchRequest, SearchResult, Suggestion};

/// Everything printed for a flight search
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub request: SearchRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalents: Option<Equivalents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Serialize)]
pub struct Equivalents {
    pub emissions: Vec<Equivalent>,
    pub offsets: Vec<Equivalent>,
}

impl SearchReport {
    pub fn from_state(state: &AppState, show_equivalents: bool) -> Self {
        if let Some(error) = &state.error {
            return Self {
                request: state.search_request.clone(),
                results: None,
                equivalents: None,
                error: Some(error.clone()),
            };
        }

        let total = state.results.emissions_total;
        let equivalents = (show_equivalents && state.submitted).then(|| Equivalents {
            emissions: equivalents::equivalents_for(total, &equivalents::EMISSIONS),
            offsets: equivalents::equivalents_for(total, &equivalents::OFFSETS),
        });

        Self {
            request: state.search_request.clone(),
            results: state.submitted.then(|| state.results.clone()),
            equivalents,
            error: None,
        }
    }
}

fn place(code: &str, known: &[Suggestion]) -> String {
    match known.iter().find(|entry| entry.code == code) {
        Some(entry) if !entry.name.is_empty() => format!("{} ({})", entry.name, code),
        _ => code.to_string(),
    }
}

fn plural(count: u32, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Human-readable search result
pub fn search_text(state: &AppState, report: &SearchReport) -> String {
    let mut out = String::new();
    let Some(results) = &report.results else {
        return out;
    };
    let request = &state.search_request;

    out.push_str(&format!(
        "{}  {} -> {}  {}\n",
        request.flight_number,
        place(&request.departure_airport, &state.origin_airports),
        place(&request.arrival_airport, &state.destination_airports),
        place(&request.airline, &state.airlines),
    ));
    out.push_str(&format!(
        "Aircraft: {} ({}), {:.0} km, {} in the last 12 months\n\n",
        results.aircraft_type_name,
        results.aircraft_registration,
        results.distance_km,
        plural(results.flights_over_12_months, "flight"),
    ));

    out.push_str(&format!(
        "{}, {}, {}\n",
        request.seat_class.label(),
        plural(request.number_of_passengers, "passenger"),
        plural(request.number_of_flights, "flight"),
    ));
    out.push_str(&format!(
        "  Per passenger: {:.2} kg CO2\n",
        results.emissions_per_passenger
    ));
    out.push_str(&format!("  Total:         {:.2} kg CO2\n\n", results.emissions_total));

    out.push_str(&format!("{:<18}{:>6}  {}\n", "Seat class", "Seats", "kg CO2 per seat"));
    for row in &results.seat_classes {
        out.push_str(&format!(
            "{:<18}{:>6}  {}\n",
            row.name,
            row.seats,
            row.formatted_emissions()
        ));
    }

    if let Some(equivalents) = &report.equivalents {
        if !equivalents.emissions.is_empty() {
            out.push_str("\nEquivalent to:\n");
            for equivalent in &equivalents.emissions {
                out.push_str(&format!("  {}\n", equivalent));
            }
        }
        if !equivalents.offsets.is_empty() {
            out.push_str("\nOffset by:\n");
            for equivalent in &equivalents.offsets {
                out.push_str(&format!("  {}\n", equivalent));
            }
        }
    }

    out
}

/// One `CODE<TAB>name` line per suggestion
pub fn suggestions_text(suggestions: &[Suggestion]) -> String {
    suggestions
        .iter()
        .map(|entry| format!("{}\t{}\n", entry.code, entry.name))
        .collect()
}
