//! Core domain types: search requests, results and API error descriptors

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cabin class a passenger travels in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    #[default]
    Economy,
    ComfortEconomy,
    PremiumEconomy,
    Business,
    First,
}

impl SeatClass {
    /// Order in which the calculation API reports per-class figures
    pub const API_ORDER: [SeatClass; 5] = [
        SeatClass::First,
        SeatClass::Business,
        SeatClass::PremiumEconomy,
        SeatClass::ComfortEconomy,
        SeatClass::Economy,
    ];

    /// Wire name used in action payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::ComfortEconomy => "COMFORT_ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }

    /// Label shown in the seat class picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::ComfortEconomy => "Comfort Economy",
            Self::PremiumEconomy => "Premium Economy",
            Self::Business => "Business",
            Self::First => "First",
        }
    }

    /// Name used for the row of the per-class result table
    pub fn result_name(&self) -> &'static str {
        match self {
            Self::First => "First class",
            Self::Business => "Business class",
            Self::PremiumEconomy => "Premium economy",
            Self::ComfortEconomy => "Comfort economy",
            Self::Economy => "Economy",
        }
    }
}

impl FromStr for SeatClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "ECONOMY" => Ok(Self::Economy),
            "COMFORT_ECONOMY" | "ECONOMY_COMFORT" => Ok(Self::ComfortEconomy),
            "PREMIUM_ECONOMY" => Ok(Self::PremiumEconomy),
            "BUSINESS" => Ok(Self::Business),
            "FIRST" => Ok(Self::First),
            _ => Err(format!(
                "Invalid seat class: '{}'. Valid options: economy, comfort-economy, premium-economy, business, first",
                s
            )),
        }
    }
}

impl std::fmt::Display for SeatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the visitor asked for
///
/// Values are replaced, never edited in place: every update goes through
/// [`SearchRequest::apply`], which also sanitizes the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Look up by flight number (true) or by airline and route (false)
    pub basic_search: bool,
    pub airline: String,
    pub flight_number: String,
    pub number_of_flights: u32,
    pub seat_class: SeatClass,
    pub number_of_passengers: u32,
    pub departure_airport: String,
    pub arrival_airport: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            basic_search: true,
            airline: String::new(),
            flight_number: String::new(),
            number_of_flights: 1,
            seat_class: SeatClass::Economy,
            number_of_passengers: 1,
            departure_airport: String::new(),
            arrival_airport: String::new(),
        }
    }
}

impl SearchRequest {
    pub const MIN_FLIGHTS: u32 = 1;
    pub const MIN_PASSENGERS: u32 = 1;

    /// Clamp the flight and passenger counts to their minimum of one
    pub fn sanitize(&self) -> Self {
        Self {
            number_of_flights: self.number_of_flights.max(Self::MIN_FLIGHTS),
            number_of_passengers: self.number_of_passengers.max(Self::MIN_PASSENGERS),
            ..self.clone()
        }
    }

    /// Merge a partial update over this request and sanitize the outcome
    pub fn apply(&self, patch: &SearchRequestPatch) -> Self {
        let merged = Self {
            basic_search: patch.basic_search.unwrap_or(self.basic_search),
            airline: patch.airline.clone().unwrap_or_else(|| self.airline.clone()),
            flight_number: patch
                .flight_number
                .clone()
                .unwrap_or_else(|| self.flight_number.clone()),
            number_of_flights: patch.number_of_flights.unwrap_or(self.number_of_flights),
            seat_class: patch.seat_class.unwrap_or(self.seat_class),
            number_of_passengers: patch
                .number_of_passengers
                .unwrap_or(self.number_of_passengers),
            departure_airport: patch
                .departure_airport
                .clone()
                .unwrap_or_else(|| self.departure_airport.clone()),
            arrival_airport: patch
                .arrival_airport
                .clone()
                .unwrap_or_else(|| self.arrival_airport.clone()),
        };
        merged.sanitize()
    }
}

/// Partial [`SearchRequest`] carried by update and modal-dismissal actions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_flights: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_class: Option<SeatClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_passengers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_airport: Option<String>,
}

/// Emissions for one cabin class of the searched aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatClassResult {
    pub name: String,
    pub seats: u32,
    /// kg CO2 per seat
    pub emissions_per_seat: f64,
}

impl SeatClassResult {
    /// Per-seat emissions with two decimals, as displayed
    pub fn formatted_emissions(&self) -> String {
        format!("{:.2}", self.emissions_per_seat)
    }
}

/// Outcome of a successful search, ready for display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub emissions_per_passenger: f64,
    /// emissions_per_passenger x flights x passengers
    pub emissions_total: f64,
    pub aircraft_type_name: String,
    pub distance_km: f64,
    pub aircraft_registration: String,
    pub flights_over_12_months: u32,
    pub seat_classes: Vec<SeatClassResult>,
}

/// Autocomplete entry for an airport or an airline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub code: String,
}

impl Suggestion {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Case-insensitive substring match on name or code
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.code.to_lowercase().contains(&query)
    }
}

pub const STATUS_NO_MATCHING_ROUTE: u16 = 204;
pub const STATUS_AMBIGUOUS_FLIGHT_NUMBER: u16 = 207;
pub const STATUS_INVALID_INPUT: u16 = 400;
pub const STATUS_FLIGHT_NOT_FOUND: u16 = 404;
pub const STATUS_QUOTA_EXCEEDED: u16 = 429;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Message used for statuses outside the known table
pub const GENERIC_ERROR_MESSAGE: &str = "Request could not be performed.";

const KNOWN_ERRORS: [(u16, &str); 6] = [
    (
        STATUS_NO_MATCHING_ROUTE,
        "We're sorry, we are unable to locate this route on any commercial aircraft.",
    ),
    (
        STATUS_AMBIGUOUS_FLIGHT_NUMBER,
        "It looks like the airline in question has used this flight number on multiple routes. Please enter in the route details manually.",
    ),
    (
        STATUS_INVALID_INPUT,
        "Invalid input: Please ensure all input fields have been populated.",
    ),
    (
        STATUS_FLIGHT_NOT_FOUND,
        "Flight number does not exist. Please enter in the route details manually.",
    ),
    (STATUS_QUOTA_EXCEEDED, "Trial usage exceeded"),
    (
        STATUS_SERVER_ERROR,
        "Looks like we have hit some turbulence! Please try again soon.",
    ),
];

/// Error surfaced to the visitor
///
/// `status_code` is the HTTP status for API rejections and `None` for
/// transport or unexpected failures, whose message is the raw error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub status_code: Option<u16>,
    pub message: String,
}

impl ErrorInfo {
    /// Map a non-200 status through the known error table
    pub fn from_status(status: u16) -> Self {
        let message = KNOWN_ERRORS
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, message)| *message)
            .unwrap_or(GENERIC_ERROR_MESSAGE);

        Self {
            status_code: Some(status),
            message: message.to_string(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    /// Whether the status belongs to the fixed table of API errors
    pub fn is_known(&self) -> bool {
        self.status_code
            .is_some_and(|status| KNOWN_ERRORS.iter().any(|(code, _)| *code == status))
    }

    /// Process exit code for a search that ended with this error
    ///
    /// Rejected credentials and exhausted quotas exit 2, everything else 1.
    pub fn exit_code(&self) -> i32 {
        match self.status_code {
            Some(status) if crate::error::is_access_denied(status) => 2,
            _ => 1,
        }
    }

    /// Flight-number lookups are unreliable for these; dismissing the
    /// notice sends the visitor to the airline + route form.
    pub fn requires_advanced_search(&self) -> bool {
        matches!(
            self.status_code,
            Some(STATUS_AMBIGUOUS_FLIGHT_NUMBER) | Some(STATUS_FLIGHT_NOT_FOUND)
        )
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "{} ({})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}
