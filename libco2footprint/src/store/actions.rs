//! Actions accepted by the store
//!
//! Actions serialize as `{"type": "SEARCH_FLIGHTS"}` or
//! `{"type": "UPDATE_SEARCH_FLIGHTS", "payload": {...}}`, so an embedding
//! host can hand them over as JSON.

use serde::{Deserialize, Serialize};

use crate::types::SearchRequestPatch;

/// A discrete request to change store state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Look up the current search request
    SearchFlights,

    /// Merge fields into the current search request
    UpdateSearchFlights(SearchRequestPatch),

    /// Autocomplete query for the departure airport
    SearchOriginAirport(String),

    /// Autocomplete query for the arrival airport
    SearchDestinationAirport(String),

    SearchAirlines(String),

    /// Back to the initial state
    Reset,

    /// Toggle between the emissions table and the aircraft diagram
    SwitchResultsTab,

    /// Dismiss the error notice, seeding the next search from the payload
    HideModal(SearchRequestPatch),
}

impl Action {
    /// Wire name of the action kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SearchFlights => "SEARCH_FLIGHTS",
            Self::UpdateSearchFlights(_) => "UPDATE_SEARCH_FLIGHTS",
            Self::SearchOriginAirport(_) => "SEARCH_ORIGIN_AIRPORT",
            Self::SearchDestinationAirport(_) => "SEARCH_DESTINATION_AIRPORT",
            Self::SearchAirlines(_) => "SEARCH_AIRLINES",
            Self::Reset => "RESET",
            Self::SwitchResultsTab => "SWITCH_RESULTS_TAB",
            Self::HideModal(_) => "HIDE_MODAL",
        }
    }

    /// Whether handling this action awaits a gateway
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            Self::SearchFlights
                | Self::SearchOriginAirport(_)
                | Self::SearchDestinationAirport(_)
                | Self::SearchAirlines(_)
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
