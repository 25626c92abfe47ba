//! Store state
//!
//! `AppState` is owned by the store; subscribers only ever see clones.
//! Which result panel to show is derived from the flags, never stored.

use serde::{Deserialize, Serialize};

use crate::types::{ErrorInfo, SearchRequest, SearchRequestPatch, SearchResult, Suggestion};

/// Everything the widget renders from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub search_request: SearchRequest,
    pub results: SearchResult,

    // Autocomplete suggestions
    pub origin_airports: Vec<Suggestion>,
    pub destination_airports: Vec<Suggestion>,
    pub airlines: Vec<Suggestion>,

    // One loading flag per async concern
    pub loading: bool,
    pub loading_airlines: bool,
    pub loading_origin_airports: bool,
    pub loading_destination_airports: bool,

    /// A search has completed, successfully or with a domain error
    pub submitted: bool,
    pub display_aircraft_diagram: bool,
    pub error: Option<ErrorInfo>,
}

/// Result panel implied by the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    /// Nothing searched yet, or the last search failed
    Empty,
    Emissions,
    AircraftDiagram,
}

impl AppState {
    /// State a store starts from and returns to on reset
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ResultView {
        if !self.submitted || self.error.is_some() {
            ResultView::Empty
        } else if self.display_aircraft_diagram {
            ResultView::AircraftDiagram
        } else {
            ResultView::Emissions
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether any gateway call is in flight
    pub fn is_busy(&self) -> bool {
        self.loading
            || self.loading_airlines
            || self.loading_origin_airports
            || self.loading_destination_airports
    }

    /// Payload the error notice sends when dismissed
    ///
    /// Keeps flight-number search unless the error says that lookup cannot
    /// work for this flight, in which case the route form is selected.
    pub fn modal_dismissal(&self) -> SearchRequestPatch {
        let advanced = self
            .error
            .as_ref()
            .is_some_and(ErrorInfo::requires_advanced_search);

        SearchRequestPatch {
            basic_search: Some(self.search_request.basic_search && !advanced),
            ..Default::default()
        }
    }
}
