//! Pure state transitions
//!
//! Every function here is `(AppState, input) -> AppState` with no I/O.
//! The store worker performs the gateway calls and feeds their outcomes in.

use super::state::AppState;
use crate::gateways::{FlightFootprint, SearchOutcome};
use crate::types::{
    ErrorInfo, SearchRequest, SearchRequestPatch, SearchResult, SeatClassResult, Suggestion,
};

/// Which autocomplete list an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionTarget {
    OriginAirports,
    DestinationAirports,
    Airlines,
}

impl SuggestionTarget {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OriginAirports => "origin airports",
            Self::DestinationAirports => "destination airports",
            Self::Airlines => "airlines",
        }
    }

    fn set_loading(&self, state: AppState, loading: bool) -> AppState {
        match self {
            Self::OriginAirports => AppState {
                loading_origin_airports: loading,
                ..state
            },
            Self::DestinationAirports => AppState {
                loading_destination_airports: loading,
                ..state
            },
            Self::Airlines => AppState {
                loading_airlines: loading,
                ..state
            },
        }
    }

    fn set_list(&self, state: AppState, list: Vec<Suggestion>) -> AppState {
        match self {
            Self::OriginAirports => AppState {
                origin_airports: list,
                ..state
            },
            Self::DestinationAirports => AppState {
                destination_airports: list,
                ..state
            },
            Self::Airlines => AppState {
                airlines: list,
                ..state
            },
        }
    }
}

/// Merge a partial request into the current one
pub fn update_search(state: AppState, patch: &SearchRequestPatch) -> AppState {
    AppState {
        search_request: state.search_request.apply(patch),
        ..state
    }
}

/// Snapshot shown while a search is in flight
pub fn search_started(state: &AppState) -> AppState {
    AppState {
        loading: true,
        ..state.clone()
    }
}

/// Snapshot shown while an autocomplete lookup is in flight
pub fn lookup_started(state: &AppState, target: SuggestionTarget) -> AppState {
    target.set_loading(state.clone(), true)
}

/// Figures for the requested cabin, scaled by flights and passengers
pub fn build_result(footprint: &FlightFootprint, request: &SearchRequest) -> SearchResult {
    let emissions_per_passenger = footprint.emissions_for(request.seat_class);
    let emissions_total = emissions_per_passenger
        * f64::from(request.number_of_flights)
        * f64::from(request.number_of_passengers);

    SearchResult {
        emissions_per_passenger,
        emissions_total,
        aircraft_type_name: footprint.aircraft_type_name.clone(),
        distance_km: footprint.distance_km,
        aircraft_registration: footprint.aircraft_registration.clone(),
        flights_over_12_months: footprint.flights_over_12_months,
        seat_classes: footprint
            .seat_classes
            .iter()
            .map(|row| SeatClassResult {
                name: row.name.clone(),
                seats: row.seats,
                emissions_per_seat: row.emissions_per_seat,
            })
            .collect(),
    }
}

/// Fold a classified search response
///
/// On success the request is rewritten with the codes the API resolved and
/// switched to route search, and each suggestion list holds the resolved
/// entry. A rejection only records the error; results, suggestions and the
/// request stay as they were.
pub fn apply_search_outcome(state: AppState, outcome: SearchOutcome) -> AppState {
    match outcome {
        SearchOutcome::Found(footprint) => {
            let results = build_result(&footprint, &state.search_request);
            let search_request = SearchRequest {
                airline: footprint.airline.code.clone(),
                departure_airport: footprint.origin.code.clone(),
                arrival_airport: footprint.destination.code.clone(),
                basic_search: false,
                flight_number: footprint.flight_number.clone(),
                ..state.search_request.clone()
            };

            AppState {
                search_request,
                results,
                airlines: vec![footprint.airline],
                origin_airports: vec![footprint.origin],
                destination_airports: vec![footprint.destination],
                submitted: true,
                loading: false,
                ..state
            }
        }
        SearchOutcome::Rejected(error) => AppState {
            submitted: true,
            loading: false,
            error: Some(error),
            ..state
        },
    }
}

/// Fold a transport or decoding failure of the search gateway
///
/// Only the error is recorded; `loading` keeps whatever the accumulated
/// state had.
pub fn apply_search_failure(state: AppState, message: impl Into<String>) -> AppState {
    AppState {
        error: Some(ErrorInfo::unexpected(message)),
        ..state
    }
}

/// Fold an autocomplete response; `None` keeps the previous list
pub fn apply_suggestions(
    state: AppState,
    target: SuggestionTarget,
    suggestions: Option<Vec<Suggestion>>,
) -> AppState {
    let state = match suggestions {
        Some(list) => target.set_list(state, list),
        None => state,
    };
    target.set_loading(state, false)
}

pub fn reset() -> AppState {
    AppState::initial()
}

pub fn switch_results_tab(state: AppState) -> AppState {
    AppState {
        display_aircraft_diagram: !state.display_aircraft_diagram,
        ..state
    }
}

/// Initial state with the request seeded from `patch`
pub fn hide_modal(patch: &SearchRequestPatch) -> AppState {
    AppState {
        search_request: SearchRequest::default().apply(patch),
        error: None,
        ..AppState::initial()
    }
}
