//! Integration tests for the action-dispatch store
//!
//! Drives a store wired to mock gateways and checks the published state
//! sequence: ordering, loading snapshots and the fold of every action kind.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use libco2footprint::gateways::mock::{MockDirectory, MockSearch};
use libco2footprint::gateways::Gateways;
use libco2footprint::store::{Action, AppState, ResultView, Store};
use libco2footprint::types::{SearchRequest, SearchRequestPatch, SeatClass, Suggestion};

fn airports() -> Vec<Suggestion> {
    vec![
        Suggestion::new("Dublin", "DUB"),
        Suggestion::new("London Heathrow", "LHR"),
        Suggestion::new("London Gatwick", "LGW"),
        Suggestion::new("Cork", "ORK"),
    ]
}

fn airlines() -> Vec<Suggestion> {
    vec![
        Suggestion::new("Aer Lingus", "EIN"),
        Suggestion::new("Ryanair", "RYR"),
    ]
}

fn store_with(search: MockSearch, airports: MockDirectory) -> Store {
    Store::new(Gateways::new(
        Arc::new(search),
        Arc::new(airports),
        Arc::new(MockDirectory::new(airlines())),
    ))
}

/// Records every published state
fn record(store: &Store) -> Arc<Mutex<Vec<AppState>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    // The store keeps the observer attached after the handle is dropped
    let _ = store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
    seen
}

fn flight(number: &str) -> Action {
    Action::UpdateSearchFlights(SearchRequestPatch {
        flight_number: Some(number.to_string()),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_publications_follow_dispatch_order_despite_latency() {
    let store = store_with(
        MockSearch::found().with_delay(Duration::from_millis(50)),
        MockDirectory::new(airports()),
    );
    let seen = record(&store);

    store.dispatch(flight("EI154"));
    store.dispatch(Action::SearchFlights);
    store.dispatch(flight("LATER"));
    store.dispatch(Action::SwitchResultsTab);
    let final_state = store.settled().await.unwrap();

    let seen = seen.lock().unwrap();
    let submitted_at = seen.iter().position(|s| s.submitted).unwrap();
    let later_at = seen
        .iter()
        .position(|s| s.search_request.flight_number == "LATER")
        .unwrap();
    let toggled_at = seen.iter().position(|s| s.display_aircraft_diagram).unwrap();

    assert!(submitted_at < later_at);
    assert!(later_at < toggled_at);
    assert!(seen
        .iter()
        .filter(|s| s.search_request.flight_number == "LATER")
        .all(|s| s.submitted));

    assert!(final_state.submitted);
    assert!(final_state.display_aircraft_diagram);
    assert_eq!(final_state.search_request.flight_number, "LATER");
}

#[tokio::test]
async fn test_search_success_computes_totals() {
    let search = MockSearch::found();
    let received = search.requests.clone();
    let store = store_with(search, MockDirectory::new(airports()));

    store.dispatch(Action::UpdateSearchFlights(SearchRequestPatch {
        flight_number: Some("EI154".to_string()),
        seat_class: Some(SeatClass::Economy),
        number_of_flights: Some(2),
        number_of_passengers: Some(3),
        ..Default::default()
    }));
    store.dispatch(Action::SearchFlights);
    let state = store.settled().await.unwrap();

    assert_eq!(state.results.emissions_per_passenger, 4.0);
    assert_eq!(state.results.emissions_total, 24.0);
    assert!(state.submitted);
    assert!(!state.loading);
    assert_eq!(state.view(), ResultView::Emissions);

    assert_eq!(state.search_request.airline, "EI");
    assert_eq!(state.search_request.departure_airport, "DUB");
    assert_eq!(state.search_request.arrival_airport, "LHR");
    assert!(!state.search_request.basic_search);

    // The gateway saw the request as it stood when the search was handled
    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].flight_number, "EI154");
    assert_eq!(received[0].number_of_passengers, 3);
    assert!(received[0].basic_search);
}

#[tokio::test]
async fn test_search_publishes_loading_before_result() {
    let store = store_with(
        MockSearch::found().with_delay(Duration::from_millis(30)),
        MockDirectory::new(airports()),
    );
    let seen = record(&store);

    store.dispatch(Action::SearchFlights);
    store.settled().await.unwrap();

    let seen = seen.lock().unwrap();
    let flags: Vec<(bool, bool)> = seen.iter().map(|s| (s.loading, s.submitted)).collect();
    assert_eq!(flags, vec![(false, false), (true, false), (false, true)]);
}

#[tokio::test]
async fn test_search_not_found() {
    let store = store_with(MockSearch::rejected(404), MockDirectory::new(airports()));

    store.dispatch(flight("XX999"));
    store.dispatch(Action::SearchFlights);
    let state = store.settled().await.unwrap();

    let error = state.error.clone().unwrap();
    assert_eq!(error.status_code, Some(404));
    assert_eq!(
        error.message,
        "Flight number does not exist. Please enter in the route details manually."
    );
    assert!(state.submitted);
    assert!(!state.loading);
    assert_eq!(state.view(), ResultView::Empty);
    assert_eq!(state.modal_dismissal().basic_search, Some(false));
}

#[tokio::test]
async fn test_rejection_keeps_previous_results() {
    let search = MockSearch::found();
    let store = store_with(search, MockDirectory::new(airports()));
    store.dispatch(Action::SearchFlights);
    let found = store.settled().await.unwrap();
    drop(store);

    let store = Store::with_state(
        found.clone(),
        Gateways::new(
            Arc::new(MockSearch::rejected(429)),
            Arc::new(MockDirectory::new(airports())),
            Arc::new(MockDirectory::new(airlines())),
        ),
    );
    store.dispatch(Action::SearchFlights);
    let state = store.settled().await.unwrap();

    assert_eq!(state.error.as_ref().unwrap().message, "Trial usage exceeded");
    assert_eq!(state.results, found.results);
    assert_eq!(state.airlines, found.airlines);
    assert_eq!(state.search_request, found.search_request);
}

#[tokio::test]
async fn test_transport_failure_records_raw_error() {
    let store = store_with(
        MockSearch::failing("connection reset by peer"),
        MockDirectory::new(airports()),
    );
    let seen = record(&store);

    store.dispatch(Action::SearchFlights);
    let state = store.settled().await.unwrap();

    let error = state.error.clone().unwrap();
    assert_eq!(error.status_code, None);
    assert!(error.message.contains("connection reset by peer"));
    assert!(!state.submitted);
    // The loading snapshot is not part of the accumulated state
    assert!(!state.loading);
    assert!(seen.lock().unwrap().iter().any(|s| s.loading));
}

#[tokio::test]
async fn test_reset_restores_initial_state() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));

    store.dispatch(flight("EI154"));
    store.dispatch(Action::SearchOriginAirport("lon".to_string()));
    store.dispatch(Action::SearchAirlines("aer".to_string()));
    store.dispatch(Action::SearchFlights);
    store.dispatch(Action::SwitchResultsTab);
    store.dispatch(Action::Reset);
    let state = store.settled().await.unwrap();

    assert_eq!(state, AppState::initial());
    assert_eq!(store.get_value().unwrap(), AppState::initial());
}

#[tokio::test]
async fn test_stale_autocomplete_resolves_in_dispatch_order() {
    let directory =
        MockDirectory::new(airports()).with_query_delay("dub", Duration::from_millis(80));
    let queries = directory.queries.clone();
    let store = store_with(MockSearch::found(), directory);
    let seen = record(&store);

    store.dispatch(Action::SearchOriginAirport("dub".to_string()));
    store.dispatch(Action::SearchOriginAirport("london".to_string()));
    let state = store.settled().await.unwrap();

    assert_eq!(
        state.origin_airports,
        vec![
            Suggestion::new("London Heathrow", "LHR"),
            Suggestion::new("London Gatwick", "LGW"),
        ]
    );
    assert!(!state.loading_origin_airports);
    assert_eq!(*queries.lock().unwrap(), vec!["dub".to_string(), "london".to_string()]);

    let lists: Vec<usize> = seen
        .lock()
        .unwrap()
        .iter()
        .filter(|s| !s.loading_origin_airports)
        .map(|s| s.origin_airports.len())
        .collect();
    assert_eq!(lists, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_autocomplete_targets_are_independent() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));

    store.dispatch(Action::SearchOriginAirport("dub".to_string()));
    store.dispatch(Action::SearchDestinationAirport("gatwick".to_string()));
    store.dispatch(Action::SearchAirlines("ryan".to_string()));
    let state = store.settled().await.unwrap();

    assert_eq!(state.origin_airports, vec![Suggestion::new("Dublin", "DUB")]);
    assert_eq!(state.destination_airports, vec![Suggestion::new("London Gatwick", "LGW")]);
    assert_eq!(state.airlines, vec![Suggestion::new("Ryanair", "RYR")]);
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_autocomplete_loading_flag_is_published() {
    let store = store_with(
        MockSearch::found(),
        MockDirectory::new(airports()).with_query_delay("cork", Duration::from_millis(20)),
    );
    let seen = record(&store);

    store.dispatch(Action::SearchDestinationAirport("cork".to_string()));
    store.settled().await.unwrap();

    let flags: Vec<bool> = seen
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.loading_destination_airports)
        .collect();
    assert_eq!(flags, vec![false, true, false]);
}

#[tokio::test]
async fn test_autocomplete_failure_keeps_previous_list() {
    let previous = AppState {
        airlines: vec![Suggestion::new("Aer Lingus", "EIN")],
        ..AppState::initial()
    };
    let store = Store::with_state(
        previous,
        Gateways::new(
            Arc::new(MockSearch::found()),
            Arc::new(MockDirectory::new(airports())),
            Arc::new(MockDirectory::failing("airlines endpoint unreachable")),
        ),
    );

    store.dispatch(Action::SearchAirlines("ry".to_string()));
    let state = store.settled().await.unwrap();

    assert_eq!(state.airlines, vec![Suggestion::new("Aer Lingus", "EIN")]);
    assert!(!state.loading_airlines);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_hide_modal_seeds_next_search() {
    let store = store_with(MockSearch::rejected(207), MockDirectory::new(airports()));

    store.dispatch(Action::UpdateSearchFlights(SearchRequestPatch {
        flight_number: Some("EI154".to_string()),
        number_of_passengers: Some(4),
        ..Default::default()
    }));
    store.dispatch(Action::SearchFlights);
    let failed = store.settled().await.unwrap();
    assert_eq!(failed.error.as_ref().unwrap().status_code, Some(207));

    store.dispatch(Action::HideModal(failed.modal_dismissal()));
    let state = store.settled().await.unwrap();

    assert!(state.error.is_none());
    assert!(!state.submitted);
    assert_eq!(
        state.search_request,
        SearchRequest {
            basic_search: false,
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn test_switch_results_tab_toggles_view() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));

    store.dispatch(Action::SearchFlights);
    store.dispatch(Action::SwitchResultsTab);
    assert_eq!(store.settled().await.unwrap().view(), ResultView::AircraftDiagram);

    store.dispatch(Action::SwitchResultsTab);
    assert_eq!(store.settled().await.unwrap().view(), ResultView::Emissions);
}

#[tokio::test]
async fn test_update_search_clamps_counts() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));

    store.dispatch(Action::UpdateSearchFlights(SearchRequestPatch {
        number_of_flights: Some(0),
        number_of_passengers: Some(0),
        seat_class: Some(SeatClass::Business),
        ..Default::default()
    }));
    let state = store.settled().await.unwrap();

    assert_eq!(state.search_request.number_of_flights, 1);
    assert_eq!(state.search_request.number_of_passengers, 1);
    assert_eq!(state.search_request.seat_class, SeatClass::Business);
}

#[tokio::test]
async fn test_dispatch_returns_before_search_completes() {
    let store = store_with(
        MockSearch::found().with_delay(Duration::from_millis(100)),
        MockDirectory::new(airports()),
    );

    let start = std::time::Instant::now();
    store.dispatch(Action::SearchFlights);
    store.dispatch(Action::SearchFlights);
    assert!(start.elapsed() < Duration::from_millis(50));

    store.settled().await.unwrap();
}

#[tokio::test]
async fn test_subscriber_receives_current_state_then_updates() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));
    store.dispatch(Action::SwitchResultsTab);
    store.settled().await.unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut subscription =
        store.subscribe(move |state| sink.lock().unwrap().push(state.display_aircraft_diagram));
    assert_eq!(*seen.lock().unwrap(), vec![true]);

    store.dispatch(Action::SwitchResultsTab);
    store.settled().await.unwrap();
    subscription.unsubscribe();
    subscription.unsubscribe();

    store.dispatch(Action::SwitchResultsTab);
    store.settled().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    assert!(!subscription.is_active());
}

#[tokio::test]
async fn test_subscribers_notified_in_subscription_order() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    let _a = store.subscribe(move |_| first.lock().unwrap().push("first"));
    let second = Arc::clone(&order);
    let _b = store.subscribe(move |_| second.lock().unwrap().push("second"));

    store.dispatch(Action::Reset);
    store.settled().await.unwrap();

    assert_eq!(
        *order.lock().unwrap(),
        vec!["first", "second", "first", "second"]
    );
}

#[tokio::test]
async fn test_closed_store_rejects_reads() {
    let store = store_with(MockSearch::found(), MockDirectory::new(airports()));
    let seen = record(&store);

    store.close();
    store.dispatch(Action::SwitchResultsTab);

    assert!(store.get_value().is_err());
    assert!(store.settled().await.is_err());
    assert_eq!(seen.lock().unwrap().len(), 1);
}
