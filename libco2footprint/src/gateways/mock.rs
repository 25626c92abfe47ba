//! Mock gateways for testing
//!
//! Configurable stand-ins for the HTTP gateways that can simulate API
//! rejections, transport failures and latency. Used by the integration
//! tests to drive the store without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use super::{
    CatalogLoader, FlightFootprint, FlightSearch, SearchOutcome, SeatClassEmissions,
    SuggestionSource,
};
use crate::error::{GatewayError, Result};
use crate::types::{ErrorInfo, SearchRequest, SeatClass, Suggestion};

/// What a [`MockSearch`] answers with
#[derive(Debug, Clone)]
pub enum MockSearchResponse {
    Found(FlightFootprint),
    /// Non-200 status, classified like the HTTP gateway does
    Rejected(u16),
    /// Transport failure
    Fail(String),
}

/// Mock flight search
#[derive(Debug, Clone)]
pub struct MockSearch {
    pub response: MockSearchResponse,

    /// Delay before answering (simulates network latency)
    pub delay: Duration,

    /// Number of times search has been called
    pub call_count: Arc<Mutex<usize>>,

    /// Requests received, in call order
    pub requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl MockSearch {
    pub fn new(response: MockSearchResponse) -> Self {
        Self {
            response,
            delay: Duration::ZERO,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers with [`sample_footprint`]
    pub fn found() -> Self {
        Self::new(MockSearchResponse::Found(sample_footprint()))
    }

    pub fn rejected(status: u16) -> Self {
        Self::new(MockSearchResponse::Rejected(status))
    }

    pub fn failing(error: &str) -> Self {
        Self::new(MockSearchResponse::Fail(error.to_string()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn received(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlightSearch for MockSearch {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        *self.call_count.lock().unwrap() += 1;
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match &self.response {
            MockSearchResponse::Found(footprint) => Ok(SearchOutcome::Found(footprint.clone())),
            MockSearchResponse::Rejected(status) => {
                Ok(SearchOutcome::Rejected(ErrorInfo::from_status(*status)))
            }
            MockSearchResponse::Fail(error) => Err(GatewayError::Network(error.clone()).into()),
        }
    }
}

/// Footprint with round per-class figures
///
/// First 10 kg / 4 seats, Business 8 / 20, Premium economy 6 / 30,
/// Comfort economy 5 / 40, Economy 4 / 150; EI154 Dublin -> London.
pub fn sample_footprint() -> FlightFootprint {
    let figures = [
        (SeatClass::First, 10.0, 4),
        (SeatClass::Business, 8.0, 20),
        (SeatClass::PremiumEconomy, 6.0, 30),
        (SeatClass::ComfortEconomy, 5.0, 40),
        (SeatClass::Economy, 4.0, 150),
    ];

    FlightFootprint {
        flight_number: "EI154".to_string(),
        aircraft_type_name: "Airbus A320".to_string(),
        distance_km: 449.0,
        flights_over_12_months: 712,
        aircraft_registration: "EI-DEO".to_string(),
        seat_classes: figures
            .iter()
            .map(|&(seat_class, emissions, seats)| SeatClassEmissions {
                seat_class,
                name: seat_class.result_name().to_string(),
                seats,
                emissions_per_seat: emissions,
            })
            .collect(),
        airline: Suggestion::new("Aer Lingus", "EI"),
        origin: Suggestion::new("Dublin", "DUB"),
        destination: Suggestion::new("London", "LHR"),
    }
}

/// Mock autocomplete source filtering a fixed list
///
/// Latency can be set per query, so tests can make an earlier query
/// resolve after a later one would have.
#[derive(Debug, Clone)]
pub struct MockDirectory {
    pub entries: Vec<Suggestion>,
    pub delays: HashMap<String, Duration>,
    pub error: Option<String>,

    /// Queries received, in call order
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockDirectory {
    pub fn new(entries: Vec<Suggestion>) -> Self {
        Self {
            entries,
            delays: HashMap::new(),
            error: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_query_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn received(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionSource for MockDirectory {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(delay) = self.delays.get(query) {
            sleep(*delay).await;
        }

        if let Some(error) = &self.error {
            return Err(GatewayError::Network(error.clone()).into());
        }

        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.matches(query))
            .cloned()
            .collect())
    }
}

/// Mock reference list loader that counts fetches
#[derive(Debug, Clone)]
pub struct MockCatalogLoader {
    pub entries: Vec<Suggestion>,
    pub delay: Duration,
    /// Fail the first load, succeed afterwards
    pub fail_first: bool,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockCatalogLoader {
    pub fn new(entries: Vec<Suggestion>) -> Self {
        Self {
            entries,
            delay: Duration::ZERO,
            fail_first: false,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing_once(entries: Vec<Suggestion>) -> Self {
        Self {
            fail_first: true,
            ..Self::new(entries)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl CatalogLoader for MockCatalogLoader {
    async fn load(&self) -> Result<Vec<Suggestion>> {
        let call = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if self.fail_first && call == 1 {
            return Err(GatewayError::Network("Mock reference list unavailable".to_string()).into());
        }

        Ok(self.entries.clone())
    }
}
