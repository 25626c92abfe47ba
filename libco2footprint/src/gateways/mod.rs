//! Gateways to the remote CO2 footprint API
//!
//! The store never talks HTTP itself. It is handed three collaborators:
//!
//! - a [`FlightSearch`] that looks a flight up and classifies the response,
//! - two [`SuggestionSource`]s (airports and airlines) backing autocomplete.
//!
//! # Examples
//!
//! ```no_run
//! use libco2footprint::config::Config;
//! use libco2footprint::gateways::{FlightSearch, Gateways, SuggestionSource};
//! use libco2footprint::types::SearchRequest;
//!
//! # async fn example() -> libco2footprint::Result<()> {
//! let config = Config::load()?;
//! config.validate()?;
//!
//! let gateways = Gateways::http(&config);
//! let request = SearchRequest {
//!     flight_number: "EI154".to_string(),
//!     ..Default::default()
//! };
//! let outcome = gateways.search.search(&request).await?;
//! println!("{:?}", outcome);
//!
//! let airports = gateways.airports.search("dub").await?;
//! println!("{} airports match", airports.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ErrorInfo, SearchRequest, SeatClass, Suggestion};

pub mod catalog;
pub mod client;
pub mod search;

// Mock gateways are available for all builds (not just tests) to support integration tests
pub mod mock;

pub use catalog::{Catalog, CatalogKind, HttpCatalogLoader};
pub use client::ApiClient;
pub use search::HttpSearchGateway;

/// Flight lookup against the calculation endpoint
#[async_trait]
pub trait FlightSearch: Send + Sync {
    /// Look the flight described by `request` up
    ///
    /// Uses the flight number when `request.basic_search` is set, otherwise
    /// the airline and the departure/arrival airports.
    ///
    /// # Errors
    ///
    /// Only transport failures and malformed payloads are errors. Known API
    /// rejections come back as `Ok(SearchOutcome::Rejected(..))`.
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome>;
}

/// Filtered lookup over a reference list (airports or airlines)
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Entries whose name or code contains `query`, case-insensitively
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>>;
}

/// Fetches a complete reference list; wrapped by [`Catalog`] for caching
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Suggestion>>;
}

/// Classified response of the calculation endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(FlightFootprint),
    Rejected(ErrorInfo),
}

/// Emissions figures for one cabin class as reported by the API
#[derive(Debug, Clone, PartialEq)]
pub struct SeatClassEmissions {
    pub seat_class: SeatClass,
    pub name: String,
    pub seats: u32,
    pub emissions_per_seat: f64,
}

/// Normalized payload of a successful calculation
#[derive(Debug, Clone, PartialEq)]
pub struct FlightFootprint {
    /// Flight number the API resolved the lookup to
    pub flight_number: String,
    pub aircraft_type_name: String,
    pub distance_km: f64,
    pub flights_over_12_months: u32,
    pub aircraft_registration: String,
    /// Always the five classes, in [`SeatClass::API_ORDER`]
    pub seat_classes: Vec<SeatClassEmissions>,
    pub airline: Suggestion,
    pub origin: Suggestion,
    pub destination: Suggestion,
}

impl FlightFootprint {
    /// Per-seat emissions for `seat_class`, zero if the class is missing
    pub fn emissions_for(&self, seat_class: SeatClass) -> f64 {
        self.seat_classes
            .iter()
            .find(|row| row.seat_class == seat_class)
            .map(|row| row.emissions_per_seat)
            .unwrap_or_default()
    }
}

/// The collaborators a store is built with
#[derive(Clone)]
pub struct Gateways {
    pub search: Arc<dyn FlightSearch>,
    pub airports: Arc<dyn SuggestionSource>,
    pub airlines: Arc<dyn SuggestionSource>,
}

impl Gateways {
    pub fn new(
        search: Arc<dyn FlightSearch>,
        airports: Arc<dyn SuggestionSource>,
        airlines: Arc<dyn SuggestionSource>,
    ) -> Self {
        Self {
            search,
            airports,
            airlines,
        }
    }

    /// HTTP gateways sharing one client, built from `config`
    pub fn http(config: &Config) -> Self {
        let client = ApiClient::new(&config.api);

        Self {
            search: Arc::new(HttpSearchGateway::new(
                client.clone(),
                config.widget.apply_load_factor,
            )),
            airports: Arc::new(Catalog::new(HttpCatalogLoader::new(
                client.clone(),
                CatalogKind::Airports,
            ))),
            airlines: Arc::new(Catalog::new(HttpCatalogLoader::new(
                client,
                CatalogKind::Airlines,
            ))),
        }
    }
}
