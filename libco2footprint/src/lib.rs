//! CO2 footprint - flight emissions search engine
//!
//! This library provides the state store behind the flight footprint
//! widget: gateways to the calculation API, a serialized action-dispatch
//! store and the latest-value stream it publishes through.

pub mod config;
pub mod equivalents;
pub mod error;
pub mod gateways;
pub mod logging;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Co2Error, Result};
pub use gateways::{Gateways, SearchOutcome};
pub use store::{Action, AppState, ResultView, Store, Subscription};
pub use types::{ErrorInfo, SearchRequest, SearchRequestPatch, SearchResult, SeatClass, Suggestion};
