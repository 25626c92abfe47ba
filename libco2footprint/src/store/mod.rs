//! Action-dispatch store
//!
//! A [`Store`] owns the widget state. Actions are queued on an unbounded
//! channel and handled by a single worker task, one at a time, in dispatch
//! order: the handler for an action does not start until the previous one
//! has produced its state, even when that meant awaiting a gateway. The
//! state is published to subscribers after each action.
//!
//! While a gateway call is in flight the store publishes a loading snapshot
//! (the latest published state with the relevant flag set). That snapshot
//! is for display only; it is not folded into the state the next action
//! starts from.
//!
//! # Examples
//!
//! ```no_run
//! use libco2footprint::config::Config;
//! use libco2footprint::gateways::Gateways;
//! use libco2footprint::store::{Action, Store};
//! use libco2footprint::types::SearchRequestPatch;
//!
//! # async fn example() -> libco2footprint::Result<()> {
//! let config = Config::load()?;
//! let store = Store::new(Gateways::http(&config));
//!
//! let _subscription = store.subscribe(|state| {
//!     println!("loading={} submitted={}", state.loading, state.submitted);
//! });
//!
//! store.dispatch(Action::UpdateSearchFlights(SearchRequestPatch {
//!     flight_number: Some("EI154".to_string()),
//!     ..Default::default()
//! }));
//! store.dispatch(Action::SearchFlights);
//!
//! let state = store.settled().await?;
//! println!("{} kg CO2", state.results.emissions_total);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{Result, StoreError};
use crate::gateways::{FlightSearch, Gateways, SuggestionSource};

pub mod actions;
pub mod reducer;
pub mod state;
pub mod stream;

pub use actions::Action;
pub use reducer::SuggestionTarget;
pub use state::{AppState, ResultView};
pub use stream::{StateStream, Subscription};

/// Queue entry consumed by the worker
enum Envelope {
    Action(Action),
    /// Answered with the accumulated state once every earlier entry is done
    Barrier(oneshot::Sender<AppState>),
}

/// Serialized action processor publishing [`AppState`]
///
/// Dropping the store stops the worker; an action being handled at that
/// moment is abandoned.
pub struct Store {
    stream: StateStream<AppState>,
    sender: mpsc::UnboundedSender<Envelope>,
    worker: JoinHandle<()>,
}

impl Store {
    /// Start a store in the initial state
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime, which runs the worker.
    pub fn new(gateways: Gateways) -> Self {
        Self::with_state(AppState::initial(), gateways)
    }

    /// Start a store from `initial`
    pub fn with_state(initial: AppState, gateways: Gateways) -> Self {
        let stream = StateStream::new(initial.clone());
        let (sender, receiver) = mpsc::unbounded_channel();

        let worker = tokio::spawn(run(receiver, stream.clone(), gateways, initial));

        Self {
            stream,
            sender,
            worker,
        }
    }

    /// Queue `action`; returns immediately
    pub fn dispatch(&self, action: Action) {
        if self.stream.is_closed() {
            tracing::warn!(action = %action, "Store closed, dropping action");
            return;
        }

        tracing::debug!(action = %action, "Action dispatched");
        if self.sender.send(Envelope::Action(action)).is_err() {
            tracing::warn!("Store worker stopped, action dropped");
        }
    }

    /// Observe the current state and every state published afterwards
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        self.stream.subscribe(observer)
    }

    /// Latest published state
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` after [`Store::close`].
    pub fn get_value(&self) -> Result<AppState> {
        self.stream.value()
    }

    /// Wait until every action dispatched so far has been handled
    ///
    /// Resolves with the state the next action would start from.
    pub async fn settled(&self) -> Result<AppState> {
        if self.stream.is_closed() {
            return Err(StoreError::Closed.into());
        }

        let (reply, wait) = oneshot::channel();
        self.sender
            .send(Envelope::Barrier(reply))
            .map_err(|_| StoreError::Closed)?;

        Ok(wait.await.map_err(|_| StoreError::Closed)?)
    }

    /// Stop the worker and detach all subscribers
    pub fn close(&self) {
        if !self.stream.is_closed() {
            tracing::debug!("Closing store");
        }
        self.worker.abort();
        self.stream.close();
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("closed", &self.stream.is_closed())
            .field("subscribers", &self.stream.observer_count())
            .finish()
    }
}

async fn run(
    mut receiver: mpsc::UnboundedReceiver<Envelope>,
    stream: StateStream<AppState>,
    gateways: Gateways,
    mut state: AppState,
) {
    while let Some(envelope) = receiver.recv().await {
        match envelope {
            Envelope::Action(action) => {
                tracing::debug!(action = %action, gateway = action.is_async(), "Handling action");
                state = handle_action(state, action, &gateways, &stream).await;
                tracing::trace!(error = state.has_error(), busy = state.is_busy(), "Publishing state");
                stream.publish(state.clone());
            }
            Envelope::Barrier(reply) => {
                // The waiter may have given up
                let _ = reply.send(state.clone());
            }
        }
    }

    tracing::debug!("Store worker finished");
}

async fn handle_action(
    state: AppState,
    action: Action,
    gateways: &Gateways,
    stream: &StateStream<AppState>,
) -> AppState {
    match action {
        Action::SearchFlights => {
            stream.update(reducer::search_started);

            match gateways.search.search(&state.search_request).await {
                Ok(outcome) => reducer::apply_search_outcome(state, outcome),
                Err(e) => {
                    tracing::error!(error = %e, "Flight search failed");
                    reducer::apply_search_failure(state, e.to_string())
                }
            }
        }
        Action::UpdateSearchFlights(patch) => reducer::update_search(state, &patch),
        Action::SearchOriginAirport(query) => {
            lookup(state, SuggestionTarget::OriginAirports, &gateways.airports, &query, stream)
                .await
        }
        Action::SearchDestinationAirport(query) => {
            lookup(
                state,
                SuggestionTarget::DestinationAirports,
                &gateways.airports,
                &query,
                stream,
            )
            .await
        }
        Action::SearchAirlines(query) => {
            lookup(state, SuggestionTarget::Airlines, &gateways.airlines, &query, stream).await
        }
        Action::Reset => reducer::reset(),
        Action::SwitchResultsTab => reducer::switch_results_tab(state),
        Action::HideModal(patch) => reducer::hide_modal(&patch),
    }
}

async fn lookup(
    state: AppState,
    target: SuggestionTarget,
    source: &Arc<dyn SuggestionSource>,
    query: &str,
    stream: &StateStream<AppState>,
) -> AppState {
    stream.update(|latest| reducer::lookup_started(latest, target));

    let suggestions = match source.search(query).await {
        Ok(list) => {
            tracing::debug!(list = target.name(), query, count = list.len(), "Suggestions received");
            Some(list)
        }
        Err(e) => {
            tracing::warn!(list = target.name(), query, error = %e, "Suggestion lookup failed");
            None
        }
    };

    reducer::apply_suggestions(state, target, suggestions)
}
