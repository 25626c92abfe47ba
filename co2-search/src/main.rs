//! co2-search - Look up the CO2 footprint of a flight

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use libco2footprint::config::Config;
use libco2footprint::logging;
use libco2footprint::{Action, AppState, Co2Error, Gateways, SearchRequestPatch, SeatClass, Store};

use output::SearchReport;

#[derive(Parser, Debug)]
#[command(name = "co2-search")]
#[command(version, about = "Look up the CO2 footprint of a flight")]
#[command(long_about = r#"Look up the CO2 footprint of a flight by flight number or by route.

EXAMPLES:
    # By flight number
    co2-search flight EI154

    # Three passengers, return trip, business class
    co2-search flight EI154 --passengers 3 --flights 2 --seat-class business

    # By airline and route (use when a flight number is ambiguous)
    co2-search route --airline EIN --from DUB --to LHR

    # Find airport and airline codes
    co2-search airports london
    co2-search airlines "aer lingus"

    # JSON output for scripting
    co2-search --format json flight EI154 | jq '.results.emissionsTotal'

CONFIGURATION:
    The API key is read from --api-key, CO2FOOTPRINT_API_KEY or the
    [api] section of ~/.config/co2footprint/config.toml.

EXIT CODES:
    0 - Success
    1 - Search rejected by the API, or any other error
    2 - Authentication failed or usage quota exceeded
    3 - Invalid input
"#)]
struct Cli {
    /// Configuration file (default: ~/.config/co2footprint/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// API key sent with every request
    #[arg(long, global = true, env = "CO2FOOTPRINT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Apply the IATA average load factor to per-seat emissions
    #[arg(long, global = true)]
    apply_load_factor: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search by flight number
    Flight {
        /// Flight number, e.g. EI154
        flight_number: String,

        #[command(flatten)]
        trip: TripArgs,
    },

    /// Search by airline and route
    Route {
        /// Airline code
        #[arg(long)]
        airline: String,

        /// Departure airport code
        #[arg(long, value_name = "AIRPORT")]
        from: String,

        /// Arrival airport code
        #[arg(long, value_name = "AIRPORT")]
        to: String,

        #[command(flatten)]
        trip: TripArgs,
    },

    /// List airports matching a name or code
    Airports { query: String },

    /// List airlines matching a name or code
    Airlines { query: String },
}

#[derive(Args, Debug)]
struct TripArgs {
    /// economy, comfort-economy, premium-economy, business or first
    #[arg(long, default_value = "economy")]
    seat_class: SeatClass,

    /// Number of flights taken
    #[arg(long, default_value_t = 1)]
    flights: u32,

    #[arg(long, default_value_t = 1)]
    passengers: u32,

    /// Do not show everyday equivalents of the emissions
    #[arg(long)]
    no_equivalents: bool,
}

impl TripArgs {
    fn patch(&self) -> SearchRequestPatch {
        SearchRequestPatch {
            seat_class: Some(self.seat_class),
            number_of_flights: Some(self.flights),
            number_of_passengers: Some(self.passengers),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = logging::config_from_env();
    logging.verbose = cli.verbose;
    if let Err(e) = logging.init() {
        eprintln!("Warning: {}", e);
    }

    match run(cli).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<Co2Error>()
                .map(Co2Error::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

/// Returns the process exit code
async fn run(cli: Cli) -> Result<i32> {
    tracing::debug!("co2-search started with args: {:?}", cli.command);

    let patch = search_patch(&cli.command)?;
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Flight { trip, .. } | Command::Route { trip, .. } => {
            let show_equivalents = config.widget.show_equivalents && !trip.no_equivalents;
            search(&config, patch, &cli.format, show_equivalents).await
        }
        Command::Airports { query } => {
            let suggestions = Gateways::http(&config).airports.search(query).await?;
            print_suggestions(&suggestions, &cli.format)?;
            Ok(0)
        }
        Command::Airlines { query } => {
            let suggestions = Gateways::http(&config).airlines.search(query).await?;
            print_suggestions(&suggestions, &cli.format)?;
            Ok(0)
        }
    }
}

fn required(value: &str, what: &str) -> std::result::Result<String, Co2Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Co2Error::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(value.to_uppercase())
}

/// Request fields selected on the command line
fn search_patch(command: &Command) -> Result<SearchRequestPatch> {
    let patch = match command {
        Command::Flight {
            flight_number,
            trip,
        } => SearchRequestPatch {
            basic_search: Some(true),
            flight_number: Some(required(flight_number, "Flight number")?),
            ..trip.patch()
        },
        Command::Route {
            airline,
            from,
            to,
            trip,
        } => SearchRequestPatch {
            basic_search: Some(false),
            airline: Some(required(airline, "Airline")?),
            departure_airport: Some(required(from, "Departure airport")?),
            arrival_airport: Some(required(to, "Arrival airport")?),
            ..trip.patch()
        },
        Command::Airports { .. } | Command::Airlines { .. } => SearchRequestPatch::default(),
    };
    Ok(patch)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            .with_env_overrides(),
        None => Config::load().context("Failed to load configuration")?,
    };

    if let Some(key) = &cli.api_key {
        config.api.api_key = key.clone();
    }
    if cli.apply_load_factor {
        config.widget.apply_load_factor = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run `actions` through a fresh store and return the state it settles on
async fn settle(config: &Config, actions: Vec<Action>) -> Result<AppState> {
    let store = Store::new(Gateways::http(config));
    let _subscription = store.subscribe(|state| {
        tracing::debug!(
            loading = state.is_busy(),
            error = state.has_error(),
            submitted = state.submitted,
            "State published"
        );
    });

    for action in actions {
        store.dispatch(action);
    }
    let state = store.settled().await?;
    store.close();
    Ok(state)
}

async fn search(
    config: &Config,
    patch: SearchRequestPatch,
    format: &str,
    show_equivalents: bool,
) -> Result<i32> {
    let state = settle(
        config,
        vec![Action::UpdateSearchFlights(patch), Action::SearchFlights],
    )
    .await?;

    let report = SearchReport::from_state(&state, show_equivalents);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", output::search_text(&state, &report)),
    }

    let Some(error) = &state.error else {
        return Ok(0);
    };

    if format != "json" {
        eprintln!("Error: {}", error);
    }
    let dismissal = state.modal_dismissal();
    if state.search_request.basic_search && dismissal.basic_search == Some(false) {
        eprintln!("Hint: search by route instead: co2-search route --airline <CODE> --from <AIRPORT> --to <AIRPORT>");
    }
    Ok(error.exit_code())
}

fn print_suggestions(suggestions: &[libco2footprint::Suggestion], format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(suggestions)?),
        _ => print!("{}", output::suggestions_text(suggestions)),
    }
    Ok(())
}
