//! Flight lookup against `GET {base}/co2footprint/calculate`

use async_trait::async_trait;
use serde::Deserialize;

use super::client::ApiClient;
use super::{FlightFootprint, FlightSearch, SearchOutcome, SeatClassEmissions};
use crate::error::{GatewayError, Result};
use crate::types::{ErrorInfo, SearchRequest, SeatClass, Suggestion};

pub const CALCULATE_PATH: &str = "calculate";

const RESPONSE_OK: u16 = 200;

/// Provider payload of the calculation endpoint
///
/// Every field is optional on the wire; absent numbers read as zero and
/// absent strings as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationResponse {
    pub source_flight_number: Option<String>,
    pub aircraft_model: Option<String>,
    pub distance_km: Option<f64>,
    pub flight_cycles: Option<u32>,
    pub aircraft_registration: Option<String>,

    #[serde(rename = "cO2PerSeatFirst")]
    pub co2_per_seat_first: Option<f64>,
    #[serde(rename = "cO2PerSeatBusiness")]
    pub co2_per_seat_business: Option<f64>,
    #[serde(rename = "cO2PerSeatPremiumEconomy")]
    pub co2_per_seat_premium_economy: Option<f64>,
    #[serde(rename = "cO2PerSeatEconomyComfort")]
    pub co2_per_seat_economy_comfort: Option<f64>,
    #[serde(rename = "cO2PerSeatEconomy")]
    pub co2_per_seat_economy: Option<f64>,

    pub seats_first_class: Option<u32>,
    pub seats_business: Option<u32>,
    pub seats_premium_economy: Option<u32>,
    pub seats_economy_comfort: Option<u32>,
    pub seats_economy: Option<u32>,

    pub airline: Option<String>,
    pub airline_iata_code: Option<String>,
    pub origin_city: Option<String>,
    pub origin_airport_code: Option<String>,
    pub destination_city: Option<String>,
    pub destination_airport_code: Option<String>,
}

impl CalculationResponse {
    fn seat_class_figures(&self, seat_class: SeatClass) -> (Option<f64>, Option<u32>) {
        match seat_class {
            SeatClass::First => (self.co2_per_seat_first, self.seats_first_class),
            SeatClass::Business => (self.co2_per_seat_business, self.seats_business),
            SeatClass::PremiumEconomy => {
                (self.co2_per_seat_premium_economy, self.seats_premium_economy)
            }
            SeatClass::ComfortEconomy => {
                (self.co2_per_seat_economy_comfort, self.seats_economy_comfort)
            }
            SeatClass::Economy => (self.co2_per_seat_economy, self.seats_economy),
        }
    }

    /// Map provider field names onto the five fixed seat classes
    pub fn into_footprint(self) -> FlightFootprint {
        let seat_classes = SeatClass::API_ORDER
            .iter()
            .map(|&seat_class| {
                let (emissions, seats) = self.seat_class_figures(seat_class);
                SeatClassEmissions {
                    seat_class,
                    name: seat_class.result_name().to_string(),
                    seats: seats.unwrap_or_default(),
                    emissions_per_seat: emissions.unwrap_or_default(),
                }
            })
            .collect();

        FlightFootprint {
            flight_number: self.source_flight_number.unwrap_or_default(),
            aircraft_type_name: self.aircraft_model.unwrap_or_default(),
            distance_km: self.distance_km.unwrap_or_default(),
            flights_over_12_months: self.flight_cycles.unwrap_or_default(),
            aircraft_registration: self.aircraft_registration.unwrap_or_default(),
            seat_classes,
            airline: Suggestion::new(
                self.airline.unwrap_or_default(),
                self.airline_iata_code.unwrap_or_default(),
            ),
            origin: Suggestion::new(
                self.origin_city.unwrap_or_default(),
                self.origin_airport_code.unwrap_or_default(),
            ),
            destination: Suggestion::new(
                self.destination_city.unwrap_or_default(),
                self.destination_airport_code.unwrap_or_default(),
            ),
        }
    }
}

/// Turn an HTTP status and body into a search outcome
///
/// 200 carries the calculation; every other status is a rejection mapped
/// through the known error table.
pub fn classify_response(
    status: u16,
    body: &str,
) -> std::result::Result<SearchOutcome, GatewayError> {
    if status == RESPONSE_OK {
        let payload: CalculationResponse = serde_json::from_str(body)?;
        return Ok(SearchOutcome::Found(payload.into_footprint()));
    }

    Ok(SearchOutcome::Rejected(ErrorInfo::from_status(status)))
}

/// Query parameters for the lookup strategy selected by `basic_search`
pub fn lookup_query(request: &SearchRequest, apply_load_factor: bool) -> Vec<(&'static str, String)> {
    let load_factor = ("applyLoadFactor", apply_load_factor.to_string());

    if request.basic_search {
        vec![("flightNumber", request.flight_number.clone()), load_factor]
    } else {
        vec![
            ("airline", request.airline.clone()),
            ("origin", request.departure_airport.clone()),
            ("destination", request.arrival_airport.clone()),
            load_factor,
        ]
    }
}

/// [`FlightSearch`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpSearchGateway {
    client: ApiClient,
    apply_load_factor: bool,
}

impl HttpSearchGateway {
    pub fn new(client: ApiClient, apply_load_factor: bool) -> Self {
        Self {
            client,
            apply_load_factor,
        }
    }
}

#[async_trait]
impl FlightSearch for HttpSearchGateway {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        if request.basic_search {
            tracing::info!(flight_number = %request.flight_number, "Searching flights by flight number");
        } else {
            tracing::info!(
                airline = %request.airline,
                origin = %request.departure_airport,
                destination = %request.arrival_airport,
                "Searching flights by route"
            );
        }

        let query = lookup_query(request, self.apply_load_factor);
        let response = self.client.get(CALCULATE_PATH, &query).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(GatewayError::from)?;

        let outcome = classify_response(status, &body)?;
        if let SearchOutcome::Rejected(error) = &outcome {
            tracing::warn!(status, message = %error.message, "Search rejected by API");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "sourceFlightNumber": "EI154",
        "aircraftModel": "Airbus A320",
        "distanceKm": 449.5,
        "flightCycles": 712,
        "aircraftRegistration": "EI-DEO",
        "cO2PerSeatFirst": 10.0,
        "cO2PerSeatBusiness": 8.0,
        "cO2PerSeatPremiumEconomy": 6.0,
        "cO2PerSeatEconomyComfort": 5.0,
        "cO2PerSeatEconomy": 4.0,
        "seatsFirstClass": 4,
        "seatsBusiness": 20,
        "seatsPremiumEconomy": 30,
        "seatsEconomyComfort": 40,
        "seatsEconomy": 150,
        "airline": "Aer Lingus",
        "airlineIataCode": "EI",
        "originCity": "Dublin",
        "originAirportCode": "DUB",
        "destinationCity": "London",
        "destinationAirportCode": "LHR"
    }"#;

    #[test]
    fn test_classify_ok_maps_seat_classes_in_api_order() {
        let outcome = classify_response(200, FULL_PAYLOAD).unwrap();
        let SearchOutcome::Found(footprint) = outcome else {
            panic!("expected a footprint");
        };

        let order: Vec<SeatClass> = footprint.seat_classes.iter().map(|r| r.seat_class).collect();
        assert_eq!(order, SeatClass::API_ORDER.to_vec());

        let names: Vec<&str> = footprint.seat_classes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["First class", "Business class", "Premium economy", "Comfort economy", "Economy"]
        );

        assert_eq!(footprint.seat_classes[0].emissions_per_seat, 10.0);
        assert_eq!(footprint.seat_classes[0].seats, 4);
        assert_eq!(footprint.seat_classes[3].emissions_per_seat, 5.0);
        assert_eq!(footprint.seat_classes[3].seats, 40);
        assert_eq!(footprint.seat_classes[4].seats, 150);
    }

    #[test]
    fn test_classify_ok_maps_route_and_aircraft() {
        let SearchOutcome::Found(footprint) = classify_response(200, FULL_PAYLOAD).unwrap() else {
            panic!("expected a footprint");
        };

        assert_eq!(footprint.flight_number, "EI154");
        assert_eq!(footprint.aircraft_type_name, "Airbus A320");
        assert_eq!(footprint.distance_km, 449.5);
        assert_eq!(footprint.flights_over_12_months, 712);
        assert_eq!(footprint.aircraft_registration, "EI-DEO");
        assert_eq!(footprint.airline, Suggestion::new("Aer Lingus", "EI"));
        assert_eq!(footprint.origin, Suggestion::new("Dublin", "DUB"));
        assert_eq!(footprint.destination, Suggestion::new("London", "LHR"));
    }

    #[test]
    fn test_classify_ok_tolerates_missing_fields() {
        let SearchOutcome::Found(footprint) =
            classify_response(200, r#"{"aircraftModel": null}"#).unwrap()
        else {
            panic!("expected a footprint");
        };

        assert_eq!(footprint.seat_classes.len(), 5);
        assert!(footprint.aircraft_type_name.is_empty());
        assert_eq!(footprint.emissions_for(SeatClass::Economy), 0.0);
    }

    #[test]
    fn test_classify_ok_malformed_body_is_decode_error() {
        let err = classify_response(200, "<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn test_classify_known_errors() {
        for status in [204, 207, 400, 404, 429, 500] {
            let outcome = classify_response(status, "").unwrap();
            let SearchOutcome::Rejected(error) = outcome else {
                panic!("expected a rejection for {}", status);
            };
            assert_eq!(error.status_code, Some(status));
            assert!(error.is_known(), "status {}", status);
        }
    }

    #[test]
    fn test_classify_unknown_status_is_generic() {
        let SearchOutcome::Rejected(error) = classify_response(503, "busy").unwrap() else {
            panic!("expected a rejection");
        };
        assert_eq!(error.status_code, Some(503));
        assert_eq!(error.message, crate::types::GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_lookup_query_by_flight_number() {
        let request = SearchRequest {
            flight_number: "EI154".to_string(),
            airline: "ignored".to_string(),
            ..Default::default()
        };

        let query = lookup_query(&request, true);
        assert_eq!(
            query,
            vec![
                ("flightNumber", "EI154".to_string()),
                ("applyLoadFactor", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_lookup_query_by_route() {
        let request = SearchRequest {
            basic_search: false,
            airline: "EIN".to_string(),
            departure_airport: "DUB".to_string(),
            arrival_airport: "LHR".to_string(),
            ..Default::default()
        };

        let query = lookup_query(&request, false);
        assert_eq!(
            query,
            vec![
                ("airline", "EIN".to_string()),
                ("origin", "DUB".to_string()),
                ("destination", "LHR".to_string()),
                ("applyLoadFactor", "false".to_string()),
            ]
        );
    }
}
