//! Airport and airline reference lists for autocomplete
//!
//! Each list is fetched once, on first use, and then filtered locally.
//! Callers that arrive while the first fetch is in flight wait for it
//! instead of issuing their own.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::client::ApiClient;
use super::{CatalogLoader, SuggestionSource};
use crate::error::{GatewayError, Result};
use crate::types::Suggestion;

/// Which reference list a loader fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// `GET /co2footprint/airports` -> `[{name, iataCode}]`
    Airports,
    /// `GET /co2footprint/airlines` -> `[{name, icaoCode}]`
    Airlines,
}

impl CatalogKind {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Airports => "airports",
            Self::Airlines => "airlines",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirportEntry {
    name: String,
    iata_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirlineEntry {
    name: String,
    icao_code: String,
}

/// Parse a reference list body into suggestions, preserving order
pub fn parse_catalog(
    kind: CatalogKind,
    body: &str,
) -> std::result::Result<Vec<Suggestion>, GatewayError> {
    let suggestions = match kind {
        CatalogKind::Airports => serde_json::from_str::<Vec<AirportEntry>>(body)?
            .into_iter()
            .map(|entry| Suggestion::new(entry.name, entry.iata_code))
            .collect(),
        CatalogKind::Airlines => serde_json::from_str::<Vec<AirlineEntry>>(body)?
            .into_iter()
            .map(|entry| Suggestion::new(entry.name, entry.icao_code))
            .collect(),
    };
    Ok(suggestions)
}

/// Fetches a full reference list over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalogLoader {
    client: ApiClient,
    kind: CatalogKind,
}

impl HttpCatalogLoader {
    pub fn new(client: ApiClient, kind: CatalogKind) -> Self {
        Self { client, kind }
    }
}

#[async_trait]
impl CatalogLoader for HttpCatalogLoader {
    async fn load(&self) -> Result<Vec<Suggestion>> {
        tracing::info!(catalog = %self.kind, "Loading reference list");

        let response = self.client.get(self.kind.path(), &[]).await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(GatewayError::Status {
                endpoint: self.kind.path().to_string(),
                status,
            }
            .into());
        }

        let body = response.text().await.map_err(GatewayError::from)?;
        let entries = parse_catalog(self.kind, &body)?;
        tracing::debug!(catalog = %self.kind, count = entries.len(), "Reference list loaded");
        Ok(entries)
    }
}

/// Lazily loaded, session-long cache over a [`CatalogLoader`]
///
/// A successful load is kept for the lifetime of the catalog. A failed load
/// is not cached; the next search tries again.
pub struct Catalog<L> {
    loader: L,
    entries: OnceCell<Vec<Suggestion>>,
}

impl<L: CatalogLoader> Catalog<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: OnceCell::new(),
        }
    }

    /// The full list, loading it on first call
    pub async fn entries(&self) -> Result<&[Suggestion]> {
        let entries = self
            .entries
            .get_or_try_init(|| self.loader.load())
            .await?;
        Ok(entries.as_slice())
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.initialized()
    }
}

#[async_trait]
impl<L: CatalogLoader> SuggestionSource for Catalog<L> {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        let entries = self.entries().await?;
        Ok(entries
            .iter()
            .filter(|entry| entry.matches(query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::mock::MockCatalogLoader;

    #[test]
    fn test_parse_airports() {
        let body = r#"[{"name": "Dublin", "iataCode": "DUB"}, {"name": "Cork", "iataCode": "ORK"}]"#;
        let airports = parse_catalog(CatalogKind::Airports, body).unwrap();
        assert_eq!(
            airports,
            vec![Suggestion::new("Dublin", "DUB"), Suggestion::new("Cork", "ORK")]
        );
    }

    #[test]
    fn test_parse_airlines() {
        let body = r#"[{"name": "Aer Lingus", "icaoCode": "EIN", "country": "IE"}]"#;
        let airlines = parse_catalog(CatalogKind::Airlines, body).unwrap();
        assert_eq!(airlines, vec![Suggestion::new("Aer Lingus", "EIN")]);
    }

    #[test]
    fn test_parse_wrong_shape_is_decode_error() {
        let body = r#"[{"name": "Dublin", "icaoCode": "EIDW"}]"#;
        let err = parse_catalog(CatalogKind::Airports, body).unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively_on_name_or_code() {
        let catalog = Catalog::new(MockCatalogLoader::new(vec![
            Suggestion::new("Dublin", "DUB"),
            Suggestion::new("London Heathrow", "LHR"),
            Suggestion::new("London Gatwick", "LGW"),
        ]));

        let by_name = catalog.search("LONDON").await.unwrap();
        assert_eq!(by_name.len(), 2);
        assert_eq!(by_name[0].code, "LHR");
        assert_eq!(by_name[1].code, "LGW");

        let by_code = catalog.search("dub").await.unwrap();
        assert_eq!(by_code, vec![Suggestion::new("Dublin", "DUB")]);

        let everything = catalog.search("").await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_list_is_loaded_once_across_sequential_searches() {
        let loader = MockCatalogLoader::new(vec![Suggestion::new("Dublin", "DUB")]);
        let calls = loader.call_count.clone();
        let catalog = Catalog::new(loader);
        assert!(!catalog.is_loaded());

        catalog.search("d").await.unwrap();
        catalog.search("x").await.unwrap();
        catalog.search("").await.unwrap();

        assert!(catalog.is_loaded());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let loader = MockCatalogLoader::failing_once(vec![Suggestion::new("Dublin", "DUB")]);
        let calls = loader.call_count.clone();
        let catalog = Catalog::new(loader);

        assert!(catalog.search("dub").await.is_err());
        assert!(!catalog.is_loaded());

        let results = catalog.search("dub").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
