//! Static market catalog.
//!
//! The catalog is a fixed JSON document loaded as-is. It is never mutated
//! after loading, so every query over it is idempotent.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::error::CatalogError;
use crate::metrics;

use super::types::Market;

/// Built-in catalog fixture.
const EMBEDDED_CATALOG: &str = include_str!("../../data/markets.json");

/// Where to load the catalog from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// The fixture compiled into the binary.
    #[default]
    Embedded,
    /// A JSON file on disk.
    File(PathBuf),
}

impl From<Option<PathBuf>> for CatalogSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(CatalogSource::Embedded, CatalogSource::File)
    }
}

/// Fixed collection of markets.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketCatalog {
    markets: Vec<Market>,
}

impl MarketCatalog {
    /// Parse a catalog document (a JSON array of markets).
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let markets: Vec<Market> = serde_json::from_str(raw)?;
        Ok(Self { markets })
    }

    /// Parse the built-in fixture.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Load a catalog after a cosmetic delay.
    #[instrument(skip(delay))]
    pub async fn load(source: &CatalogSource, delay: Duration) -> Result<Self, CatalogError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let catalog = match source {
            CatalogSource::Embedded => Self::embedded()?,
            CatalogSource::File(path) => Self::from_path(path.clone())?,
        };

        metrics::inc_catalog_loads();
        info!(markets = catalog.len(), "Loaded market catalog");
        Ok(catalog)
    }

    /// All markets in catalog order.
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Number of markets.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Look up a market by id.
    pub fn get(&self, id: &str) -> Option<&Market> {
        self.markets.iter().find(|m| m.id == id)
    }

    /// Look up a market by id, failing when absent.
    pub fn require(&self, id: &str) -> Result<&Market, CatalogError> {
        self.get(id).ok_or_else(|| {
            debug!(market_id = %id, "Market not in catalog");
            CatalogError::MarketNotFound(id.to_string())
        })
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.markets.iter().map(|m| m.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Serialize the catalog back to JSON.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(&self.markets)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::{MarketStatus, Outcome};
    use rust_decimal_macros::dec;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = MarketCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());

        let btc = catalog.get("btc-price-2024").unwrap();
        assert_eq!(btc.yes_price, dec!(0.65));
        assert_eq!(btc.status, MarketStatus::Active);
        assert_eq!(btc.winner, None);

        let eth = catalog.get("eth-merge-impact").unwrap();
        assert!(eth.is_resolved());
        assert_eq!(eth.winner, Some(Outcome::No));
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let catalog = MarketCatalog::embedded().unwrap();
        assert_eq!(catalog.categories(), vec!["crypto", "defi", "nft", "regulation"]);
    }

    #[test]
    fn require_reports_missing_market() {
        let catalog = MarketCatalog::embedded().unwrap();
        let err = catalog.require("nope").unwrap_err();
        assert!(matches!(err, CatalogError::MarketNotFound(id) if id == "nope"));
    }

    #[test]
    fn free_form_creator_is_displayable() {
        let mut market = crate::market::types::tests::sample_market("unicode-creator");
        market.creator = "aßßßatoshi-Nakamoto".to_string();
        let raw = serde_json::to_string(&vec![market]).unwrap();

        let catalog = MarketCatalog::from_json(&raw).unwrap();
        let creator = &catalog.require("unicode-creator").unwrap().creator;
        assert_eq!(crate::utils::short_address(creator), "aßßßat...moto");
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = MarketCatalog::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            MarketCatalog::from_json("{\"not\": \"an array\"}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn repeated_loads_are_identical() {
        let first = MarketCatalog::load(&CatalogSource::Embedded, Duration::ZERO)
            .await
            .unwrap();
        let second = MarketCatalog::load(&CatalogSource::Embedded, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        // Querying does not mutate.
        let _ = first.categories();
        let _ = first.get("btc-price-2024");
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn source_from_optional_path() {
        assert_eq!(CatalogSource::from(None), CatalogSource::Embedded);
        assert_eq!(
            CatalogSource::from(Some(PathBuf::from("m.json"))),
            CatalogSource::File(PathBuf::from("m.json"))
        );
    }
}
