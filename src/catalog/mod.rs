use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "https://dummyjson.com/products?limit=0";
pub const DEFAULT_MULTIPLIER: f64 = 15000.0;

/// A product as it arrives from the remote catalog, before price normalization.
#[derive(Clone, Debug, Deserialize)]
pub struct RawProduct {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    products: Vec<RawProduct>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub thumbnail: String,
    pub category: String,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PriceRule {
    Flat {
        multiplier: f64,
    },
    ByCategory {
        default_multiplier: f64,
        multipliers: BTreeMap<String, f64>,
    },
}

impl Default for PriceRule {
    fn default() -> Self {
        PriceRule::Flat {
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl PriceRule {
    pub fn multiplier_for(&self, category: &str) -> f64 {
        match self {
            PriceRule::Flat { multiplier } => *multiplier,
            PriceRule::ByCategory {
                default_multiplier,
                multipliers,
            } => multipliers
                .get(category)
                .copied()
                .unwrap_or(*default_multiplier),
        }
    }

    pub fn apply(&self, raw: &RawProduct) -> f64 {
        raw.price * self.multiplier_for(&raw.category)
    }
}

pub fn normalize(raw: RawProduct, rule: &PriceRule) -> Product {
    let price = rule.apply(&raw);
    Product {
        id: raw.id,
        title: raw.title,
        thumbnail: raw.thumbnail,
        category: raw.category,
        price,
    }
}

/// Distinct categories in the order they first appear in the catalog.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog endpoint returned HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode catalog body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, CatalogError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| CatalogError::HttpClientBuild { source: e })
}

pub fn decode_catalog(body: &str, rule: &PriceRule) -> Result<Vec<Product>, serde_json::Error> {
    let parsed: CatalogResponse = serde_json::from_str(body)?;
    Ok(parsed
        .products
        .into_iter()
        .map(|raw| normalize(raw, rule))
        .collect())
}

/// Fetches the catalog once. There is no retry; the caller decides how to
/// surface a failure.
pub async fn fetch_catalog(
    client: &reqwest::Client,
    url: &str,
    rule: &PriceRule,
) -> Result<Vec<Product>, CatalogError> {
    debug!(url, "fetching catalog");
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| CatalogError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(|e| CatalogError::Request {
        url: url.to_string(),
        source: e,
    })?;
    let products = decode_catalog(&body, rule).map_err(|e| CatalogError::Decode {
        url: url.to_string(),
        source: e,
    })?;
    info!(count = products.len(), "catalog loaded");
    Ok(products)
}
