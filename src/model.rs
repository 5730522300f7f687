// Core structs: StoreProduct, SupplierProduct, MatchedProduct
use std::collections::BTreeSet;
use thiserror::Error;

pub type Keywords = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreProduct {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub code: String,
    pub ram: Option<u32>,
    pub storage: Option<u32>,
    pub color: Option<String>,
    pub keywords: Keywords,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierProduct {
    pub name: String,
    pub brand: Option<String>,
    pub model: String,
    pub supplier_name: String,
    pub price: u32,
    pub ram: Option<u32>,
    pub storage: Option<u32>,
    pub color: Option<String>,
    pub keywords: Keywords,
}

#[derive(Debug, Clone)]
pub struct MatchedProduct {
    pub supplier_product: SupplierProduct,
    pub store_product: StoreProduct,
    pub match_score: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("required column '{0}' is missing from the store header")]
    MissingColumn(String),
    #[error("store catalog is empty")]
    EmptyCatalog,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("cannot flush report {path}: {source}")]
    Flush {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
