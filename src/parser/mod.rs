// Catalog parsers: structured store export and free-text supplier lists.

pub mod store_parser;
pub mod supplier_parser;

pub use store_parser::{StoreCatalogNormalizer, StoreTable, build_color_map};
pub use supplier_parser::SupplierListingParser;

use crate::model::CatalogError;

/// Turns raw CSV records into products.
pub trait CatalogParser {
    type Product;

    fn parse(&self, records: &[Vec<String>]) -> Result<Vec<Self::Product>, CatalogError>;
}
