// Structured store catalog -> StoreProduct
use crate::config::StoreColumns;
use crate::model::{CatalogError, StoreProduct};
use crate::normalizer::memory::{parse_ram, parse_storage};
use crate::normalizer::{ColorCanonicalizer, ColorEquivalenceBuilder, ColorEquivalenceMap, Vocabulary};
use crate::parser::CatalogParser;
use crate::utils::normalize_text;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// One store row with the required columns picked out by header label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRow {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub ram: String,
    pub storage: String,
    pub color: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct StoreTable {
    pub rows: Vec<StoreRow>,
}

impl StoreTable {
    /// The first record is the header; every required label must be present.
    pub fn from_records(
        records: &[Vec<String>],
        columns: &StoreColumns,
    ) -> Result<Self, CatalogError> {
        let (header, body) = records.split_first().ok_or(CatalogError::EmptyCatalog)?;

        let index_of = |label: &str| {
            header
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}') == label)
                .ok_or_else(|| CatalogError::MissingColumn(label.to_string()))
        };
        let name = index_of(&columns.name)?;
        let brand = index_of(&columns.brand)?;
        let model = index_of(&columns.model)?;
        let ram = index_of(&columns.ram)?;
        let storage = index_of(&columns.storage)?;
        let color = index_of(&columns.color)?;
        let code = index_of(&columns.code)?;

        let cell = |record: &[String], idx: usize| record.get(idx).cloned().unwrap_or_default();
        let rows = body
            .iter()
            .map(|record| StoreRow {
                name: cell(record, name),
                brand: cell(record, brand),
                model: cell(record, model),
                ram: cell(record, ram),
                storage: cell(record, storage),
                color: cell(record, color),
                code: cell(record, code),
            })
            .collect();

        Ok(Self { rows })
    }
}

/// Derives the store's color vocabulary from the name and color columns.
pub fn build_color_map(table: &StoreTable, canonicalizer: &ColorCanonicalizer) -> ColorEquivalenceMap {
    let mut builder = ColorEquivalenceBuilder::new(canonicalizer);
    for row in &table.rows {
        builder.add_row(&row.name, &row.color);
    }
    let colors = builder.build();
    if colors.is_empty() {
        warn!("Store catalog names no colors, color bonuses will never apply");
    } else {
        info!("Built {} color groups from the store catalog", colors.len());
    }
    colors
}

pub struct StoreCatalogNormalizer<'a> {
    vocabulary: &'a Vocabulary,
    columns: &'a StoreColumns,
}

impl<'a> StoreCatalogNormalizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary, columns: &'a StoreColumns) -> Self {
        Self { vocabulary, columns }
    }

    pub fn normalize(&self, table: &StoreTable) -> Vec<StoreProduct> {
        let mut seen_codes = HashSet::new();
        let mut products = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let Some(product) = self.product_from_row(row) else {
                continue;
            };
            if !seen_codes.insert(product.code.clone()) {
                warn!("Duplicate store code {}, keeping the first row", product.code);
                continue;
            }
            products.push(product);
        }
        products
    }

    pub fn product_from_row(&self, row: &StoreRow) -> Option<StoreProduct> {
        let name = normalize_text(&row.name);
        let code = row.code.trim().to_string();
        if name.is_empty() || code.is_empty() {
            debug!("Skipping store row without name or code: {:?}", row);
            return None;
        }

        let brands = &self.vocabulary.brands;
        let brand = if row.brand.trim().is_empty() {
            brands.detect(&name).map(|b| brands.normalize(b)).unwrap_or_default()
        } else {
            brands.normalize(&row.brand)
        };
        let model_text = normalize_text(&row.model);
        let model = brands.brand_model(&brand, if model_text.is_empty() { &name } else { &model_text });

        let ram = parse_ram(&row.ram);
        let storage = parse_storage(&row.storage);

        // a color spelled in the title beats a stale color column
        let colors = &self.vocabulary.colors;
        let color = colors
            .find_in(&name)
            .map(|hit| hit.canonical.to_string())
            .or_else(|| colors.canonical_of(&row.color).map(String::from));

        let keywords = self
            .vocabulary
            .keyword_generator()
            .generate(&name, ram, storage, color.as_deref());

        Some(StoreProduct {
            name,
            brand,
            model,
            code,
            ram,
            storage,
            color,
            keywords,
        })
    }
}

impl CatalogParser for StoreCatalogNormalizer<'_> {
    type Product = StoreProduct;

    fn parse(&self, records: &[Vec<String>]) -> Result<Vec<StoreProduct>, CatalogError> {
        let table = StoreTable::from_records(records, self.columns)?;
        let products = self.normalize(&table);
        info!("Loaded {} store products from {} rows", products.len(), table.rows.len());
        Ok(products)
    }
}
