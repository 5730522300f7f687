// Normalizer module: canonical brand, color and memory vocabularies and keyword sets.

pub mod brand;
pub mod color;
pub mod keywords;
pub mod memory;

pub use brand::BrandAliasTable;
pub use color::{ColorCanonicalizer, ColorEquivalenceBuilder, ColorEquivalenceMap};
pub use keywords::KeywordGenerator;

use crate::config::AppConfig;

/// Everything both parsers need to canonicalize a product.
pub struct Vocabulary {
    pub brands: BrandAliasTable,
    pub colors: ColorEquivalenceMap,
}

impl Vocabulary {
    pub fn new(brands: BrandAliasTable, colors: ColorEquivalenceMap) -> Self {
        Self { brands, colors }
    }

    pub fn brands_from_config(config: &AppConfig) -> BrandAliasTable {
        BrandAliasTable::new(&config.brands, &config.sub_brand_rules)
    }

    pub fn keyword_generator(&self) -> KeywordGenerator<'_> {
        KeywordGenerator::new(&self.brands, &self.colors)
    }
}
