use crate::normalizer::BrandAliasTable;
use std::collections::HashMap;
use rapidfuzz::fuzz;

pub const MAX_SIMILARITY: f64 = 100.0;

/// Model strings with brand tokens removed, keyed by the raw text. Grows for the
/// lifetime of the engine that owns it.
#[derive(Debug, Default)]
pub struct BrandCleanCache {
    cleaned: HashMap<String, String>,
}

impl BrandCleanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cleaned.len()
    }

    pub fn clean(&mut self, brands: &BrandAliasTable, text: &str) -> String {
        if let Some(cleaned) = self.cleaned.get(text) {
            return cleaned.clone();
        }
        let cleaned = brands.strip_brand_tokens(text);
        self.cleaned.insert(text.to_string(), cleaned.clone());
        cleaned
    }
}

/// Case-insensitive similarity of two model strings without their brand tokens,
/// on a 0..=100 scale. InDel ratio: `2 * lcs / (len_a + len_b)`, so an extra
/// suffix ("fe", "max") costs less than a substituted character.
pub fn model_similarity(
    cache: &mut BrandCleanCache,
    brands: &BrandAliasTable,
    left: &str,
    right: &str,
) -> f64 {
    let left = cache.clean(brands, left);
    let right = cache.clean(brands, right);
    if left == right {
        return MAX_SIMILARITY;
    }
    fuzz::ratio(left.chars(), right.chars()) * MAX_SIMILARITY
}
