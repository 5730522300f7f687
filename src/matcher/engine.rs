use crate::config::ScoringConfig;
use crate::matcher::similarity::{BrandCleanCache, model_similarity};
use crate::model::{MatchedProduct, StoreProduct, SupplierProduct};
use crate::normalizer::BrandAliasTable;
use crate::utils::collapse_whitespace;
use tracing::{debug, info};

/// Storage sizes guessed from a supplier model that carries no memory size
/// ("pixel 8 128"), largest first.
pub const STORAGE_CANDIDATES: [u32; 5] = [1024, 512, 256, 128, 64];

/// Pairs supplier items with store items.
pub trait Matcher {
    fn match_products(
        &mut self,
        suppliers: &[SupplierProduct],
        store: &[StoreProduct],
    ) -> Vec<MatchedProduct>;
}

/// Fills a missing storage size from digits embedded in the model and drops those
/// digits from the model.
pub fn infer_missing_storage(mut supplier: SupplierProduct) -> SupplierProduct {
    if supplier.storage.is_some() {
        return supplier;
    }
    let found = STORAGE_CANDIDATES
        .iter()
        .map(|gb| (*gb, gb.to_string()))
        .find(|(_, digits)| supplier.model.contains(digits.as_str()));
    if let Some((gb, digits)) = found {
        supplier.storage = Some(gb);
        supplier.model = collapse_whitespace(&supplier.model.replace(&digits, ""));
    }
    supplier
}

/// Additive multi-factor scorer. Owns the brand-clean cache it is given.
pub struct MatchingEngine<'a> {
    brands: &'a BrandAliasTable,
    weights: ScoringConfig,
    cache: BrandCleanCache,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(brands: &'a BrandAliasTable, weights: ScoringConfig, cache: BrandCleanCache) -> Self {
        Self {
            brands,
            weights,
            cache,
        }
    }

    pub fn score(&mut self, supplier: &SupplierProduct, store: &StoreProduct) -> f64 {
        let w = &self.weights;
        let shared = supplier.keywords.intersection(&store.keywords).count();
        let mut score = shared as f64 * w.keyword_weight;

        if supplier.model == store.model {
            score += w.model_exact_bonus;
        }

        if supplier.brand.as_deref() == Some(store.brand.as_str()) {
            score += w.brand_match_bonus;
            let similarity = model_similarity(&mut self.cache, self.brands, &supplier.model, &store.model);
            if similarity > w.similarity_threshold {
                score += similarity / w.similarity_divisor;
            } else {
                score -= w.similarity_miss_penalty;
            }
        } else {
            score -= w.brand_mismatch_penalty;
        }

        if supplier.ram.is_some() && supplier.ram == store.ram {
            score += w.ram_match_bonus;
        }
        if supplier.storage.is_some() && supplier.storage == store.storage {
            score += w.storage_match_bonus;
        }
        if supplier.color.is_some() && supplier.color == store.color {
            score += w.color_match_bonus;
        }
        score
    }

    /// Highest positive-scoring store item; the first one wins a tie.
    pub fn best_match<'s>(
        &mut self,
        supplier: &SupplierProduct,
        store: &'s [StoreProduct],
    ) -> Option<(&'s StoreProduct, f64)> {
        let mut best = None;
        let mut best_score = 0.0;
        for candidate in store {
            let score = self.score(supplier, candidate);
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
        }
        best.map(|candidate| (candidate, best_score))
    }
}

impl Matcher for MatchingEngine<'_> {
    fn match_products(
        &mut self,
        suppliers: &[SupplierProduct],
        store: &[StoreProduct],
    ) -> Vec<MatchedProduct> {
        let mut matched = Vec::new();
        for supplier in suppliers.iter().cloned().map(infer_missing_storage) {
            match self.best_match(&supplier, store) {
                Some((store_product, match_score)) => {
                    debug!(
                        "{} -> {} ({:.2})",
                        supplier.model, store_product.code, match_score
                    );
                    matched.push(MatchedProduct {
                        supplier_product: supplier,
                        store_product: store_product.clone(),
                        match_score,
                    });
                }
                None => debug!("No match for supplier item '{}'", supplier.name),
            }
        }
        info!(
            "Matched {} of {} supplier items against {} store products ({} cleaned models cached)",
            matched.len(),
            suppliers.len(),
            store.len(),
            self.cache.len()
        );
        matched
    }
}
