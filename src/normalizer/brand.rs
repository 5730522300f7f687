use crate::config::{BrandConfig, SubBrandRule};
use crate::utils::{collapse_whitespace, contains_word};
use std::collections::HashSet;

/// Aliases shorter than this are generic model-line letters ("a", "s", "pro") and
/// only expand keywords when the canonical brand itself is in the text.
const MIN_EXPANDING_ALIAS_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct BrandEntry {
    pub name: String,
    pub aliases: Vec<String>,
}

/// Canonical brand -> alias tokens, in configuration order.
#[derive(Debug, Clone)]
pub struct BrandAliasTable {
    entries: Vec<BrandEntry>,
    canonical_tokens: HashSet<String>,
    sub_brand_rules: Vec<SubBrandRule>,
}

impl BrandAliasTable {
    pub fn new(brands: &[BrandConfig], sub_brand_rules: &[SubBrandRule]) -> Self {
        let entries: Vec<BrandEntry> = brands
            .iter()
            .map(|b| BrandEntry {
                name: b.name.trim().to_lowercase(),
                aliases: b.aliases.iter().map(|a| a.trim().to_lowercase()).collect(),
            })
            .collect();
        let canonical_tokens = entries.iter().map(|e| e.name.clone()).collect();
        Self {
            entries,
            canonical_tokens,
            sub_brand_rules: sub_brand_rules.to_vec(),
        }
    }

    /// Maps a brand spelling to its canonical key. Alias membership wins over an
    /// exact key so that product lines listed as brands ("iphone") fold into the
    /// manufacturer ("apple"). Unknown spellings pass through lowercased.
    pub fn normalize(&self, brand: &str) -> String {
        let brand = collapse_whitespace(&brand.to_lowercase());
        self.entries
            .iter()
            .find(|e| e.aliases.iter().any(|a| *a == brand))
            .map(|e| e.name.clone())
            .unwrap_or(brand)
    }

    /// First canonical brand token contained in `text`.
    pub fn detect(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| text.contains(e.name.as_str()))
            .map(|e| e.name.as_str())
    }

    /// Aliases of every brand mentioned in `text`, either by canonical token or by
    /// a distinctive alias word.
    pub fn expansions<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| {
                text.contains(e.name.as_str())
                    || e.aliases.iter().any(|a| {
                        a.chars().count() >= MIN_EXPANDING_ALIAS_LEN && contains_word(text, a)
                    })
            })
            .flat_map(|e| e.aliases.iter().map(String::as_str))
    }

    /// Drops canonical brand tokens from `text`.
    pub fn strip_brand_tokens(&self, text: &str) -> String {
        text.to_lowercase()
            .split_whitespace()
            .filter(|word| !self.canonical_tokens.contains(*word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Produces the uniform "brand model" string: prefixes the brand when the model
    /// lacks it and applies the sub-brand co-occurrence rules.
    pub fn brand_model(&self, brand: &str, model: &str) -> String {
        let mut model = collapse_whitespace(model);
        if !brand.is_empty() && !model.contains(brand) {
            model = format!("{} {}", brand, model);
        }
        self.apply_sub_brand_rules(brand, &model)
    }

    /// For a value sub-line brand, a model mentioning the line token without the
    /// sibling token gets the sibling injected right after the brand.
    pub fn apply_sub_brand_rules(&self, brand: &str, text: &str) -> String {
        let mut text = text.to_string();
        for rule in self.sub_brand_rules.iter().filter(|r| r.brand == brand) {
            if text.contains(rule.trigger.as_str()) && !text.contains(rule.inject.as_str()) {
                text = text.replacen(
                    rule.brand.as_str(),
                    &format!("{} {}", rule.brand, rule.inject),
                    1,
                );
            }
        }
        collapse_whitespace(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn table() -> BrandAliasTable {
        let config = AppConfig::builtin().unwrap();
        BrandAliasTable::new(&config.brands, &config.sub_brand_rules)
    }

    #[test]
    fn normalize_prefers_alias_membership() {
        let brands = table();
        assert_eq!(brands.normalize("Apple"), "apple");
        assert_eq!(brands.normalize("iPhone"), "apple");
        assert_eq!(brands.normalize("Redmi"), "xiaomi");
        assert_eq!(brands.normalize("SAMSUNG"), "samsung");
        assert_eq!(brands.normalize("Fairphone"), "fairphone");
    }

    #[test]
    fn detect_follows_table_order() {
        let brands = table();
        assert_eq!(brands.detect("iphone 13 blue"), Some("iphone"));
        assert_eq!(brands.detect("samsung galaxy a54"), Some("samsung"));
        assert_eq!(brands.detect("note 12 pro"), None);
    }

    #[test]
    fn brand_model_prefixes_once() {
        let brands = table();
        assert_eq!(brands.brand_model("apple", "iphone 13"), "apple iphone 13");
        assert_eq!(brands.brand_model("samsung", "samsung  galaxy s24"), "samsung galaxy s24");
        assert_eq!(brands.brand_model("", "pixel 8"), "pixel 8");
    }

    #[test]
    fn value_sub_line_gets_sibling_token() {
        let brands = table();
        assert_eq!(brands.brand_model("xiaomi", "note 13 pro"), "xiaomi redmi note 13 pro");
        assert_eq!(brands.brand_model("xiaomi", "redmi note 13"), "xiaomi redmi note 13");
        assert_eq!(brands.brand_model("xiaomi", "14 ultra"), "xiaomi 14 ultra");
    }

    #[test]
    fn expansions_ignore_short_aliases_without_brand() {
        let brands = table();
        let from_alias: Vec<&str> = brands.expansions("galaxy a54").collect();
        assert!(from_alias.contains(&"самсунг"));

        let generic: Vec<&str> = brands.expansions("note pro").collect();
        assert!(generic.contains(&"инфиникс"));
        assert!(!generic.contains(&"айфон"));
    }

    #[test]
    fn strip_brand_tokens_keeps_model_words() {
        let brands = table();
        assert_eq!(brands.strip_brand_tokens("Apple iPhone 13 Pro"), "13 pro");
        assert_eq!(brands.strip_brand_tokens("samsung galaxy a54"), "galaxy a54");
    }
}
