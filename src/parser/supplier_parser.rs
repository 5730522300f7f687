// Free-text supplier price list -> SupplierProduct
use crate::model::{CatalogError, SupplierProduct};
use crate::normalizer::Vocabulary;
use crate::normalizer::memory::TERABYTE_GB;
use crate::parser::CatalogParser;
use crate::utils::{collapse_whitespace, normalize_text, remove_word};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

static CYRILLIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[а-яА-ЯёЁ]").expect("valid cyrillic regex"));
static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s?[₽$€]").expect("valid currency regex"));
/// "📱 SAMSUNG 📱": text fenced by decoration on both ends. Letter/number classes
/// instead of `\w` so that emoji variation selectors count as decoration.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\p{L}\p{N}]+([\p{L}\p{N}][\p{L}\p{N}_\s]*?)[^\p{L}\p{N}]+$")
        .expect("valid header regex")
});
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4,6})\s?[₽$€]?").expect("valid price regex"));
/// "8/256gb", "8+256", "8-128 гб", "8/1tb". RAM must start a word so that a
/// model number ("a54 12/256") is never read as RAM.
static MEMORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s?[/\\+\-]\s?(?:(\d{2,4})(?:\s?(?:gb|гб))?|(\d)\s?(?:tb|тб))")
        .expect("valid memory regex")
});
/// "12 512 гб": space-separated sizes, tried only when no explicit separator is present.
static SPACED_MEMORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s+(?:(\d{2,4})(?:\s?(?:gb|гб))?|(\d)\s?(?:tb|тб))\b")
        .expect("valid spaced memory regex")
});
static NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-/]").expect("valid noise regex"));

/// Brand carried from row to row: a section header (or a brand named in a product
/// line) stays active until the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrandState {
    #[default]
    NoBrandSeen,
    BrandActive(String),
}

impl BrandState {
    pub fn brand(&self) -> Option<&str> {
        match self {
            BrandState::NoBrandSeen => None,
            BrandState::BrandActive(brand) => Some(brand.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewFields,
    NoPrice,
    StrayBracket,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Header(String),
    Product(SupplierProduct),
    Skipped(SkipReason),
}

struct Memory {
    ram: u32,
    storage: u32,
}

pub struct SupplierListingParser<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> SupplierListingParser<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Processes one row and returns the state for the next one.
    pub fn parse_line(&self, state: BrandState, record: &[String]) -> (BrandState, LineOutcome) {
        let [description, supplier, ..] = record else {
            return (state, LineOutcome::Skipped(SkipReason::TooFewFields));
        };

        let text = normalize_text(description)
            .replace("pro + ", "pro+ ")
            .replace("pro+ ", "pro plus ");
        let brands = &self.vocabulary.brands;

        if let Some(header) = brand_header(&text) {
            let brand = brands.normalize(&header);
            return (BrandState::BrandActive(brand.clone()), LineOutcome::Header(brand));
        }

        let state = match brands.detect(&text) {
            Some(detected) => BrandState::BrandActive(brands.normalize(detected)),
            None => state,
        };

        let Some((residual, price)) = extract_price(&text) else {
            return (state, LineOutcome::Skipped(SkipReason::NoPrice));
        };
        if residual.contains(['[', ']']) {
            return (state, LineOutcome::Skipped(SkipReason::StrayBracket));
        }

        let (mut name, mut model, memory) = extract_memory(residual);

        let mut color = None;
        if let Some(hit) = self.vocabulary.colors.find_in(&model) {
            color = Some(hit.canonical.to_string());
            model = remove_word(&model, hit.synonym);
        }

        model = clean_model(&model);
        name = clean_model(&name);
        if let Some(brand) = state.brand() {
            model = brands.brand_model(brand, &model);
            name = brands.brand_model(brand, &name);
        } else {
            model = collapse_whitespace(&model);
            name = collapse_whitespace(&name);
        }

        let ram = memory.as_ref().map(|m| m.ram);
        let storage = memory.as_ref().map(|m| m.storage);
        let keywords = self
            .vocabulary
            .keyword_generator()
            .generate(&name, ram, storage, color.as_deref());

        let product = SupplierProduct {
            name,
            brand: state.brand().map(String::from),
            model,
            supplier_name: supplier.trim().to_string(),
            price,
            ram,
            storage,
            color,
            keywords,
        };
        (state, LineOutcome::Product(product))
    }
}

impl CatalogParser for SupplierListingParser<'_> {
    type Product = SupplierProduct;

    fn parse(&self, records: &[Vec<String>]) -> Result<Vec<SupplierProduct>, CatalogError> {
        let mut state = BrandState::default();
        let mut products = Vec::new();
        let mut headers = 0;
        let mut skipped = 0;

        for record in records {
            let (next, outcome) = self.parse_line(state, record);
            state = next;
            match outcome {
                LineOutcome::Header(brand) => {
                    debug!("Brand section: {}", brand);
                    headers += 1;
                }
                LineOutcome::Product(product) => products.push(product),
                LineOutcome::Skipped(reason) => {
                    debug!("Skipping supplier row {:?}: {:?}", record, reason);
                    skipped += 1;
                }
            }
        }

        info!(
            "Parsed {} supplier products ({} brand headers, {} skipped rows)",
            products.len(),
            headers,
            skipped
        );
        Ok(products)
    }
}

/// Inner text of a decorated section title. Lines with Cyrillic letters or prices
/// are product lines.
fn brand_header(text: &str) -> Option<String> {
    if CYRILLIC_RE.is_match(text) || CURRENCY_RE.is_match(text) || PRICE_RE.is_match(text) {
        return None;
    }
    HEADER_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|inner| !inner.is_empty())
}

/// Last 4-6 digit run is the price; the text before it is the product.
fn extract_price(text: &str) -> Option<(&str, u32)> {
    let caps = PRICE_RE.captures_iter(text).last()?;
    let digits = caps.get(1)?;
    let price = digits.as_str().parse().ok()?;
    Some((text[..digits.start()].trim(), price))
}

/// Returns the name with the memory spelled uniformly ("8/256gb"), the model with
/// the memory removed, and the parsed sizes.
fn extract_memory(text: &str) -> (String, String, Option<Memory>) {
    let Some(caps) = MEMORY_RE
        .captures(text)
        .or_else(|| SPACED_MEMORY_RE.captures(text))
    else {
        return (text.to_string(), text.to_string(), None);
    };
    let (Some(span), Some(ram)) = (caps.get(0), caps.get(1)) else {
        return (text.to_string(), text.to_string(), None);
    };
    let Ok(ram) = ram.as_str().parse::<u32>() else {
        return (text.to_string(), text.to_string(), None);
    };

    let (storage, spelled) = match (caps.get(2), caps.get(3)) {
        (Some(gb), _) => match gb.as_str().parse::<u32>() {
            Ok(gb) if gb >= TERABYTE_GB => (TERABYTE_GB, format!("{}/1tb", ram)),
            Ok(gb) => (gb, format!("{}/{}gb", ram, gb)),
            Err(_) => return (text.to_string(), text.to_string(), None),
        },
        (None, Some(_)) => (TERABYTE_GB, format!("{}/1tb", ram)),
        (None, None) => return (text.to_string(), text.to_string(), None),
    };

    let range = span.range();
    let name = format!("{} {} {}", &text[..range.start], spelled, &text[range.end..]);
    let model = format!("{} {}", &text[..range.start], &text[range.end..]);
    (
        collapse_whitespace(&name),
        collapse_whitespace(&model),
        Some(Memory { ram, storage }),
    )
}

/// Drops decoration, keeps word characters, whitespace and '/', splits on hyphens.
fn clean_model(text: &str) -> String {
    let cleaned = NOISE_RE.replace_all(text, "");
    collapse_whitespace(&cleaned.replace('-', " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::normalizer::{ColorCanonicalizer, ColorEquivalenceBuilder};

    fn vocabulary() -> Vocabulary {
        let config = AppConfig::builtin().unwrap();
        let canonicalizer = ColorCanonicalizer::new(&config.color_groups);
        let mut builder = ColorEquivalenceBuilder::new(&canonicalizer);
        builder.add_row("iPhone 13 Синий (Blue) 128GB", "синий");
        builder.add_row("Galaxy A54 Черный (Black)", "черный");
        builder.add_row("Galaxy A54 Графитовый (Stormy Black)", "");
        Vocabulary::new(Vocabulary::brands_from_config(&config), builder.build())
    }

    fn row(description: &str, supplier: &str) -> Vec<String> {
        vec![description.to_string(), supplier.to_string()]
    }

    fn product(outcome: LineOutcome) -> SupplierProduct {
        match outcome {
            LineOutcome::Product(product) => product,
            other => panic!("expected a product, got {:?}", other),
        }
    }

    #[test]
    fn parses_a_complete_line() {
        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let (state, outcome) =
            parser.parse_line(BrandState::NoBrandSeen, &row("iphone 13 blue 4/128 12990", "VendorX"));
        let item = product(outcome);

        assert_eq!(state, BrandState::BrandActive("apple".into()));
        assert_eq!(item.brand.as_deref(), Some("apple"));
        assert_eq!(item.model, "apple iphone 13");
        assert_eq!(item.name, "apple iphone 13 blue 4/128gb");
        assert_eq!(item.supplier_name, "VendorX");
        assert_eq!(item.price, 12990);
        assert_eq!(item.ram, Some(4));
        assert_eq!(item.storage, Some(128));
        assert_eq!(item.color.as_deref(), Some("синий"));
        assert!(item.keywords.contains("128gb"));
    }

    #[test]
    fn header_line_sets_brand_for_following_lines() {
        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let records = vec![
            row("📱SAMSUNG📱", ""),
            row("A54 8/256 black 27990", "Opt"),
            row("S24 Ultra 12/512 99990₽", "Opt"),
            row("⭐️ Xiaomi ⭐️", ""),
            row("Note 13 Pro 8/256 21990", "Opt"),
        ];
        let products = parser.parse(&records).unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].brand.as_deref(), Some("samsung"));
        assert_eq!(products[0].model, "samsung a54");
        assert_eq!(products[0].color.as_deref(), Some("черный"));
        assert_eq!(products[1].model, "samsung s24 ultra");
        assert_eq!(products[1].price, 99990);
        assert_eq!(products[2].brand.as_deref(), Some("xiaomi"));
        assert_eq!(products[2].model, "xiaomi redmi note 13 pro");
    }

    #[test]
    fn brand_in_text_overrides_active_header() {
        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let state = BrandState::BrandActive("samsung".into());
        let (state, outcome) = parser.parse_line(state, &row("google pixel 8 8/128 45990", "V"));
        assert_eq!(state, BrandState::BrandActive("google".into()));
        assert_eq!(product(outcome).model, "google pixel 8");
    }

    #[test]
    fn header_detection_rules() {
        assert_eq!(brand_header("📱samsung📱").as_deref(), Some("samsung"));
        assert_eq!(brand_header("--- apple ---").as_deref(), Some("apple"));
        assert_eq!(brand_header("🔥 скидки 🔥"), None);
        assert_eq!(brand_header("🔥 iphone 13 12990 🔥"), None);
        assert_eq!(brand_header("💰 500$ 💰"), None);
        assert_eq!(brand_header("iphone 13"), None);
    }

    #[test]
    fn rows_without_price_or_with_brackets_are_dropped() {
        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let (_, short) = parser.parse_line(BrandState::NoBrandSeen, &["iphone 13 12990".to_string()]);
        assert_eq!(short, LineOutcome::Skipped(SkipReason::TooFewFields));

        let (_, no_price) = parser.parse_line(BrandState::NoBrandSeen, &row("iphone 13 скоро", "V"));
        assert_eq!(no_price, LineOutcome::Skipped(SkipReason::NoPrice));

        let (_, promo) =
            parser.parse_line(BrandState::NoBrandSeen, &row("[акция] iphone 13 12990", "V"));
        assert_eq!(promo, LineOutcome::Skipped(SkipReason::StrayBracket));
    }

    #[test]
    fn longest_color_wins() {
        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let (_, outcome) = parser.parse_line(
            BrandState::NoBrandSeen,
            &row("samsung galaxy a54 8/256 stormy black 27990", "V"),
        );
        let item = product(outcome);
        assert_eq!(item.color.as_deref(), Some("серый"));
        assert_eq!(item.model, "samsung galaxy a54");
    }

    #[test]
    fn price_is_the_last_digit_run() {
        assert_eq!(extract_price("iphone 15 pro 8/1024 129990 ₽"), Some(("iphone 15 pro 8/1024", 129990)));
        assert_eq!(extract_price("model 2024 edition 15990"), Some(("model 2024 edition", 15990)));
        assert_eq!(extract_price("iphone 13"), None);
    }

    #[test]
    fn memory_forms() {
        let (name, model, memory) = extract_memory("galaxy s24 8+256gb");
        let memory = memory.unwrap();
        assert_eq!((memory.ram, memory.storage), (8, 256));
        assert_eq!(name, "galaxy s24 8/256gb");
        assert_eq!(model, "galaxy s24");

        let (name, _, memory) = extract_memory("iphone 15 pro 8/1tb");
        assert_eq!(memory.unwrap().storage, 1024);
        assert_eq!(name, "iphone 15 pro 8/1tb");

        let (_, _, memory) = extract_memory("redmi 12 4-128 гб");
        assert_eq!(memory.unwrap().storage, 128);

        let (_, model, memory) = extract_memory("poco x6 12 512 гб");
        let memory = memory.unwrap();
        assert_eq!((memory.ram, memory.storage), (12, 512));
        assert_eq!(model, "poco x6");

        let (name, model, memory) = extract_memory("pixel 8 pro");
        assert!(memory.is_none());
        assert_eq!(name, model);
    }

    #[test]
    fn pro_plus_spelling_is_unified() {
        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let state = BrandState::BrandActive("xiaomi".into());
        let (_, outcome) = parser.parse_line(state, &row("redmi note 13 pro+ 12/512 31990", "V"));
        assert_eq!(product(outcome).model, "xiaomi redmi note 13 pro plus");
    }

    #[test]
    fn model_number_is_not_read_as_ram() {
        for (text, expected_model) in [
            ("galaxy a54 12/256", "galaxy a54"),
            ("redmi note 13 12/256", "redmi note 13"),
        ] {
            let (name, model, memory) = extract_memory(text);
            let memory = memory.unwrap();
            assert_eq!((memory.ram, memory.storage), (12, 256), "{text}");
            assert_eq!(model, expected_model);
            assert_eq!(name, format!("{} 12/256gb", expected_model));
        }

        let vocabulary = vocabulary();
        let parser = SupplierListingParser::new(&vocabulary);
        let state = BrandState::BrandActive("xiaomi".into());
        let (_, outcome) = parser.parse_line(state, &row("redmi note 13 12/256 21990", "V"));
        let item = product(outcome);
        assert_eq!(item.model, "xiaomi redmi note 13");
        assert_eq!((item.ram, item.storage), (Some(12), Some(256)));
    }
}
