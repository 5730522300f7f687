use crate::config::ColorGroupConfig;
use crate::utils::{find_word, fold_letters, normalize_text};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

/// "синий (blue)" inside a store title: native color followed by its translation.
static NAME_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([а-яё]+)\s*\(([a-z][a-z \-]+[a-z])\)").expect("valid name color regex")
});

/// Fixed variant -> canonical table ("титановый", "graphite" -> "серый").
#[derive(Debug, Clone, Default)]
pub struct ColorCanonicalizer {
    canonical_by_variant: HashMap<String, String>,
    variants: HashMap<String, Vec<String>>,
}

impl ColorCanonicalizer {
    pub fn new(groups: &[ColorGroupConfig]) -> Self {
        let mut canonicalizer = Self::default();
        for group in groups {
            let canonical = normalize_text(&group.canonical);
            canonicalizer
                .canonical_by_variant
                .insert(canonical.clone(), canonical.clone());
            for variant in &group.variants {
                let variant = normalize_text(variant);
                canonicalizer
                    .canonical_by_variant
                    .entry(variant.clone())
                    .or_insert_with(|| canonical.clone());
                canonicalizer
                    .variants
                    .entry(canonical.clone())
                    .or_default()
                    .push(variant);
            }
        }
        canonicalizer
    }

    pub fn canonicalize(&self, color: &str) -> String {
        let folded = normalize_text(color);
        self.canonical_by_variant
            .get(&folded)
            .cloned()
            .unwrap_or(folded)
    }

    pub fn variants_of(&self, canonical: &str) -> &[String] {
        self.variants.get(canonical).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A color synonym located in a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorHit<'a> {
    pub synonym: &'a str,
    pub canonical: &'a str,
}

/// Canonical store color -> every surface form seen for it.
#[derive(Debug, Clone, Default)]
pub struct ColorEquivalenceMap {
    groups: BTreeMap<String, BTreeSet<String>>,
    // (synonym, canonical), longest synonym first
    lookup: Vec<(String, String)>,
}

impl ColorEquivalenceMap {
    pub fn from_groups(groups: BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut lookup: Vec<(String, String)> = Vec::new();
        let mut seen = BTreeSet::new();
        for (canonical, synonyms) in &groups {
            for synonym in synonyms {
                if seen.insert(synonym.clone()) {
                    lookup.push((synonym.clone(), canonical.clone()));
                }
            }
        }
        lookup.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });
        Self { groups, lookup }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn synonyms(&self, canonical: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(canonical)
    }

    /// Canonical group a surface form belongs to. Canonical keys map to themselves.
    pub fn canonical_of(&self, synonym: &str) -> Option<&str> {
        let synonym = normalize_text(synonym);
        if let Some((key, _)) = self.groups.get_key_value(&synonym) {
            return Some(key.as_str());
        }
        self.lookup
            .iter()
            .find(|(s, _)| *s == synonym)
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Longest synonym occurring as a whole word in `text`. Longest-first keeps a
    /// bare hue from matching inside a compound name ("black" in "stormy black").
    pub fn find_in(&self, text: &str) -> Option<ColorHit<'_>> {
        self.lookup.iter().find_map(|(synonym, canonical)| {
            find_word(text, synonym).map(|_| ColorHit {
                synonym: synonym.as_str(),
                canonical: canonical.as_str(),
            })
        })
    }

    /// ASCII synonyms of any group that occur as words in `text`.
    pub fn ascii_synonyms_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.lookup
            .iter()
            .map(|(synonym, _)| synonym.as_str())
            .filter(move |synonym| synonym.is_ascii() && find_word(text, synonym).is_some())
    }
}

/// Folds store rows into a [`ColorEquivalenceMap`].
pub struct ColorEquivalenceBuilder<'a> {
    canonicalizer: &'a ColorCanonicalizer,
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl<'a> ColorEquivalenceBuilder<'a> {
    pub fn new(canonicalizer: &'a ColorCanonicalizer) -> Self {
        Self {
            canonicalizer,
            groups: BTreeMap::new(),
        }
    }

    /// Takes a store row's name and color column. A "native (foreign)" pair in the
    /// name wins as the primary color; otherwise the column is used.
    pub fn add_row(&mut self, name: &str, color_column: &str) {
        let name = normalize_text(name);
        let column = color_column.trim().to_lowercase();

        match NAME_COLOR_RE.captures(&name) {
            Some(caps) => {
                let native = caps[1].to_string();
                let foreign = caps[2].trim().to_string();
                let canonical = self.insert(&native);
                self.group(&canonical).insert(foreign);
                if !column.is_empty() && fold_letters(&column) != native {
                    self.insert(&column);
                }
            }
            None if !column.is_empty() => {
                self.insert(&column);
            }
            None => {}
        }
    }

    pub fn build(self) -> ColorEquivalenceMap {
        ColorEquivalenceMap::from_groups(self.groups)
    }

    fn insert(&mut self, surface: &str) -> String {
        let canonical = self.canonicalizer.canonicalize(surface);
        let group = self.group(&canonical);
        group.insert(surface.to_string());
        group.insert(fold_letters(surface));
        canonical
    }

    fn group(&mut self, canonical: &str) -> &mut BTreeSet<String> {
        let canonicalizer = self.canonicalizer;
        self.groups
            .entry(canonical.to_string())
            .or_insert_with(|| {
                let mut group = BTreeSet::new();
                group.insert(canonical.to_string());
                group.extend(canonicalizer.variants_of(canonical).iter().cloned());
                group
            })
    }
}
