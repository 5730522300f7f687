use crate::model::Keywords;
use crate::normalizer::brand::BrandAliasTable;
use crate::normalizer::color::ColorEquivalenceMap;
use crate::normalizer::memory::memory_synonyms;
use crate::utils::normalize_text;

const BRACKETS: &[char] = &['(', ')', '[', ']', '{', '}'];

/// Builds the comparable keyword set shared by store and supplier products.
pub struct KeywordGenerator<'a> {
    brands: &'a BrandAliasTable,
    colors: &'a ColorEquivalenceMap,
}

impl<'a> KeywordGenerator<'a> {
    pub fn new(brands: &'a BrandAliasTable, colors: &'a ColorEquivalenceMap) -> Self {
        Self { brands, colors }
    }

    pub fn generate(
        &self,
        name: &str,
        ram: Option<u32>,
        storage: Option<u32>,
        color: Option<&str>,
    ) -> Keywords {
        let name = normalize_text(name);
        let mut raw: Vec<String> = Vec::new();

        raw.push(name.clone());
        raw.push(name.split_whitespace().collect());
        raw.push(name.replace('-', ""));
        raw.extend(name.split_whitespace().map(String::from));
        raw.extend(self.brands.expansions(&name).map(String::from));

        for gb in ram.into_iter().chain(storage) {
            raw.extend(memory_synonyms(gb));
        }

        if let Some(color) = color {
            match self.colors.synonyms(color) {
                Some(synonyms) => raw.extend(synonyms.iter().cloned()),
                None => raw.push(normalize_text(color)),
            }
            raw.extend(self.colors.ascii_synonyms_in(&name).map(String::from));
        }

        let mut keywords: Keywords = raw
            .into_iter()
            .map(|keyword| keyword.replace(BRACKETS, ""))
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        // the full name is kept verbatim, brackets included
        if !name.is_empty() {
            keywords.insert(name);
        }
        keywords
    }
}
