use crate::utils::leading_number;

/// Storage capacity written as "1TB" is kept as 1024 GB.
pub const TERABYTE_GB: u32 = 1024;

/// Spellings of a memory size used by both catalogs: "256 gb", "256гб", "256"...
pub fn memory_synonyms(gb: u32) -> Vec<String> {
    let mut synonyms = vec![
        format!("{} gb", gb),
        format!("{}гб", gb),
        format!("{} гб", gb),
        format!("{}gb", gb),
        gb.to_string(),
    ];
    if gb == TERABYTE_GB {
        synonyms.extend(["1 tb", "1тб", "1 тб", "1tb"].map(String::from));
    }
    synonyms
}

/// Parses the store's storage column: any terabyte unit means 1 TB, otherwise the
/// leading digits are gigabytes.
pub fn parse_storage(text: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if lower.contains("tb") || lower.contains("тб") {
        return Some(TERABYTE_GB);
    }
    leading_number(&lower).filter(|&gb| gb > 0)
}

pub fn parse_ram(text: &str) -> Option<u32> {
    leading_number(text).filter(|&gb| gb > 0)
}
