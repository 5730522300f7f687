// Text helpers shared by the normalizer, parsers and matcher

/// Folds letter variants that vendors use interchangeably (`ё` and `е`).
pub fn fold_letters(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ё' => 'е',
            'Ё' => 'Е',
            other => other,
        })
        .collect()
}

/// Lowercases, folds letter variants and trims.
pub fn normalize_text(text: &str) -> String {
    fold_letters(&text.trim().to_lowercase())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading run of ASCII digits, e.g. `"256 ГБ"` -> 256.
pub fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Byte offset of the first occurrence of `needle` in `haystack` that is not glued
/// to a letter or digit on either side.
pub fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.match_indices(needle).map(|(idx, _)| idx).find(|&idx| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub fn contains_word(haystack: &str, needle: &str) -> bool {
    find_word(haystack, needle).is_some()
}

/// Removes every whole-word occurrence of `needle`.
pub fn remove_word(haystack: &str, needle: &str) -> String {
    let mut result = haystack.to_string();
    while let Some(idx) = find_word(&result, needle) {
        result.replace_range(idx..idx + needle.len(), " ");
    }
    result
}
