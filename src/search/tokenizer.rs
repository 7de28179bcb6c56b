//! Text normalization into index terms.

/// Punctuation removed outright, so "e.g." becomes "eg" rather than two words.
const STRIPPED_PUNCTUATION: [char; 4] = ['.', ',', ';', ':'];

/// Terms shorter than this many characters are dropped.
pub const MIN_TERM_LENGTH: usize = 3;

/// Split text into lowercase Latin/Cyrillic/digit terms.
///
/// Terms keep their order of appearance and are not deduplicated: a word
/// repeated in a block contributes its block weight once per occurrence.
///
/// # Example
///
/// ```
/// use pagesearch::search::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Install the CLI, then run it."), vec!["install", "the", "cli", "then", "run"]);
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .map(|c| if is_term_char(c) { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TERM_LENGTH)
        .map(String::from)
        .collect()
}

/// Tokenize and drop repeated terms, keeping first occurrences in order.
#[must_use]
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut terms = tokenize(text);
    let mut seen = std::collections::HashSet::new();
    terms.retain(|term| seen.insert(term.clone()));
    terms
}

/// Latin and Cyrillic lowercase letters and digits. `ё` sits outside the
/// `а..я` range and is kept on purpose so words like "ёлка" stay whole.
fn is_term_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'а'..='я' | 'ё' | '0'..='9')
}
