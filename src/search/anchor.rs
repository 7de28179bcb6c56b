//! URL-fragment anchors derived from section headers.

use crate::search::extract::strip_tags;

/// Turn a section title into a fragment identifier.
///
/// Keeps Latin and Cyrillic letters and digits, joins words with `-`, and
/// transliterates Cyrillic into Latin so the anchor is plain ASCII.
///
/// # Example
///
/// ```
/// use pagesearch::search::anchor::anchor;
///
/// assert_eq!(anchor("Getting Started"), "getting-started");
/// ```
#[must_use]
pub fn anchor(section: &str) -> String {
    let text = strip_tags(section).replace("&nbsp;", " ");

    let kept: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || is_cyrillic(c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    kept.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .map(transliterate)
        .collect()
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'А'..='я' | 'Ё' | 'ё')
}

fn transliterate(c: char) -> String {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' | 'ы' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        other => return other.to_string(),
    };
    latin.to_string()
}
