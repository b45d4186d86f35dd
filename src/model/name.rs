//! Player and course name normalization

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for a name: diacritics removed, lowercased, apostrophes
/// dropped, every other run of non-alphanumeric characters collapsed to a
/// single `-`.
///
/// "Šutko", "sutko" and "ŠUTKO" all map to `sutko`;
/// "Jan  Nováček" maps to `jan-novacek`; "O'Brien" maps to `obrien`.
pub fn name_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        if is_apostrophe(c) {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_dash && !key.is_empty() {
                key.push('-');
            }
            pending_dash = false;
            key.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    key
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '`' | '\u{2018}' | '\u{2019}' | '\u{02BC}')
}

/// Key or None when the name has no alphanumeric content
pub fn optional_name_key(name: &str) -> Option<String> {
    let key = name_key(name);
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Split a side's "Name & Name" cell into trimmed, non-empty names
pub fn split_pair(s: &str) -> Vec<String> {
    s.split('&')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}

/// Key of the last word of a full name ("Martin Šutko" -> `sutko`)
pub fn surname_key(full_name: &str) -> Option<String> {
    full_name
        .split_whitespace()
        .last()
        .and_then(optional_name_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_folds_diacritics_and_case() {
        assert_eq!(name_key("Šutko"), "sutko");
        assert_eq!(name_key("sutko"), "sutko");
        assert_eq!(name_key("ŠUTKO"), "sutko");
        assert_eq!(name_key("Řehoř Žďárský"), "rehor-zdarsky");
    }

    #[test]
    fn test_name_key_collapses_separators() {
        assert_eq!(name_key("  Jan   Nováček "), "jan-novacek");
        assert_eq!(name_key("O'Brien-Smith"), "obrien-smith");
        assert_eq!(name_key("--"), "");
        assert_eq!(optional_name_key(" . "), None);
    }

    #[test]
    fn test_name_key_drops_apostrophes() {
        assert_eq!(name_key("O'Brien"), "obrien");
        assert_eq!(name_key("OBrien"), name_key("O\u{2019}Brien"));
        assert_eq!(name_key("D'Angelo Rossi"), "dangelo-rossi");
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("Šutko & Trnka"), vec!["Šutko", "Trnka"]);
        assert_eq!(split_pair("  Marek&Pleticha  "), vec!["Marek", "Pleticha"]);
        assert_eq!(split_pair("Solo"), vec!["Solo"]);
        assert_eq!(split_pair(" & Trnka &"), vec!["Trnka"]);
        assert!(split_pair("").is_empty());
    }

    #[test]
    fn test_surname_key() {
        assert_eq!(surname_key("Martin Šutko"), Some("sutko".to_string()));
        assert_eq!(surname_key("Trnka"), Some("trnka".to_string()));
        assert_eq!(surname_key("   "), None);
    }
}
