//! Search collation: the form a string takes when compared by a lookup.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase `text` and strip diacritics, so `"Blåhaj"` and `"blahaj"`
/// compare equal.
///
/// Decomposes to NFD first so accented letters split into a base letter
/// plus combining marks, then drops the marks.
pub fn search_form(text: &str) -> String {
    text.nfd()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case() {
        assert_eq!(search_form("PowerPuff"), "powerpuff");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(search_form("Blåhaj"), "blahaj");
        assert_eq!(search_form("café crème"), "cafe creme");
        assert_eq!(search_form("Ångström"), "angstrom");
    }

    #[test]
    fn leaves_plain_ascii_and_symbols_alone() {
        assert_eq!(search_form("power_lines 2"), "power_lines 2");
        assert_eq!(search_form(""), "");
    }

    #[test]
    fn precomposed_and_decomposed_fold_the_same() {
        assert_eq!(search_form("\u{e5}"), search_form("a\u{30a}"));
    }
}
