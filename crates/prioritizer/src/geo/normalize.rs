use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds a region, municipality or sector label into its lookup key: accents and
/// invisible characters stripped, whitespace collapsed, lowercase.
pub fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let folded: String = cleaned
        .nfd()
        .filter(|character| !is_combining_mark(*character))
        .collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(normalize_key("MAGÜÍ"), "magui");
        assert_eq!(normalize_key("Nariño"), "narino");
        assert_eq!(normalize_key("San Vicente del Caguán"), "san vicente del caguan");
    }

    #[test]
    fn collapses_whitespace_and_invisible_characters() {
        assert_eq!(
            normalize_key("\u{feff}  Norte   de\u{200b} Santander "),
            "norte de santander"
        );
    }

    #[test]
    fn decomposed_and_composed_forms_agree() {
        assert_eq!(normalize_key("Bojaya\u{0301}"), normalize_key("Bojayá"));
    }
}
