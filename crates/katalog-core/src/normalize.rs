//! # Text Normalization
//!
//! Folds text into the form used for substring matching.
//!
//! ```text
//!   "  Café  Latte "
//!        │ lowercase
//!        ▼
//!   "  café  latte "
//!        │ NFD: é → e + U+0301
//!        ▼
//!   "  cafe\u{301}  latte "
//!        │ drop diacritical marks, drop whitespace
//!        ▼
//!   "cafelatte"
//! ```
//!
//! Lowercasing runs before decomposition so characters whose lowercase form
//! carries a combining mark (`İ` → `i̇`) are folded in a single pass, which
//! keeps the function idempotent.
//!
//! Only marks from the combining diacritical blocks are dropped. Vowel signs
//! and other marks that spell a letter in their own script (Devanagari `ि`,
//! Thai `ั`) stay, so `"कि"` never folds into `"क"`.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizes `text` for accent, case and whitespace insensitive matching.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c) && !c.is_whitespace())
        .collect()
}

/// A combining mark from one of the diacritical mark blocks.
fn is_diacritic(c: char) -> bool {
    is_combining_mark(c)
        && matches!(
            c,
            '\u{0300}'..='\u{036F}'
                | '\u{1AB0}'..='\u{1AFF}'
                | '\u{1DC0}'..='\u{1DFF}'
                | '\u{20D0}'..='\u{20FF}'
                | '\u{FE20}'..='\u{FE2F}'
        )
}

/// Same as [`normalize`] for optional input; `None` yields `""`.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Keeps only the ASCII digits of `text` (`"Rp 28.000"` → `"28000"`).
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_and_case_insensitive() {
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("CAFE"), "cafe");
        assert_eq!(normalize("cafe"), normalize("Café"));
        assert_eq!(normalize("Crème Brûlée"), "cremebrulee");
    }

    #[test]
    fn test_keeps_marks_that_are_not_accents() {
        assert_eq!(normalize("कि"), "कि");
        assert_ne!(normalize("कि"), normalize("क"));
        assert_eq!(normalize("สวัสดี"), "สวัสดี");
        assert_eq!(normalize("Ñandú"), "nandu");
    }

    #[test]
    fn test_whitespace_removed() {
        assert_eq!(normalize("Ayam Goreng"), normalize("ayamgoreng"));
        assert_eq!(normalize(" \tTeh\u{00A0}Botol\n"), "tehbotol");
    }

    #[test]
    fn test_idempotent() {
        for input in ["Café Latte", "İstanbul", "ÅNGSTRÖM", "  ", "", "Ǆemal", "28.000", "क़िला"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_absent_is_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("Kopi")), "kopi");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("Rp 28.000"), "28000");
        assert_eq!(digits_only("kopi"), "");
        assert_eq!(digits_only("٣"), "");
    }
}
