//! Character-cap truncation for context blocks.
//!
//! A hard cut at `cap` characters (Unicode scalar values, never inside a
//! UTF-8 sequence) followed by [`TRUNCATION_NOTE`]. Not sentence-aware.

use std::borrow::Cow;

/// Appended to any text cut by [`truncate`].
pub const TRUNCATION_NOTE: &str =
    "\n\n[Note: this text was shortened to fit the assistant's context limit; later material was omitted.]";

/// Return `text` unchanged if it has at most `cap` characters, otherwise its
/// first `cap` characters followed by [`TRUNCATION_NOTE`].
pub fn truncate(text: &str, cap: usize) -> Cow<'_, str> {
    match text.char_indices().nth(cap) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_NOTE.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_NOTE);
            Cow::Owned(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn short_text_is_borrowed_unchanged() {
        let out = truncate("6-3 Computer Science", 100);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "6-3 Computer Science");
    }

    #[test]
    fn text_exactly_at_cap_is_unchanged() {
        let text = "a".repeat(50);
        assert_eq!(truncate(&text, 50), text.as_str());
    }

    #[test]
    fn long_text_is_cut_and_noted() {
        let text = "x".repeat(120);
        let out = truncate(&text, 100);
        assert!(out.starts_with(&"x".repeat(100)));
        assert!(out.ends_with(TRUNCATION_NOTE));
        assert_eq!(out.len(), 100 + TRUNCATION_NOTE.len());
    }

    #[test]
    fn cut_respects_multibyte_characters() {
        let text = "é".repeat(10);
        let out = truncate(&text, 3);
        assert_eq!(out, format!("ééé{TRUNCATION_NOTE}"));
    }

    #[test]
    fn empty_text_and_zero_cap() {
        assert_eq!(truncate("", 0), "");
        assert_eq!(truncate("a", 0), TRUNCATION_NOTE);
    }

    proptest! {
        #[test]
        fn length_is_unchanged_or_cap_plus_note(text in "\\PC{0,300}", cap in 0usize..200) {
            let out = truncate(&text, cap);
            let n = chars(&text);
            if n <= cap {
                prop_assert_eq!(out.as_ref(), text.as_str());
            } else {
                prop_assert_eq!(chars(&out), cap + chars(TRUNCATION_NOTE));
                let prefix: String = text.chars().take(cap).collect();
                prop_assert!(out.starts_with(&prefix));
            }
        }
    }
}
