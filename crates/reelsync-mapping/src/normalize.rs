//! Title normalization
//!
//! Pure string transforms used by the structured mapping strategy to build
//! library-style file names ("Star's Wars" + 1977 -> "stars.wars.(1977)").

use regex::Regex;

/// Matches every maximal run of characters outside `[0-9a-z()]`
fn disallowed_runs() -> Regex {
    Regex::new(r"[^0-9a-z()]+").expect("valid pattern")
}

/// Matches a subtitle language suffix like `_en.srt` or `_fre.srt`
fn language_suffix() -> Regex {
    Regex::new(r"_([a-z]{2,3})\.srt$").expect("valid pattern")
}

/// Normalizes a title or column name:
/// 1. lowercase and trim
/// 2. remove apostrophes (Star's -> Stars)
/// 3. replace runs of characters outside `[0-9a-z()]` with `separator`
/// 4. collapse repeated separators (second pass for mixed-separator input)
/// 5. strip leading/trailing separators
///
/// Deterministic and idempotent; empty input yields an empty string.
#[must_use]
pub fn normalize(text: &str, separator: char) -> String {
    let lowered = text.trim().to_lowercase().replace('\'', "");

    let sep = separator.to_string();
    let replaced = disallowed_runs().replace_all(&lowered, sep.as_str());

    let mut collapsed = String::with_capacity(replaced.len());
    let mut previous_was_sep = false;
    for c in replaced.chars() {
        if c == separator {
            if !previous_was_sep {
                collapsed.push(c);
            }
            previous_was_sep = true;
        } else {
            collapsed.push(c);
            previous_was_sep = false;
        }
    }

    collapsed.trim_matches(separator).to_string()
}

/// Extracts the language code from a subtitle filename
/// (`"feature_en.srt"` -> `"en"`), defaulting to `"und"` when absent.
#[must_use]
pub fn extract_language(filename: &str) -> String {
    language_suffix()
        .captures(filename)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "und".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_separates() {
        assert_eq!(normalize("Star Wars", '.'), "star.wars");
        assert_eq!(normalize("  Leading Space ", '.'), "leading.space");
    }

    #[test]
    fn test_removes_apostrophes() {
        assert_eq!(normalize("Star's Wars", '.'), "stars.wars");
        assert_eq!(normalize("don't stop", '_'), "dont_stop");
    }

    #[test]
    fn test_keeps_digits_and_parentheses() {
        assert_eq!(normalize("Movie (1977)", '.'), "movie.(1977)");
        assert_eq!(normalize("s01e02", '.'), "s01e02");
    }

    #[test]
    fn test_collapses_runs_into_one_separator() {
        assert_eq!(normalize("a -- b!!c", '.'), "a.b.c");
        assert_eq!(normalize("a...b", '.'), "a.b");
    }

    #[test]
    fn test_strips_edge_separators() {
        assert_eq!(normalize("!hello!", '.'), "hello");
        assert_eq!(normalize("...", '.'), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize("", '.'), "");
    }

    #[test]
    fn test_underscore_separator_for_headers() {
        assert_eq!(normalize("Movie/Show Title", '_'), "movie_show_title");
        assert_eq!(
            normalize("Key Art (16:9) Filename", '_'),
            "key_art_(16_9)_filename"
        );
    }

    #[test]
    fn test_idempotence() {
        for input in [
            "Star's Wars",
            "A -- strange__ title (2020)",
            "already.normal.(1999)",
            "",
            "ALL CAPS!",
        ] {
            let once = normalize(input, '.');
            assert_eq!(normalize(&once, '.'), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_extract_language_two_letter() {
        assert_eq!(extract_language("feature_en.srt"), "en");
    }

    #[test]
    fn test_extract_language_three_letter() {
        assert_eq!(extract_language("feature_fre.srt"), "fre");
    }

    #[test]
    fn test_extract_language_missing() {
        assert_eq!(extract_language("feature.srt"), "und");
        assert_eq!(extract_language("feature_EN.srt"), "und");
        assert_eq!(extract_language("feature_en.sub"), "und");
    }
}
