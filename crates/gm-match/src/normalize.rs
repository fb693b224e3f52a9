//! Title normalization for cross-source comparison.
//!
//! Official titles are formulaic ("Full Committee Markup of H.R. 1234")
//! while video titles tend to be longer and more descriptive, so a single
//! strategy is not enough. The normalizer tries an aggressive pass that
//! strips organizational boilerplate; when that destroys too much signal it
//! prefers substantial parenthetical content, and otherwise falls back to
//! minimal cleanup.

use std::sync::LazyLock;

use regex::Regex;

/// Aggressive output shorter than this is considered destroyed signal.
const MIN_AGGRESSIVE_CHARS: usize = 5;

/// Parenthetical content must exceed this many words to be "substantial".
const MIN_PARENTHETICAL_WORDS: usize = 2;

// Patterns are literals; construction cannot fail.
#[allow(clippy::unwrap_used)]
static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+\d{1,2},?\s+\d{4}\s+",
    )
    .unwrap()
});
#[allow(clippy::unwrap_used)]
static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());
#[allow(clippy::unwrap_used)]
static ORG_BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(Full Committee |Committee |Subcommittee )").unwrap());
#[allow(clippy::unwrap_used)]
static PROCEDURAL: LazyLock<Regex> = LazyLock::new(|| {
    // "Markup" stays: it carries event-type signal the scorer relies on.
    Regex::new(r"(?i)\b(Hearing|Meeting|Legislative|Oversight|Business)\b").unwrap()
});
#[allow(clippy::unwrap_used)]
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
#[allow(clippy::unwrap_used)]
static TRAILING_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s:\-–—]+$").unwrap());

/// Normalize a title for comparison.
///
/// Total over all inputs: any string in, a (possibly empty) lowercased
/// string out. Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(title: &str) -> String {
    // The passes interact (stripping boilerplate can expose a leading date,
    // parenthetical content can itself contain boilerplate), so run to a
    // fixed point. Real titles settle within two passes.
    let mut current = title.to_string();
    for _ in 0..8 {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_once(title: &str) -> String {
    let title = strip_date_prefix(title);

    let parenthetical = PARENTHETICAL
        .captures(&title)
        .map(|c| c[1].trim().to_string())
        .filter(|p| p.split_whitespace().count() > MIN_PARENTHETICAL_WORDS);

    let aggressive = {
        let s = ORG_BOILERPLATE.replace_all(&title, "");
        let s = PROCEDURAL.replace_all(&s, "");
        minimal(&s)
    };

    let result = if aggressive.chars().count() > MIN_AGGRESSIVE_CHARS {
        aggressive
    } else if let Some(parenthetical) = parenthetical {
        parenthetical
    } else {
        minimal(&title)
    };

    result.to_lowercase()
}

/// Strip leading date-like prefixes ("January 5, 2024 "), repeating in case
/// several are stacked.
fn strip_date_prefix(title: &str) -> String {
    let mut rest = title;
    while let Some(m) = DATE_PREFIX.find(rest) {
        rest = &rest[m.end()..];
    }
    rest.to_string()
}

/// Minimal normalization: collapse whitespace, strip trailing punctuation.
fn minimal(title: &str) -> String {
    let s = WHITESPACE.replace_all(title, " ");
    let s = TRAILING_PUNCT.replace(&s, "");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_date() {
        assert_eq!(
            normalize("January 5, 2024 Markup of Pending Legislation"),
            "markup of pending legislation"
        );
    }

    #[test]
    fn strips_organizational_boilerplate() {
        assert_eq!(
            normalize("Full Committee Markup of H.R. 1234"),
            "markup of h.r. 1234"
        );
    }

    #[test]
    fn keeps_markup_but_drops_procedural_words() {
        assert_eq!(normalize("Oversight Hearing on XYZ"), "on xyz");
        assert_eq!(normalize("Unrelated Markup"), "unrelated markup");
    }

    #[test]
    fn aggressive_pass_keeps_parenthetical_text_inline() {
        assert_eq!(
            normalize("Hearing (The Future of Artificial Intelligence)"),
            "(the future of artificial intelligence)"
        );
    }

    #[test]
    fn prefers_substantial_parenthetical_when_stripped_too_short() {
        // Everything outside and inside the parens is boilerplate, so the
        // aggressive pass leaves nothing; the parenthetical content wins.
        assert_eq!(
            normalize("Hearing (Legislative Business Meeting)"),
            "legislative business meeting"
        );
    }

    #[test]
    fn minimal_fallback_when_everything_is_boilerplate() {
        assert_eq!(normalize("Business Meeting"), "business meeting");
    }

    #[test]
    fn collapses_whitespace_and_trailing_punctuation() {
        assert_eq!(normalize("Spectrum   Auctions -"), "spectrum auctions");
    }

    #[test]
    fn empty_input_is_fine() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent_on_representative_titles() {
        let titles = [
            "January 5, 2024 Full Committee Markup of H.R. 1234",
            "Oversight Hearing on XYZ",
            "Hearing (The Future of Artificial Intelligence)",
            "Business Meeting",
            "FTC Privacy Hearing",
            "Committee January 5, 2024 Spectrum Auctions",
            "(Committee Review of Pending Legislation)",
            "",
        ];
        for title in titles {
            let once = normalize(title);
            assert_eq!(normalize(&once), once, "not idempotent for {title:?}");
        }
    }
}
