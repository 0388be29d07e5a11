use crate::latin1;

/// The literal token inside a replacement template that stands for the
/// matched text.
pub const PLACEHOLDER: &str = "%s";

/// The literal prefix that marks a find-line as case-insensitive.
const CASE_INSENSITIVE_MARKER: &str = "(?i)";

/// One literal search string and its replacement template.
///
/// The search text and template are stored pre-encoded in the fixed file
/// encoding so matching and splicing work directly on file bytes. The
/// template may contain [`PLACEHOLDER`]; every occurrence is substituted
/// with the exact matched text (original casing preserved) when the
/// replacement is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPair {
    pattern: Vec<u8>,
    case_insensitive: bool,
    replacement: Vec<u8>,
}

impl SearchPair {
    /// The search text, with any case-insensitivity marker already stripped.
    /// Never empty.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Whether this pair matches without regard to letter case.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// The replacement template in the fixed file encoding.
    pub fn replacement(&self) -> &[u8] {
        &self.replacement
    }
}

/// An ordered set of find/replace pairs.
///
/// Order is significant: pairs are applied in sequence per line, each one
/// operating on the progressively-rewritten line, so a later pair sees the
/// replacements made by an earlier pair. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    pairs: Vec<SearchPair>,
}

impl PatternSet {
    /// Parses raw multi-line find and replace text into a pattern set.
    ///
    /// Both inputs are split on `\n` with a trailing `\r` stripped from each
    /// line. A find-line is dropped when it is blank, or blank after removing
    /// the leading `(?i)` marker; a dropped line still consumes its replace
    /// slot, since pairing is by line position. A find-line with no
    /// corresponding replace-line gets the placeholder alone, which keeps the
    /// matched text as-is.
    ///
    /// Malformed input never fails: it degrades to fewer (or zero) pairs.
    pub fn parse(find_text: &str, replace_text: &str) -> PatternSet {
        let find_lines: Vec<&str> = find_text.split('\n').collect();
        let replace_lines: Vec<&str> = replace_text.split('\n').collect();
        Self::from_lines(&find_lines, &replace_lines)
    }

    /// Builds a pattern set from pre-split find and replace lines.
    ///
    /// Uses the same drop and positional-pairing rules as [`parse`](Self::parse).
    pub fn from_lines<F, R>(find_lines: &[F], replace_lines: &[R]) -> PatternSet
    where
        F: AsRef<str>,
        R: AsRef<str>,
    {
        let mut pairs = Vec::new();
        for (i, raw) in find_lines.iter().enumerate() {
            let raw = strip_cr(raw.as_ref());
            let (text, case_insensitive) = match raw.strip_prefix(CASE_INSENSITIVE_MARKER) {
                Some(rest) => (rest, true),
                None => (raw, false),
            };
            if text.is_empty() {
                continue;
            }
            let replacement = replace_lines
                .get(i)
                .map(|r| strip_cr(r.as_ref()))
                .unwrap_or(PLACEHOLDER);
            pairs.push(SearchPair {
                pattern: latin1::encode(text),
                case_insensitive,
                replacement: latin1::encode(replacement),
            });
        }
        PatternSet { pairs }
    }

    /// The pairs in application order.
    pub fn pairs(&self) -> &[SearchPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_stripped_and_flagged() {
        let set = PatternSet::parse("(?i)cat", "dog");
        assert_eq!(set.len(), 1);
        let pair = &set.pairs()[0];
        assert_eq!(pair.pattern(), b"cat");
        assert!(pair.case_insensitive());
        assert_eq!(pair.replacement(), b"dog");
    }

    #[test]
    fn test_blank_and_marker_only_lines_are_dropped() {
        let set = PatternSet::parse("\n(?i)\ncat", "a\nb\nc");
        assert_eq!(set.len(), 1);
        let pair = &set.pairs()[0];
        assert_eq!(pair.pattern(), b"cat");
        assert!(!pair.case_insensitive());
        // pairing is positional: the two dropped lines consumed "a" and "b"
        assert_eq!(pair.replacement(), b"c");
    }

    #[test]
    fn test_missing_replace_line_defaults_to_placeholder() {
        let set = PatternSet::parse("cat\ndog", "feline");
        assert_eq!(set.len(), 2);
        assert_eq!(set.pairs()[0].replacement(), b"feline");
        assert_eq!(set.pairs()[1].replacement(), b"%s");
    }

    #[test]
    fn test_trailing_carriage_returns_are_stripped() {
        let set = PatternSet::parse("cat\r\ndog\r", "a\r\nb\r");
        assert_eq!(set.len(), 2);
        assert_eq!(set.pairs()[0].pattern(), b"cat");
        assert_eq!(set.pairs()[0].replacement(), b"a");
        assert_eq!(set.pairs()[1].pattern(), b"dog");
        assert_eq!(set.pairs()[1].replacement(), b"b");
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(PatternSet::parse("", "").is_empty());
        assert!(PatternSet::parse("\n\n", "x\ny").is_empty());
    }

    #[test]
    fn test_empty_replace_line_means_deletion() {
        let set = PatternSet::parse("cat\ndog", "\nkept");
        assert_eq!(set.pairs()[0].replacement(), b"");
        assert_eq!(set.pairs()[1].replacement(), b"kept");
    }
}
