use crate::control::ControlFlags;
use crate::latin1;
use crate::patterns::{PatternSet, SearchPair};

/// One replacement performed on a line, recorded for the report log.
///
/// All occurrences a single pair replaces within one line share the same
/// before/after text, since the line is spliced once per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The exact matched text, in its original casing.
    pub matched: String,
    /// 1-based line number within the file.
    pub line_number: usize,
    /// Total number of lines in the file.
    pub total_lines: usize,
    /// The line before this pair's rewrite.
    pub before: String,
    /// The line after this pair's rewrite.
    pub after: String,
}

impl Substitution {
    /// The report-log rendering of this substitution.
    pub fn describe(&self) -> String {
        format!(
            "\tFound \"{}\" in line # {}/{};\n\t\tLine before: \"{}\";\n\t\tResulting line: \"{}\";",
            self.matched, self.line_number, self.total_lines, self.before, self.after
        )
    }
}

/// The rewritten form of one line, with its trace.
#[derive(Debug, Default)]
pub struct LineEdit {
    /// The line after every pair has been applied.
    pub line: Vec<u8>,
    /// Number of discrete replacements performed across all pairs.
    pub replacements: usize,
    /// One record per replaced occurrence, in application order.
    pub substitutions: Vec<Substitution>,
}

/// Applies a [`PatternSet`] to single lines of text.
///
/// The rewriter holds the run's control flags so a pause or stop takes
/// effect between pair applications, even in the middle of a long line.
pub struct LineRewriter<'a> {
    patterns: &'a PatternSet,
    flags: &'a ControlFlags,
}

impl<'a> LineRewriter<'a> {
    pub fn new(patterns: &'a PatternSet, flags: &'a ControlFlags) -> Self {
        Self { patterns, flags }
    }

    /// Rewrites one line, applying every pair in order against the
    /// progressively-rewritten line.
    ///
    /// Each pair scans the current line left-to-right for non-overlapping
    /// occurrences in a single pass (scanning resumes strictly after the end
    /// of each match; replaced text is not re-scanned by the same pair), then
    /// splices the line once. A zero [`LineEdit::replacements`] means no pair
    /// fired and the caller can treat the line as pass-through.
    ///
    /// Returns `None` when a stop request arrives at one of the between-pair
    /// suspension points.
    pub fn rewrite(&self, line: &[u8], line_number: usize, total_lines: usize) -> Option<LineEdit> {
        let mut edit = LineEdit {
            line: line.to_vec(),
            ..LineEdit::default()
        };
        for pair in self.patterns.pairs() {
            let starts = find_occurrences(&edit.line, pair);
            if !starts.is_empty() {
                let before = latin1::decode(&edit.line);
                let (spliced, matched) = splice(&edit.line, pair, &starts);
                let after = latin1::decode(&spliced);
                edit.replacements += matched.len();
                for target in matched {
                    edit.substitutions.push(Substitution {
                        matched: latin1::decode(&target),
                        line_number,
                        total_lines,
                        before: before.clone(),
                        after: after.clone(),
                    });
                }
                edit.line = spliced;
            }
            if !self.flags.pause_point() {
                return None;
            }
        }
        Some(edit)
    }
}

/// Collects the start offsets of every non-overlapping occurrence of the
/// pair's pattern, scanning left-to-right.
fn find_occurrences(line: &[u8], pair: &SearchPair) -> Vec<usize> {
    let pattern = pair.pattern();
    let mut starts = Vec::new();
    let mut i = 0;
    while i + pattern.len() <= line.len() {
        let window = &line[i..i + pattern.len()];
        let hit = if pair.case_insensitive() {
            latin1::eq_ignore_case(window, pattern)
        } else {
            window == pattern
        };
        if hit {
            starts.push(i);
            i += pattern.len();
        } else {
            i += 1;
        }
    }
    starts
}

/// Rebuilds the line once for one pair: unmatched spans verbatim, matched
/// spans replaced by the pair's template with the placeholder expanded to
/// the exact matched text. Also returns each matched span.
fn splice(line: &[u8], pair: &SearchPair, starts: &[usize]) -> (Vec<u8>, Vec<Vec<u8>>) {
    let len = pair.pattern().len();
    let mut out = Vec::with_capacity(line.len());
    let mut matched = Vec::with_capacity(starts.len());
    let mut last = 0;
    for &start in starts {
        let target = &line[start..start + len];
        out.extend_from_slice(&line[last..start]);
        out.extend_from_slice(&expand_template(pair.replacement(), target));
        matched.push(target.to_vec());
        last = start + len;
    }
    out.extend_from_slice(&line[last..]);
    (out, matched)
}

/// Substitutes every `%s` in the template with the matched text.
fn expand_template(template: &[u8], target: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(template.len() + target.len());
    let mut i = 0;
    while i < template.len() {
        if template[i] == b'%' && template.get(i + 1) == Some(&b's') {
            out.extend_from_slice(target);
            i += 2;
        } else {
            out.push(template[i]);
            i += 1;
        }
    }
    out
}
