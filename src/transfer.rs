use crate::control::ControlFlags;
use crate::counters::RunCounters;
use crate::patterns::PatternSet;
use crate::rewriter::LineRewriter;
use crate::sink::LogSink;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::Ordering;

/// Chunk size for verbatim byte copies.
const COPY_CHUNK: usize = 4096;

/// Per-file transfer logic.
///
/// Decides, for one source file, between a verbatim byte copy and a
/// line-by-line rewrite into the destination, accounting for every outcome
/// in the shared counters and narrating it to the report sink. All failures
/// are per-file: a transfer that fails is reported and the run moves on.
pub struct FileTransfer<'a> {
    patterns: &'a PatternSet,
    only_copy_matching: bool,
    counters: &'a RunCounters,
    flags: &'a ControlFlags,
    sink: &'a LogSink,
}

impl<'a> FileTransfer<'a> {
    pub fn new(
        patterns: &'a PatternSet,
        only_copy_matching: bool,
        counters: &'a RunCounters,
        flags: &'a ControlFlags,
        sink: &'a LogSink,
    ) -> Self {
        Self {
            patterns,
            only_copy_matching,
            counters,
            flags,
            sink,
        }
    }

    /// Streams `src` into `dest` in fixed-size chunks.
    ///
    /// A source equal to its destination is a counted skip, not an error.
    /// Pause requests take effect between chunks; a stop request lets the
    /// copy finish so the destination is never left truncated.
    ///
    /// Returns true if the destination holds a complete copy (or the copy
    /// was skipped as a same-file no-op).
    pub fn copy(&self, src: &Path, dest: &Path) -> bool {
        if src == dest {
            self.counters.files_skipped.fetch_add(1, Ordering::Relaxed);
            self.sink.line(format!(
                "Skipping copy of file \"{}\" as it is the same as the destination.",
                src.display()
            ));
            return true;
        }

        let mut reader = match File::open(src) {
            Ok(file) => file,
            Err(err) => {
                self.counters.file_reads_failed.fetch_add(1, Ordering::Relaxed);
                self.counters.file_copies_failed.fetch_add(1, Ordering::Relaxed);
                self.sink.line(format!(
                    "Failed to read from source file \"{}\": {}",
                    src.display(),
                    err
                ));
                return false;
            }
        };
        let mut writer = match File::create(dest) {
            Ok(file) => file,
            Err(err) => {
                self.counters.file_writes_failed.fetch_add(1, Ordering::Relaxed);
                self.counters.file_copies_failed.fetch_add(1, Ordering::Relaxed);
                self.sink.line(format!(
                    "Failed to write to destination file \"{}\": {}",
                    dest.display(),
                    err
                ));
                return false;
            }
        };

        let mut buf = [0u8; COPY_CHUNK];
        loop {
            let read = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    self.counters.file_reads_failed.fetch_add(1, Ordering::Relaxed);
                    self.counters.file_copies_failed.fetch_add(1, Ordering::Relaxed);
                    self.sink.line(format!(
                        "Failed to read from source file \"{}\": {}",
                        src.display(),
                        err
                    ));
                    return false;
                }
            };
            if let Err(err) = writer.write_all(&buf[..read]) {
                self.counters.file_writes_failed.fetch_add(1, Ordering::Relaxed);
                self.counters.file_copies_failed.fetch_add(1, Ordering::Relaxed);
                self.sink.line(format!(
                    "Failed to write to destination file \"{}\": {}",
                    dest.display(),
                    err
                ));
                return false;
            }
            self.flags.pause_point();
        }

        self.counters.files_copied.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Searches `src` for the pattern set and writes the result to `dest`.
    ///
    /// The source is read fully into memory before the destination is ever
    /// opened, which is what makes same-directory runs safe: when source and
    /// destination are the same file, the rewrite happens in place without a
    /// temp-file dance. Files with no matches fall back to [`copy`](Self::copy)
    /// (or a counted skip, per the option set) so their bytes are preserved
    /// exactly rather than re-encoded.
    ///
    /// Returns true if any data was written to the destination.
    pub fn find_and_replace(&self, src: &Path, dest: &Path) -> bool {
        if self.patterns.is_empty() {
            self.sink.line(format!(
                "Byte-copying file and skipping search within \"{}\" due to lack of search strings...",
                src.display()
            ));
            self.counters.searches_skipped.fetch_add(1, Ordering::Relaxed);
            return self.copy(src, dest);
        }

        self.sink
            .line(format!("Searching within file \"{}\"...", src.display()));
        let lines = match self.read_lines(src) {
            Ok(Some(lines)) => lines,
            // stop requested between line reads
            Ok(None) => return false,
            Err(err) => {
                self.counters.file_reads_failed.fetch_add(1, Ordering::Relaxed);
                self.sink.line(format!(
                    "Failed to read source file \"{}\": {}",
                    src.display(),
                    err
                ));
                return false;
            }
        };
        self.counters.files_searched.fetch_add(1, Ordering::Relaxed);

        let rewriter = LineRewriter::new(self.patterns, self.flags);
        let total_lines = lines.len();
        let mut rewritten = Vec::with_capacity(total_lines);
        let mut found_any = false;
        for (index, line) in lines.iter().enumerate() {
            let Some(edit) = rewriter.rewrite(line, index + 1, total_lines) else {
                return false;
            };
            if edit.replacements > 0 {
                found_any = true;
                self.counters
                    .replacements_performed
                    .fetch_add(edit.replacements as u64, Ordering::Relaxed);
                for substitution in &edit.substitutions {
                    self.sink.line(substitution.describe());
                }
            }
            rewritten.push(edit.line);
            if !self.flags.pause_point() {
                return false;
            }
        }

        if self.only_copy_matching && !found_any {
            self.sink.line(format!(
                "\tSkipping copy of file \"{}\" as it does not contain any of the search-strings...",
                src.display()
            ));
            self.counters.files_skipped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if !found_any && src != dest {
            self.sink.line(format!(
                "\tPerforming byte-copy instead of line-by-line copy of file \"{}\" as it does not contain any of the search-strings.",
                src.display()
            ));
            return self.copy(src, dest);
        }
        if !found_any && src == dest {
            self.sink.line(format!(
                "\tSkipping copy of file \"{}\" as it does not contain any of the search-strings, and is the same file as the destination.",
                src.display()
            ));
            self.counters.files_skipped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.sink.line(format!(
            "\tCopying file \"{}\" to destination file \"{}\" line-by-line...",
            src.display(),
            dest.display()
        ));
        match write_lines(dest, &rewritten) {
            Ok(()) => {
                self.counters.files_copied.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(err) => {
                self.counters.file_writes_failed.fetch_add(1, Ordering::Relaxed);
                self.sink.line(format!(
                    "Failed to write to destination file \"{}\": {}",
                    dest.display(),
                    err
                ));
                false
            }
        }
    }

    /// Reads the whole file as a sequence of lines.
    ///
    /// The terminator is a line feed; a trailing carriage return belongs to
    /// the terminator, not the content. Returns `Ok(None)` when a stop
    /// request arrives between line reads.
    fn read_lines(&self, src: &Path) -> io::Result<Option<Vec<Vec<u8>>>> {
        let mut reader = BufReader::new(File::open(src)?);
        let mut lines = Vec::new();
        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if line.last() == Some(&b'\n') {
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
            }
            lines.push(line);
            if !self.flags.pause_point() {
                return Ok(None);
            }
        }
        Ok(Some(lines))
    }
}

/// Writes one line-feed-terminated line per input line.
fn write_lines(dest: &Path, lines: &[Vec<u8>]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(dest)?);
    for line in lines {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::SharedBuffer;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        counters: RunCounters,
        flags: ControlFlags,
        sink: LogSink,
        buffer: SharedBuffer,
    }

    impl Fixture {
        fn new() -> Self {
            let flags = ControlFlags::new();
            flags.mark_running();
            let buffer = SharedBuffer::default();
            Self {
                counters: RunCounters::new(),
                flags,
                sink: LogSink::new(buffer.clone()),
                buffer,
            }
        }

        fn transfer<'a>(&'a self, patterns: &'a PatternSet, match_only: bool) -> FileTransfer<'a> {
            FileTransfer::new(patterns, match_only, &self.counters, &self.flags, &self.sink)
        }
    }

    #[test]
    fn test_copy_preserves_bytes_exactly() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.bin");
        let dest = dir.path().join("dest.bin");
        // CRLF and stray bytes survive a byte copy untouched
        let content: Vec<u8> = b"line one\r\nline two\x00\xff no trailing newline".to_vec();
        fs::write(&src, &content).unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::default();
        assert!(fixture.transfer(&patterns, false).copy(&src, &dest));
        assert_eq!(fs::read(&dest).unwrap(), content);
        assert_eq!(fixture.counters.snapshot().files_copied, 1);
    }

    #[test]
    fn test_copy_to_same_path_is_counted_skip() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("same.txt");
        fs::write(&src, "content").unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::default();
        assert!(fixture.transfer(&patterns, false).copy(&src, &src));
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.files_skipped, 1);
        assert_eq!(snap.files_copied, 0);
        assert_eq!(fs::read_to_string(&src).unwrap(), "content");
    }

    #[test]
    fn test_copy_unreadable_source_counts_failures() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("missing.txt");
        let dest = dir.path().join("dest.txt");

        let fixture = Fixture::new();
        let patterns = PatternSet::default();
        assert!(!fixture.transfer(&patterns, false).copy(&src, &dest));
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.file_reads_failed, 1);
        assert_eq!(snap.file_copies_failed, 1);
        assert!(fixture.buffer.contents().contains("Failed to read"));
    }

    #[test]
    fn test_empty_patterns_delegate_to_copy() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "anything\n").unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::default();
        assert!(fixture.transfer(&patterns, false).find_and_replace(&src, &dest));
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.searches_skipped, 1);
        assert_eq!(snap.files_copied, 1);
        assert_eq!(snap.files_searched, 0);
    }

    #[test]
    fn test_no_match_falls_back_to_byte_identical_copy() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        // CRLF endings and a missing final newline would not survive a
        // line-by-line rewrite; the fallback keeps them
        let content = b"alpha\r\nbeta\r\ngamma".to_vec();
        fs::write(&src, &content).unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::parse("absent", "irrelevant");
        assert!(fixture.transfer(&patterns, false).find_and_replace(&src, &dest));
        assert_eq!(fs::read(&dest).unwrap(), content);
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.files_searched, 1);
        assert_eq!(snap.files_copied, 1);
        assert_eq!(snap.replacements_performed, 0);
    }

    #[test]
    fn test_no_match_onto_itself_is_skipped() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "alpha\n").unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::parse("absent", "irrelevant");
        assert!(!fixture.transfer(&patterns, false).find_and_replace(&src, &src));
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.files_skipped, 1);
        assert_eq!(snap.files_copied, 0);
        assert_eq!(fs::read_to_string(&src).unwrap(), "alpha\n");
    }

    #[test]
    fn test_match_only_skips_non_matching_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "nothing here\n").unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::parse("absent", "irrelevant");
        assert!(!fixture.transfer(&patterns, true).find_and_replace(&src, &dest));
        assert!(!dest.exists());
        assert_eq!(fixture.counters.snapshot().files_skipped, 1);
    }

    #[test]
    fn test_matching_file_is_rewritten() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "the cat sat\nno match\ncat again\n").unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::parse("cat", "big %s!");
        assert!(fixture.transfer(&patterns, false).find_and_replace(&src, &dest));
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "the big cat! sat\nno match\nbig cat! again\n"
        );
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.replacements_performed, 2);
        assert_eq!(snap.files_copied, 1);
        assert_eq!(snap.files_searched, 1);
        let log = fixture.buffer.contents();
        assert!(log.contains("Found \"cat\" in line # 1/3"));
        assert!(log.contains("line-by-line"));
    }

    #[test]
    fn test_in_place_rewrite_on_same_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "one cat\n").unwrap();

        let fixture = Fixture::new();
        let patterns = PatternSet::parse("cat", "dog");
        assert!(fixture.transfer(&patterns, false).find_and_replace(&src, &src));
        assert_eq!(fs::read_to_string(&src).unwrap(), "one dog\n");
        assert_eq!(fixture.counters.snapshot().files_copied, 1);
    }

    #[test]
    fn test_crlf_terminators_are_not_searched_as_content() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "end\r\n").unwrap();

        let fixture = Fixture::new();
        // a pattern ending where the CR sat would only match if the CR were
        // stripped from content
        let patterns = PatternSet::parse("end", "%s.");
        assert!(fixture.transfer(&patterns, false).find_and_replace(&src, &dest));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "end.\n");
    }

    #[test]
    fn test_unreadable_source_during_search() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("missing.txt");
        let dest = dir.path().join("dest.txt");

        let fixture = Fixture::new();
        let patterns = PatternSet::parse("cat", "dog");
        assert!(!fixture.transfer(&patterns, false).find_and_replace(&src, &dest));
        let snap = fixture.counters.snapshot();
        assert_eq!(snap.file_reads_failed, 1);
        assert_eq!(snap.files_searched, 0);
    }
}
