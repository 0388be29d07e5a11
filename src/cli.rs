use clap::Parser;
use std::path::PathBuf;

/// Batch find-and-replace across a directory tree.
///
/// `fnr` searches every file under a source folder for an ordered list of
/// literal find strings, writes rewritten files into a mirrored destination
/// tree, and byte-copies files that contain no matches. Pointing the
/// destination at the source folder performs the replacement in place.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Batch find-and-replace across a directory tree",
    long_about = "fnr - batch find-and-replace for directory trees.

Searches file contents for literal strings (no regex), rewrites matching
files into a mirrored destination tree, and byte-copies the rest. Find
strings may be prefixed with (?i) for case-insensitive matching, and
replacement text may use %s to stand for the matched text.

QUICK EXAMPLES:
  fnr -s ./in -d ./out -f cat -r dog          # copy tree, replacing text
  fnr -s ./src -d ./src -R -f cat -r 'big %s' # in-place, recursive
  fnr -c job.yaml -o report.log               # run a YAML job, log to file

For detailed help: fnr --help"
)]
pub struct Args {
    /// The folder whose children will be searched through.
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// The folder where output files are written. May equal the source
    /// folder for in-place replacement.
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// A search string; repeat the flag for multiple ordered pairs. Prefix
    /// with `(?i)` for case-insensitive matching.
    #[arg(short, long)]
    pub find: Vec<String>,

    /// Replacement text for the find string at the same position; `%s`
    /// stands for the matched text. Missing entries keep the match as-is.
    #[arg(short, long)]
    pub replace: Vec<String>,

    /// Path to a YAML job file describing the run. Command-line flags are
    /// applied on top of it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Descend into sub-folders.
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Search only files with a recognized text extension; others are
    /// byte-copied (or skipped under --match-only).
    #[arg(short = 't', long = "text-only")]
    pub text_only: bool,

    /// Only copy files that contain at least one match.
    #[arg(short = 'm', long = "match-only")]
    pub match_only: bool,

    /// Write the report log to a file instead of standard output and show
    /// a live progress spinner.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the final counters as JSON on standard output.
    #[arg(long)]
    pub json_summary: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
