//! The main entry point for the `fnr` command-line application.
//!
//! This binary is a thin client of the engine: it assembles a `RunConfig`
//! from flags and an optional YAML job file, starts a `SearchWorker`, polls
//! it for progress while it runs, and prints the final summary.

use fnr::cli::{self, Args};
use fnr::config::{JobFile, RunConfig};
use fnr::errors::Result;
use fnr::{LogSink, PatternSet, SearchWorker};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufWriter;
use std::time::Duration;
use std::{env, process, thread};

fn main() -> Result<()> {
    // Check if no arguments were provided
    if env::args().len() == 1 {
        println!("Batch find-and-replace for directory trees\n");
        println!("QUICK START EXAMPLES:");
        println!("  fnr -s ./in -d ./out -f cat -r dog           # copy tree, replacing text");
        println!("  fnr -s ./src -d ./src -R -f cat -r 'big %s'  # in-place, recursive");
        println!("  fnr -c job.yaml -o report.log                # run a YAML job, log to file\n");
        println!("Run 'fnr --help' for the full flag list");
        process::exit(0);
    }

    let args = cli::parse_args();
    let config = build_config(&args)?;

    if !config.source_root.is_dir() {
        return Err(format!(
            "source folder \"{}\" does not exist or is not a directory",
            config.source_root.display()
        )
        .into());
    }
    fs::create_dir_all(&config.destination_root)?;

    let sink = match &args.output {
        Some(path) => LogSink::new(BufWriter::new(File::create(path)?)),
        None => LogSink::stdout(),
    };

    let mut worker = SearchWorker::new(config);
    worker.start(sink)?;

    // Only draw a spinner when the report goes to a file; otherwise the two
    // would fight over the terminal.
    let bar = args.output.as_ref().map(|_| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    while worker.is_active() {
        if let Some(bar) = &bar {
            let snap = worker.snapshot();
            bar.set_message(format!(
                "{} folders, {} files searched, {} replacements, {} copied",
                snap.folders_traversed,
                snap.files_searched,
                snap.replacements_performed,
                snap.files_copied
            ));
        }
        thread::sleep(Duration::from_millis(50));
    }
    worker.stop();
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let snapshot = worker.snapshot();
    if args.json_summary {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("\n{snapshot}");
    }
    Ok(())
}

/// Builds the run configuration from the job file (if any) with the
/// command-line flags applied on top.
fn build_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => JobFile::load(path)?.into_config(),
        None => {
            let source = args
                .source
                .clone()
                .ok_or("specify --source (or a --config job file)")?;
            let dest = args
                .dest
                .clone()
                .ok_or("specify --dest (or a --config job file)")?;
            RunConfig {
                source_root: source,
                destination_root: dest,
                only_copy_matching: false,
                recursive: false,
                text_files_only: false,
                patterns: PatternSet::default(),
            }
        }
    };

    if let Some(source) = &args.source {
        config.source_root = source.clone();
    }
    if let Some(dest) = &args.dest {
        config.destination_root = dest.clone();
    }
    if !args.find.is_empty() {
        config.patterns = PatternSet::from_lines(&args.find, &args.replace);
    }
    config.recursive |= args.recursive;
    config.text_files_only |= args.text_only;
    config.only_copy_matching |= args.match_only;
    Ok(config)
}
