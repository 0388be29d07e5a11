use crate::errors::Result;
use crate::patterns::PatternSet;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Immutable settings for one run.
///
/// Built once by the front end and handed to a worker; the engine never
/// reads configuration from anywhere else.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The folder whose children will be searched through.
    pub source_root: PathBuf,
    /// The folder where output files are written. May equal the source
    /// folder, which turns the run into an in-place replacement.
    pub destination_root: PathBuf,
    /// Suppress output for files containing no matches.
    pub only_copy_matching: bool,
    /// Descend into sub-folders.
    pub recursive: bool,
    /// Search only files with a recognized text suffix; treat the rest as
    /// binary.
    pub text_files_only: bool,
    /// The ordered find/replace pairs.
    pub patterns: PatternSet,
}

/// A run described declaratively in a YAML file.
///
/// ```yaml
/// source: ./input
/// destination: ./output
/// find:
///   - "(?i)cat"
/// replace:
///   - "big %s!"
/// recursive: true
/// ```
#[derive(Debug, Deserialize)]
pub struct JobFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Search strings, one pair per index. A `(?i)` prefix makes the pair
    /// case-insensitive.
    #[serde(default)]
    pub find: Vec<String>,
    /// Replacement templates; `%s` stands for the matched text. Missing
    /// entries default to keeping the match as-is.
    #[serde(default)]
    pub replace: Vec<String>,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub text_files_only: bool,
    #[serde(default)]
    pub only_copy_matching: bool,
}

impl JobFile {
    /// Loads a job description from a YAML file.
    pub fn load(path: &Path) -> Result<JobFile> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Resolves the job into the engine's run configuration.
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            source_root: self.source,
            destination_root: self.destination,
            only_copy_matching: self.only_copy_matching,
            recursive: self.recursive,
            text_files_only: self.text_files_only,
            patterns: PatternSet::from_lines(&self.find, &self.replace),
        }
    }
}
