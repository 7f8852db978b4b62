//! BED-to-GFF2 converter, one annotated GFF per input file
//! Alejandro Gonzales-Irribarren, 2025

use clap::Parser;
use indoc::indoc;
use std::path::PathBuf;
use thiserror::Error;

use crate::region::DEFAULT_SOURCE;

#[derive(Parser, Debug)]
#[clap(
    name = "bed2gff",
    version = env!("CARGO_PKG_VERSION"),
    author = "Alejandro Gonzales-Irribarren <alejandrxgzi@gmail.com>",
    about = "BED to GFF file converter",
    after_help = indoc! {"
        Each input is written next to itself with a .gff extension
        (peaks.bed -> peaks.gff). Existing outputs are skipped unless
        -w/--overwrite is given. Malformed lines are reported on stderr
        and kept in the output as '### Malformed line: ...' comments.
    "}
)]
pub struct Args {
    /// One or more BED files to convert.
    #[clap(value_name = "BEDFILE", required = true, num_args = 1..)]
    pub bedfiles: Vec<PathBuf>,

    /// Overwrite existing GFF output files.
    #[clap(
        short = 'w',
        long = "overwrite",
        help = "Overwrite existing GFF output file"
    )]
    pub overwrite: bool,

    /// Value written to the GFF "source" column.
    #[clap(
        short = 's',
        long = "source",
        help = "The GFF 'source' field",
        value_name = "SOURCE",
        default_value = DEFAULT_SOURCE
    )]
    pub source: String,

    /// Number of threads to use; default is the number of logical CPUs.
    #[clap(
        short = 't',
        long,
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,

    /// Only log warnings and errors.
    #[clap(short = 'q', long = "quiet", help = "Only report warnings and errors")]
    pub quiet: bool,
}

impl Args {
    /// Checks all the arguments for validity using validate_args()
    pub fn check(&self) -> Result<(), ArgError> {
        self.validate_args()
    }

    /// At least one input must be given; existence is checked per file later.
    fn check_inputs(&self) -> Result<(), ArgError> {
        if self.bedfiles.is_empty() {
            Err(ArgError::NoInputs)
        } else {
            Ok(())
        }
    }

    /// The source ends up in a tab-separated column, so it must be a single
    /// non-empty token on one line.
    fn check_source(&self) -> Result<(), ArgError> {
        if self.source.is_empty() {
            let err = "source must not be empty".to_string();
            Err(ArgError::InvalidSource(err))
        } else if self.source.contains(['\t', '\n', '\r']) {
            let err = format!("source {:?} contains tabs or line breaks", self.source);
            Err(ArgError::InvalidSource(err))
        } else {
            Ok(())
        }
    }

    /// Checks the number of threads for validity. The number of threads must be greater than 0.
    fn check_threads(&self) -> Result<(), ArgError> {
        if self.threads == 0 {
            let err = "number of threads must be greater than 0".to_string();
            Err(ArgError::InvalidThreads(err))
        } else {
            Ok(())
        }
    }

    /// Validates all the arguments
    fn validate_args(&self) -> Result<(), ArgError> {
        self.check_inputs()?;
        self.check_source()?;
        self.check_threads()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ArgError {
    /// No BED file was given.
    #[error("at least one BED file is required")]
    NoInputs,

    /// The GFF source label cannot be written as a column.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The number of threads is invalid.
    #[error("Invalid number of threads: {0}")]
    InvalidThreads(String),
}
