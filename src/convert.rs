use crate::config::{Config, DATE_FORMAT};
use crate::error::{Bed2GffError, Result};
use crate::memory::{max_mem_usage_mb, mem_delta_mb};
use crate::paths::{gff_path, normalized};
use crate::region::BedLine;
use chrono::NaiveDate;
use hashbrown::HashMap;
use rayon::prelude::*;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// First line of every output file.
pub const GFF_VERSION_HEADER: &str = "##gff-version 2";

/// Prefix of the comment that replaces a malformed BED line.
pub const MALFORMED_PREFIX: &str = "### Malformed line: ";

/// Per-file line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Lines rendered as GFF records.
    pub converted: usize,
    /// Header, comment and blank lines copied verbatim.
    pub passed: usize,
    /// Data lines replaced by a malformed-line comment.
    pub malformed: usize,
}

/// What happened to one input file.
#[derive(Debug)]
pub enum FileStatus {
    /// The output was written.
    Written {
        lines: LineStats,
        /// An existing output was replaced.
        overwritten: bool,
    },
    /// The input does not exist.
    NotFound,
    /// The output exists and overwriting was not requested.
    Skipped,
    /// An earlier input of the same run already writes this output.
    Duplicate { claimed_by: PathBuf },
    /// The conversion hit a filesystem error.
    Failed(Bed2GffError),
}

/// Outcome of one input file, in the order the inputs were given.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: FileStatus,
}

impl FileReport {
    /// Returns true if the file could not be converted because of an I/O fault.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_))
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self.output.display();
        match &self.status {
            FileStatus::Written { lines, .. } => write!(
                f,
                "Wrote {} ({} converted, {} passed through, {} malformed)",
                output, lines.converted, lines.passed, lines.malformed
            ),
            FileStatus::NotFound => write!(f, "Cannot read from {}", self.input.display()),
            FileStatus::Skipped => write!(f, "{} exists, skip", output),
            FileStatus::Duplicate { claimed_by } => write!(
                f,
                "{} is already written from {}, skip",
                output,
                claimed_by.display()
            ),
            FileStatus::Failed(err) => {
                write!(f, "Cannot convert {}: {}", self.input.display(), err)
            }
        }
    }
}

/// Summary of a conversion run.
#[derive(Debug)]
pub struct RunStats {
    /// One report per input, in input order.
    pub reports: Vec<FileReport>,
    /// Wall clock time spent in the conversion.
    pub elapsed: Duration,
    /// Delta in maximum RSS memory usage, in MB.
    pub mem_delta_mb: f64,
}

impl RunStats {
    /// Number of inputs that failed with an I/O error.
    pub fn failures(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of outputs written.
    pub fn written(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, FileStatus::Written { .. }))
            .count()
    }
}

/// Work decided for one input before any file is touched.
#[derive(Debug)]
enum Job {
    Convert { input: PathBuf, output: PathBuf },
    Missing { input: PathBuf, output: PathBuf },
    Duplicate {
        input: PathBuf,
        output: PathBuf,
        claimed_by: PathBuf,
    },
}

/// Runs a conversion with the provided configuration.
///
/// Every input is converted into a sibling `.gff` file. Missing inputs,
/// existing outputs and I/O failures are reported per file and never stop
/// the rest of the batch.
///
/// # Arguments
///
/// * `config` - Configuration containing all conversion parameters
///
/// # Returns
///
/// Returns RunStats with one report per input plus timing and memory usage.
///
/// # Errors
///
/// Returns an error only if the thread pool cannot be built.
///
/// # Example
///
/// ```rust, ignore
/// use bed2gff::{run, Config};
///
/// let config = Config::new(["peaks.bed", "genes.bed"]);
/// let stats = run(&config)?;
/// for report in &stats.reports {
///     println!("{}", report);
/// }
/// ```
pub fn run(config: &Config) -> Result<RunStats> {
    let start = Instant::now();
    let start_mem = max_mem_usage_mb();

    let jobs = plan_jobs(&config.inputs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let reports = pool.install(|| {
        jobs.into_par_iter()
            .map(|job| process_job(job, config))
            .collect::<Vec<_>>()
    });

    Ok(RunStats {
        reports,
        elapsed: start.elapsed(),
        mem_delta_mb: mem_delta_mb(start_mem, max_mem_usage_mb()),
    })
}

/// Derives output paths and makes sure no two jobs write the same file.
///
/// Missing inputs do not claim their output path. Outputs are compared
/// through their canonical parent directory, so `a.gff` and `sub/../a.gff`
/// are the same claim.
///
/// # Arguments
///
/// * `inputs` - BED inputs in the order they were given
///
/// # Returns
///
/// Returns one job per input, in input order.
fn plan_jobs(inputs: &[PathBuf]) -> Vec<Job> {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(inputs.len());

    inputs
        .iter()
        .map(|input| {
            let input = input.clone();
            let output = gff_path(&input);

            if !input.exists() {
                return Job::Missing { input, output };
            }

            let key = normalized(&output);

            // `x.gff` maps onto itself; overwriting would truncate the input.
            if key == normalized(&input) {
                return Job::Duplicate {
                    claimed_by: input.clone(),
                    input,
                    output,
                };
            }

            if let Some(first) = claimed.get(&key) {
                return Job::Duplicate {
                    claimed_by: first.clone(),
                    input,
                    output,
                };
            }

            claimed.insert(key, input.clone());
            Job::Convert { input, output }
        })
        .collect()
}

/// Carries out one job and reports its outcome.
///
/// # Arguments
///
/// * `job` - Planned work for one input
/// * `config` - Main conversion configuration
///
/// # Returns
///
/// Returns the FileReport for the job's input.
fn process_job(job: Job, config: &Config) -> FileReport {
    match job {
        Job::Missing { input, output } => {
            log::info!("Processing {}", input.display());
            log::warn!("Cannot read from {}", input.display());
            FileReport {
                input,
                output,
                status: FileStatus::NotFound,
            }
        }
        Job::Duplicate {
            input,
            output,
            claimed_by,
        } => {
            log::info!("Processing {}", input.display());
            log::warn!(
                "{} is already written from {}, skip",
                output.display(),
                claimed_by.display()
            );
            FileReport {
                input,
                output,
                status: FileStatus::Duplicate { claimed_by },
            }
        }
        Job::Convert { input, output } => {
            let status = process_file(&input, &output, config);
            FileReport {
                input,
                output,
                status,
            }
        }
    }
}

/// Applies the overwrite policy and converts one existing input.
///
/// # Arguments
///
/// * `input` - Path to the BED input
/// * `output` - Path to the GFF output
/// * `config` - Main conversion configuration
///
/// # Returns
///
/// Returns Written, Skipped or Failed.
fn process_file(input: &Path, output: &Path, config: &Config) -> FileStatus {
    log::info!("Processing {}", input.display());

    let overwritten = output.exists();
    if overwritten {
        if config.overwrite {
            log::info!("{} will be overwritten", output.display());
        } else {
            log::warn!("{} exists, skip", output.display());
            return FileStatus::Skipped;
        }
    }

    match convert_file(input, output, &config.source, config.date) {
        Ok(lines) => {
            log::info!("Wrote {}", output.display());
            if lines.malformed > 0 {
                log::info!(
                    "{}: {} malformed line(s)",
                    input.display(),
                    lines.malformed
                );
            }
            FileStatus::Written { lines, overwritten }
        }
        Err(err) => {
            log::error!("Cannot convert {}: {}", input.display(), err);
            FileStatus::Failed(err)
        }
    }
}

/// Converts one BED file into one GFF file.
///
/// The output is created (or truncated) only after the input has been
/// opened, and removed again if the conversion fails halfway. Malformed
/// lines are also written to stderr, prefixed with `input:line:`.
///
/// # Arguments
///
/// * `input` - Path to the BED input
/// * `output` - Path to the GFF output, replaced if it exists
/// * `source` - GFF `source` column
/// * `date` - Date written to the `##date` header
///
/// # Returns
///
/// Returns the line counts of the converted file.
///
/// # Errors
///
/// Returns an error if either file cannot be opened, read or written.
///
/// # Example
///
/// ```rust, ignore
/// use bed2gff::convert::convert_file;
/// use chrono::NaiveDate;
/// use std::path::Path;
///
/// let date = NaiveDate::from_ymd_opt(2020, 11, 27).unwrap();
/// let lines = convert_file(Path::new("peaks.bed"), Path::new("peaks.gff"), "conv", date)?;
/// println!("{} records", lines.converted);
/// ```
pub fn convert_file(
    input: &Path,
    output: &Path,
    source: &str,
    date: NaiveDate,
) -> Result<LineStats> {
    let reader = BufReader::new(File::open(input)?);
    let file = File::create(output)?;

    let origin = input.display().to_string();
    let converted = write_gff(reader, file, &origin, source, date);
    if converted.is_err() {
        if let Err(err) = std::fs::remove_file(output) {
            log::debug!("could not remove partial {}: {}", output.display(), err);
        }
    }
    converted
}

/// Streams `reader` through [`convert_lines`] into a buffered `file`.
fn write_gff<R: BufRead>(
    reader: R,
    file: File,
    origin: &str,
    source: &str,
    date: NaiveDate,
) -> Result<LineStats> {
    let mut writer = BufWriter::with_capacity(128 * 1024, file);
    let mut stderr = std::io::stderr();
    let lines = convert_lines(reader, &mut writer, &mut stderr, origin, source, date)?;
    writer.flush()?;
    Ok(lines)
}

/// Converts BED text into GFF text, line by line.
///
/// Writes the two header lines, then exactly one output line per input
/// line: a GFF record, the untouched non-data line, or a malformed-line
/// comment. Lines are read as bytes, so non-data lines are copied as-is
/// whatever their encoding. Malformed-line comments are also written to
/// `diagnostics` as `origin:line: ### Malformed line: ...`.
///
/// # Arguments
///
/// * `reader` - BED input
/// * `writer` - GFF output
/// * `diagnostics` - Channel receiving malformed-line messages
/// * `origin` - Name of the input in diagnostics and logs
/// * `source` - GFF `source` column
/// * `date` - Date written to the `##date` header
///
/// # Returns
///
/// Returns the line counts.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
///
/// # Example
///
/// ```rust, ignore
/// use bed2gff::convert::convert_lines;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2020, 11, 27).unwrap();
/// let mut gff = Vec::new();
/// let mut diag = Vec::new();
/// convert_lines("chr1\t10\t20\n".as_bytes(), &mut gff, &mut diag, "peaks.bed", "conv", date)?;
/// ```
pub fn convert_lines<R, W, D>(
    mut reader: R,
    writer: &mut W,
    diagnostics: &mut D,
    origin: &str,
    source: &str,
    date: NaiveDate,
) -> Result<LineStats>
where
    R: BufRead,
    W: Write,
    D: Write,
{
    write_header(writer, date)?;

    let mut stats = LineStats::default();
    let mut buf = Vec::with_capacity(256);
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = strip_terminator(&buf);

        match BedLine::classify_bytes(line) {
            BedLine::Parsed(region) => {
                writeln!(writer, "{}", region.to_gff(source))?;
                stats.converted += 1;
            }
            BedLine::NotData => {
                writer.write_all(line)?;
                writer.write_all(b"\n")?;
                stats.passed += 1;
            }
            BedLine::Malformed(err) => {
                log::warn!("{}:{}: {}", origin, line_no, err);
                let bad = format!("{}{}", MALFORMED_PREFIX, String::from_utf8_lossy(line));
                writeln!(diagnostics, "{}:{}: {}", origin, line_no, bad)?;
                writeln!(writer, "{}", bad)?;
                stats.malformed += 1;
            }
        }
    }

    Ok(stats)
}

/// Drops a trailing `\n` or `\r\n`.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Writes the `##gff-version` and `##date` header lines.
fn write_header<W: Write>(writer: &mut W, date: NaiveDate) -> Result<()> {
    writeln!(writer, "{}", GFF_VERSION_HEADER)?;
    writeln!(writer, "##date {}", date.format(DATE_FORMAT))?;
    Ok(())
}
