//! # bed2gff
//!
//! BED-to-GFF2 converter, one annotated GFF per input file.
//!
//! ## Usage
//!
//! ```bash
//! bed2gff [OPTIONS] <BEDFILE>...
//!
//! Arguments:
//!   <BEDFILE>...               One or more BED files to convert
//!
//! Options:
//!   -w, --overwrite            Overwrite existing GFF output file
//!   -s, --source <SOURCE>      The GFF 'source' field [default: conv]
//!   -t, --threads <THREADS>    Number of threads (default: CPU count)
//!   -q, --quiet                Only report warnings and errors
//!   -h, --help                 Print help
//!   -V, --version              Print version
//! ```
//!
//! ## Examples
//!
//! ### Convert a single file
//!
//! ```bash
//! bed2gff peaks.bed
//! ```
//!
//! ### Convert several files, replacing old outputs
//!
//! ```bash
//! bed2gff -w -s macs2 rep1.bed rep2.bed
//! ```
use bed2gff::{run, Args, Config, FileStatus};
use clap::Parser;
use colored::Colorize;
use log::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.quiet { Level::Warn } else { Level::Info };
    simple_logger::init_with_level(level)?;
    log::debug!("{:?}", args);

    args.check()?;

    let config = Config::from_args(&args);
    log::info!("Using {} threads", config.threads);

    let stats = run(&config)?;
    for report in &stats.reports {
        let tag = match report.status {
            FileStatus::Written {
                overwritten: true, ..
            } => "overwritten".yellow(),
            FileStatus::Written { .. } => "written".green(),
            FileStatus::NotFound => "missing".red(),
            FileStatus::Failed(_) => "failed".red(),
            FileStatus::Skipped | FileStatus::Duplicate { .. } => "skipped".yellow(),
        };
        println!("[{}] {}", tag.bold(), report);
    }

    log::info!(
        "{} of {} file(s) written",
        stats.written(),
        stats.reports.len()
    );
    log::info!("Elapsed: {:.4?} secs", stats.elapsed.as_secs_f32());
    log::info!("Memory: {:.2} MB", stats.mem_delta_mb);

    if stats.failures() > 0 {
        return Err(format!("{} file(s) could not be converted", stats.failures()).into());
    }

    Ok(())
}
