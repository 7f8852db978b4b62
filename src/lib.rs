//! # bed2gff
//!
//! BED-to-GFF2 converter, one annotated GFF per input file.
//!
//! Every BED input `name.ext` is converted into `name.gff`. The output starts
//! with a `##gff-version 2` line and a `##date` line, followed by exactly one
//! line per input line:
//!
//! - valid intervals become GFF2 records with 1-based coordinates,
//! - blank, `#`, `track` and `browser` lines are copied verbatim,
//! - malformed data lines become `### Malformed line: ...` comments and are
//!   also reported on stderr.
//!
//! ## Usage
//!
//! ```rust, ignore
//! use bed2gff::{run, Config};
//!
//! let mut config = Config::new(["peaks.bed"]);
//! config.source = "macs2".to_string();
//! config.overwrite = true;
//!
//! let stats = run(&config)?;
//! for report in &stats.reports {
//!     println!("{}", report);
//! }
//! println!("Conversion completed in {:?}", stats.elapsed);
//! ```
//!
//! ## Single records
//!
//! ```rust, ignore
//! use bed2gff::Region;
//!
//! let region = Region::from_bed("chr1\t10\t20\tfeatureA\t100\t+")?;
//! assert_eq!(
//!     region.to_gff("conv"),
//!     "chr1\tconv\tregion\t11\t20\t100\t+\t.\tfeatureA"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod memory;
pub mod paths;
pub mod region;

pub use cli::{ArgError, Args};
pub use config::Config;
pub use convert::{convert_file, convert_lines, run, FileReport, FileStatus, LineStats, RunStats};
pub use error::{Bed2GffError, Result};
pub use memory::max_mem_usage_mb;
pub use region::{BedLine, Region, RegionError, Strand};
