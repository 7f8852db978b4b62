use crate::cli::Args;
use crate::region::DEFAULT_SOURCE;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// ISO 8601 calendar date used in the `##date` header.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalized configuration for a conversion run.
#[derive(Clone, Debug)]
pub struct Config {
    /// BED inputs, converted in this order.
    pub inputs: Vec<PathBuf>,
    /// Replace GFF outputs that already exist.
    pub overwrite: bool,
    /// GFF `source` column.
    pub source: String,
    /// Number of threads to use.
    pub threads: usize,
    /// Date written to the `##date` header of every output.
    pub date: NaiveDate,
}

impl Config {
    /// Builds a conversion config from CLI arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - Command-line arguments to convert into a configuration
    ///
    /// # Returns
    ///
    /// Returns a new Config with today's local date as the header date.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use bed2gff::{Args, Config};
    /// use clap::Parser;
    ///
    /// let args = Args::parse_from(["bed2gff", "-s", "macs2", "peaks.bed"]);
    /// let config = Config::from_args(&args);
    /// assert_eq!(config.source, "macs2");
    /// ```
    pub fn from_args(args: &Args) -> Self {
        Self {
            inputs: args.bedfiles.clone(),
            overwrite: args.overwrite,
            source: args.source.clone(),
            threads: args.threads,
            date: Local::now().date_naive(),
        }
    }

    /// Builds a config with the default source, one thread and today's date.
    pub fn new<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            overwrite: false,
            source: DEFAULT_SOURCE.to_string(),
            threads: 1,
            date: Local::now().date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn assert_today(date: NaiveDate, before: NaiveDate) {
        let after = Local::now().date_naive();
        assert!(date == before || date == after, "{} is not today", date);
    }

    #[test]
    fn new_uses_todays_date() {
        let before = Local::now().date_naive();
        let config = Config::new(["a.bed"]);
        assert_today(config.date, before);

        let stamp = config.date.format(DATE_FORMAT).to_string();
        assert_eq!(stamp.len(), 10);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[7..8], "-");
        assert_eq!(NaiveDate::parse_from_str(&stamp, DATE_FORMAT).unwrap(), config.date);
    }

    #[test]
    fn from_args_uses_todays_date() {
        let before = Local::now().date_naive();
        let args = Args::parse_from(["bed2gff", "-w", "-s", "macs2", "a.bed"]);
        let config = Config::from_args(&args);
        assert_today(config.date, before);
        assert!(config.overwrite);
        assert_eq!(config.source, "macs2");
    }
}
