//! Genomic intervals read from BED lines and rendered as GFF2 records.
//!
//! BED coordinates are 0-based and half-open, GFF coordinates are 1-based
//! and closed. A BED interval `[start, end)` becomes the GFF interval
//! `[start + 1, end]`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default value of the GFF `source` column.
pub const DEFAULT_SOURCE: &str = "conv";

/// Value of the GFF `feature` column for every converted interval.
pub const FEATURE_TYPE: &str = "region";

/// Placeholder for empty GFF/BED columns.
const MISSING: &str = ".";

/// Minimum number of BED columns (chrom, start, end).
const MIN_BED_FIELDS: usize = 3;

/// Reasons a data-looking BED line could not be turned into a [`Region`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// Fewer than chrom, start and end were found.
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    /// Start or end is not a non-negative integer.
    #[error("invalid {field} coordinate: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
    /// The interval does not cover any base.
    #[error("empty interval: start {start} is not before end {end}")]
    EmptyInterval { start: u64, end: u64 },
    /// Score is neither a finite number nor `.`.
    #[error("invalid score: {0:?}")]
    InvalidScore(String),
    /// Strand is not one of `+`, `-` or `.`.
    #[error("invalid strand: {0:?}")]
    InvalidStrand(String),
    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Orientation of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

impl FromStr for Strand {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            MISSING => Ok(Strand::Unknown),
            other => Err(RegionError::InvalidStrand(other.to_string())),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unknown => MISSING,
        };
        f.write_str(s)
    }
}

/// Outcome of reading one line of a BED file.
#[derive(Debug, Clone, PartialEq)]
pub enum BedLine {
    /// A valid interval.
    Parsed(Region),
    /// Blank, comment, `track` or `browser` line.
    NotData,
    /// An attempted data line that breaks the BED rules.
    Malformed(RegionError),
}

impl BedLine {
    /// Classifies a single line (without its line terminator).
    ///
    /// Blank lines, lines starting with `#`, and `track`/`browser` headers
    /// are [`BedLine::NotData`]. Every other line is treated as data and
    /// either parses or is reported as [`BedLine::Malformed`].
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use bed2gff::region::BedLine;
    ///
    /// assert_eq!(BedLine::classify("track name=demo"), BedLine::NotData);
    /// assert!(matches!(BedLine::classify("chr1\t20\t10"), BedLine::Malformed(_)));
    /// ```
    pub fn classify(line: &str) -> Self {
        Self::classify_bytes(line.as_bytes())
    }

    /// Classifies a raw line (without its line terminator).
    ///
    /// Non-data lines are recognized on bytes, so a comment in another
    /// encoding is still [`BedLine::NotData`]. A data line that is not valid
    /// UTF-8 is [`BedLine::Malformed`].
    pub fn classify_bytes(line: &[u8]) -> Self {
        if is_non_data(line) {
            return BedLine::NotData;
        }

        let parsed = std::str::from_utf8(line)
            .map_err(|_| RegionError::InvalidUtf8)
            .and_then(Region::from_bed);
        match parsed {
            Ok(region) => BedLine::Parsed(region),
            Err(err) => BedLine::Malformed(err),
        }
    }
}

/// Returns true for lines that carry no interval.
fn is_non_data(line: &[u8]) -> bool {
    let Some(first) = line.iter().position(|b| !b.is_ascii_whitespace()) else {
        return true;
    };
    let trimmed = &line[first..];
    if trimmed[0] == b'#' {
        return true;
    }

    matches!(
        trimmed.split(|b| b.is_ascii_whitespace()).next(),
        Some(b"track") | Some(b"browser")
    )
}

/// A single genomic interval taken from a BED line.
///
/// Values are only built by a successful parse, so `start < end` always
/// holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    chromosome: String,
    start: u64,
    end: u64,
    name: Option<String>,
    score: Option<f64>,
    strand: Strand,
}

impl Region {
    /// Parses a BED line: `chrom start end [name [score [strand]]]`.
    ///
    /// Fields may be separated by tabs or any other whitespace. Columns past
    /// the strand are ignored. Nothing is constructed unless every field is
    /// valid.
    ///
    /// # Errors
    ///
    /// Returns a [`RegionError`] describing the first rule the line breaks.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use bed2gff::Region;
    ///
    /// let region = Region::from_bed("chr1\t10\t20\tfeatureA\t100\t+")?;
    /// assert_eq!(region.gff_start(), 11);
    /// assert_eq!(region.gff_end(), 20);
    /// ```
    pub fn from_bed(line: &str) -> Result<Self, RegionError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_BED_FIELDS {
            return Err(RegionError::TooFewFields(fields.len()));
        }

        let start = parse_coordinate(fields[1], "start")?;
        let end = parse_coordinate(fields[2], "end")?;
        if start >= end {
            return Err(RegionError::EmptyInterval { start, end });
        }

        let name = fields
            .get(3)
            .filter(|name| **name != MISSING)
            .map(|name| name.to_string());
        let score = match fields.get(4) {
            Some(score) => parse_score(score)?,
            None => None,
        };
        let strand = match fields.get(5) {
            Some(strand) => strand.parse()?,
            None => Strand::Unknown,
        };

        Ok(Self {
            chromosome: fields[0].to_string(),
            start,
            end,
            name,
            score,
            strand,
        })
    }

    /// Renders the interval as a tab-separated GFF2 line without a newline.
    ///
    /// Columns: seqname, source, feature, start, end, score, strand, frame,
    /// attributes. Missing score, strand and name render as `.`.
    pub fn to_gff(&self, source: &str) -> String {
        let score = self
            .score
            .map(|score| score.to_string())
            .unwrap_or_else(|| MISSING.to_string());

        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chromosome,
            source,
            FEATURE_TYPE,
            self.gff_start(),
            self.gff_end(),
            score,
            self.strand,
            MISSING,
            self.name.as_deref().unwrap_or(MISSING),
        )
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// 0-based inclusive start.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// 0-based exclusive end.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// 1-based inclusive start.
    pub fn gff_start(&self) -> u64 {
        self.start + 1
    }

    /// 1-based inclusive end.
    pub fn gff_end(&self) -> u64 {
        self.end
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::from_bed(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_gff(DEFAULT_SOURCE))
    }
}

fn parse_coordinate(value: &str, field: &'static str) -> Result<u64, RegionError> {
    value
        .parse::<u64>()
        .map_err(|_| RegionError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

fn parse_score(value: &str) -> Result<Option<f64>, RegionError> {
    if value == MISSING {
        return Ok(None);
    }

    match value.parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(Some(score)),
        _ => Err(RegionError::InvalidScore(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bed6_line() {
        let region = Region::from_bed("chr1\t10\t20\tfeatureA\t100\t+").unwrap();
        assert_eq!(
            region.to_gff("conv"),
            "chr1\tconv\tregion\t11\t20\t100\t+\t.\tfeatureA"
        );
    }

    #[test]
    fn shifts_start_only() {
        for (start, end) in [(0u64, 1u64), (99, 200), (1_000_000, 1_000_001)] {
            let line = format!("chrX\t{start}\t{end}");
            let region = Region::from_bed(&line).unwrap();
            let gff = region.to_gff("src");
            let fields: Vec<&str> = gff.split('\t').collect();
            assert_eq!(fields[3], (start + 1).to_string());
            assert_eq!(fields[4], end.to_string());
        }
    }

    #[test]
    fn bed3_uses_placeholders() {
        let region = Region::from_bed("chr2 5 15").unwrap();
        assert_eq!(region.name(), None);
        assert_eq!(region.score(), None);
        assert_eq!(region.strand(), Strand::Unknown);
        assert_eq!(region.to_gff("conv"), "chr2\tconv\tregion\t6\t15\t.\t.\t.\t.");
    }

    #[test]
    fn dotted_optional_fields_are_missing() {
        let region = Region::from_bed("chr1\t0\t5\t.\t.\t.").unwrap();
        assert_eq!(region.name(), None);
        assert_eq!(region.score(), None);
        assert_eq!(region.strand(), Strand::Unknown);
    }

    #[test]
    fn fractional_score_is_kept() {
        let region = Region::from_bed("chr1\t0\t5\tx\t12.5\t-").unwrap();
        assert_eq!(region.to_gff("conv"), "chr1\tconv\tregion\t1\t5\t12.5\t-\t.\tx");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let region = Region::from_bed("chr1\t0\t5\tx\t0\t+\t1\t4\t0,0,0").unwrap();
        assert_eq!(region.end(), 5);
        assert_eq!(region.strand(), Strand::Forward);
    }

    #[test]
    fn rejects_reversed_and_empty_intervals() {
        assert_eq!(
            Region::from_bed("chr1\t20\t10"),
            Err(RegionError::EmptyInterval { start: 20, end: 10 })
        );
        assert_eq!(
            Region::from_bed("chr1\t10\t10"),
            Err(RegionError::EmptyInterval { start: 10, end: 10 })
        );
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(matches!(
            Region::from_bed("chr1\tten\t20"),
            Err(RegionError::InvalidCoordinate { field: "start", .. })
        ));
        assert!(matches!(
            Region::from_bed("chr1\t-1\t20"),
            Err(RegionError::InvalidCoordinate { field: "start", .. })
        ));
        assert!(matches!(
            Region::from_bed("chr1\t1\t2.5"),
            Err(RegionError::InvalidCoordinate { field: "end", .. })
        ));
    }

    #[test]
    fn rejects_bad_score_and_strand() {
        assert_eq!(
            Region::from_bed("chr1\t1\t2\tn\thigh"),
            Err(RegionError::InvalidScore("high".to_string()))
        );
        assert_eq!(
            Region::from_bed("chr1\t1\t2\tn\tNaN"),
            Err(RegionError::InvalidScore("NaN".to_string()))
        );
        assert_eq!(
            Region::from_bed("chr1\t1\t2\tn\t0\tx"),
            Err(RegionError::InvalidStrand("x".to_string()))
        );
    }

    #[test]
    fn classifies_non_data_lines() {
        for line in ["", "   ", "# comment", "  #indented", "track name=demo", "browser position chr1"] {
            assert_eq!(BedLine::classify(line), BedLine::NotData, "{line:?}");
        }
    }

    #[test]
    fn classifies_undecodable_lines() {
        assert_eq!(BedLine::classify_bytes(b"# caf\xe9 peaks"), BedLine::NotData);
        assert_eq!(BedLine::classify_bytes(b"track name=caf\xe9"), BedLine::NotData);
        assert_eq!(
            BedLine::classify_bytes(b"chr1\t10\t20\tcaf\xe9"),
            BedLine::Malformed(RegionError::InvalidUtf8)
        );
    }

    #[test]
    fn classifies_short_lines_as_malformed() {
        assert_eq!(
            BedLine::classify("chr1\t10"),
            BedLine::Malformed(RegionError::TooFewFields(2))
        );
    }

    #[test]
    fn classifies_data_lines() {
        match BedLine::classify("chr3\t1\t2\tgene") {
            BedLine::Parsed(region) => assert_eq!(region.name(), Some("gene")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_parse_leaves_previous_region_intact() {
        let mut current: Option<Region> = None;
        if let Ok(region) = "chr1\t1\t9\ta".parse::<Region>() {
            current = Some(region);
        }
        if let Ok(region) = "chr1\t9\t1\tb".parse::<Region>() {
            current = Some(region);
        }

        let region = current.unwrap();
        assert_eq!(region.name(), Some("a"));
        assert_eq!((region.start(), region.end()), (1, 9));
    }

    #[test]
    fn rendering_is_deterministic() {
        let line = "chr7\t100\t250\tpeak\t7\t-";
        let first = Region::from_bed(line).unwrap().to_gff("conv");
        let second = Region::from_bed(line).unwrap().to_gff("conv");
        assert_eq!(first, second);
    }

    #[test]
    fn display_uses_default_source() {
        let region = Region::from_bed("chr1\t0\t3").unwrap();
        assert_eq!(region.to_string(), region.to_gff(DEFAULT_SOURCE));
    }
}
