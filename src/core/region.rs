//! Genomic regions and strands
//!
//! A `Region` is the interval encoded in a junction (or exon) identifier,
//! e.g. `junction:chr1:100-200:+`. Coordinates are 1-based and closed.

use crate::core::error::RegionParseError;
use std::fmt;
use std::str::FromStr;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum Strand {
    Plus,
    Minus,
    #[default]
    Unstranded,
}

impl Strand {
    /// Parse strand from a free-form token
    ///
    /// Anything other than `+` or `-` is unstranded.
    ///
    /// # Examples
    /// ```
    /// use splice_adjacency::core::Strand;
    /// assert_eq!(Strand::normalize("+"), Strand::Plus);
    /// assert_eq!(Strand::normalize("-"), Strand::Minus);
    /// assert_eq!(Strand::normalize("None"), Strand::Unstranded);
    /// ```
    pub fn normalize(token: &str) -> Self {
        match token.trim() {
            "+" => Strand::Plus,
            "-" => Strand::Minus,
            _ => Strand::Unstranded,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Unstranded => '.',
        }
    }

    pub fn is_stranded(&self) -> bool {
        !matches!(self, Strand::Unstranded)
    }

    /// Strand of an exon sitting between two junctions
    ///
    /// - Plus + Plus = Plus
    /// - Minus + Minus = Minus
    /// - anything else = Unstranded
    pub fn combine_pair(self, other: Strand) -> Strand {
        if self == other {
            self
        } else {
            Strand::Unstranded
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Immutable genomic interval
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    chrom: String,
    start: u64,
    stop: u64,
    strand: Strand,
}

impl Region {
    /// Build a region directly from coordinates
    pub fn new(
        chrom: impl Into<String>,
        start: u64,
        stop: u64,
        strand: Strand,
    ) -> Result<Self, RegionParseError> {
        let chrom = chrom.into();
        if chrom.is_empty() {
            return Err(RegionParseError::new(
                format!("{}:{}-{}", chrom, start, stop),
                "empty chromosome",
            ));
        }
        if start > stop {
            return Err(RegionParseError::new(
                format!("{}:{}-{}", chrom, start, stop),
                format!("start ({}) > stop ({})", start, stop),
            ));
        }
        Ok(Self { chrom, start, stop, strand })
    }

    /// Parse a region from an identifier of the form
    /// `[<type>:]<chrom>:<start>-<stop>[:<strand>]`
    pub fn parse(identifier: &str) -> Result<Self, RegionParseError> {
        let fields: Vec<&str> = identifier.split(':').collect();
        let is_strand = |s: &str| matches!(s, "+" | "-" | ".");

        let (chrom, coords, strand) = match fields.as_slice() {
            [_, chrom, coords, strand] => (*chrom, *coords, Strand::normalize(strand)),
            [chrom, coords, strand] if is_strand(*strand) => {
                (*chrom, *coords, Strand::normalize(strand))
            }
            [_, chrom, coords] => (*chrom, *coords, Strand::Unstranded),
            [chrom, coords] => (*chrom, *coords, Strand::Unstranded),
            _ => {
                return Err(RegionParseError::new(
                    identifier,
                    format!("expected 2 to 4 ':'-separated fields, found {}", fields.len()),
                ))
            }
        };

        if chrom.is_empty() {
            return Err(RegionParseError::new(identifier, "empty chromosome"));
        }

        let (start_str, stop_str) = coords
            .split_once('-')
            .ok_or_else(|| RegionParseError::new(identifier, "coordinates must be <start>-<stop>"))?;

        let start: u64 = start_str
            .trim()
            .parse()
            .map_err(|_| RegionParseError::new(identifier, format!("invalid start '{}'", start_str)))?;
        let stop: u64 = stop_str
            .trim()
            .parse()
            .map_err(|_| RegionParseError::new(identifier, format!("invalid stop '{}'", stop_str)))?;

        if start > stop {
            return Err(RegionParseError::new(
                identifier,
                format!("start ({}) > stop ({})", start, stop),
            ));
        }

        Ok(Self {
            chrom: chrom.to_string(),
            start,
            stop,
            strand,
        })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Interval intersection on the same chromosome, strand ignored
    pub fn overlaps(&self, other: &Region) -> bool {
        self.chrom == other.chrom && self.start <= other.stop && other.start <= self.stop
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::parse(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}:{}", self.chrom, self.start, self.stop, self.strand)
    }
}
