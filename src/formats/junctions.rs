//! Splice junction table adapter
//!
//! Delimited text with a header row. Required columns are looked up by
//! name before any row is read; a missing column is a configuration error.

use crate::core::io::SmartReader;
use crate::core::{
    ConfigError, FormatError, Junction, JunctionTable, Result, Strand,
};
use std::io::BufRead;
use std::path::Path;

/// Default column names
pub const JUNCTION_ID: &str = "junction_id";
pub const EXON_START: &str = "exon_start";
pub const EXON_STOP: &str = "exon_stop";
pub const CHROM: &str = "chrom";
pub const STRAND: &str = "strand";

/// Names of the required junction table columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionColumns {
    pub junction_id: String,
    pub exon_start: String,
    pub exon_stop: String,
    pub chrom: String,
    pub strand: String,
}

impl Default for JunctionColumns {
    fn default() -> Self {
        Self {
            junction_id: JUNCTION_ID.to_string(),
            exon_start: EXON_START.to_string(),
            exon_stop: EXON_STOP.to_string(),
            chrom: CHROM.to_string(),
            strand: STRAND.to_string(),
        }
    }
}

/// Column indices for the required fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionColumnIndices {
    pub junction_id: usize,
    pub exon_start: usize,
    pub exon_stop: usize,
    pub chrom: usize,
    pub strand: usize,
}

impl JunctionColumnIndices {
    /// Parse column indices from the header line
    pub fn from_header(
        header: &str,
        delimiter: char,
        columns: &JunctionColumns,
    ) -> std::result::Result<Self, ConfigError> {
        let names: Vec<&str> = header.split(delimiter).map(unquote).collect();

        let find_col = |name: &str| -> std::result::Result<usize, ConfigError> {
            names
                .iter()
                .position(|&c| c == name)
                .ok_or_else(|| ConfigError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            junction_id: find_col(&columns.junction_id)?,
            exon_start: find_col(&columns.exon_start)?,
            exon_stop: find_col(&columns.exon_stop)?,
            chrom: find_col(&columns.chrom)?,
            strand: find_col(&columns.strand)?,
        })
    }

    fn max_index(&self) -> usize {
        [
            self.junction_id,
            self.exon_start,
            self.exon_stop,
            self.chrom,
            self.strand,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// Parse an exon boundary cell; empty and NA-like cells are absent
fn parse_coordinate(value: &str) -> Option<std::result::Result<u64, ()>> {
    match value {
        "" | "NA" | "NaN" | "nan" | "None" | "." => None,
        _ => Some(value.parse::<u64>().or_else(|_| {
            // Integer columns with missing values are often written as floats
            match value.parse::<f64>() {
                Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
                _ => Err(()),
            }
        })),
    }
}

/// Field delimiter for a junction table path (`,` for .csv, tab otherwise)
pub fn delimiter_for(path: &Path) -> char {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let name = name
        .trim_end_matches(".gz")
        .trim_end_matches(".bz2");
    if name.ends_with(".csv") {
        ','
    } else {
        '\t'
    }
}

/// Read a junction table from delimited text
pub fn read_junction_table<R: BufRead>(
    reader: R,
    delimiter: char,
    columns: &JunctionColumns,
) -> Result<JunctionTable> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(ConfigError::EmptyTable.into()),
        }
    };
    let indices = JunctionColumnIndices::from_header(&header, delimiter, columns)?;
    let required = indices.max_index() + 1;

    let mut junctions = Vec::new();
    for (i, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = i + 1;
        let fields: Vec<&str> = line.split(delimiter).map(unquote).collect();
        if fields.len() < required {
            return Err(FormatError::InvalidJunctionRow {
                line: line_number,
                message: format!("expected at least {} fields, found {}", required, fields.len()),
            }
            .into());
        }

        let coordinate = |idx: usize, name: &str| -> std::result::Result<Option<u64>, FormatError> {
            parse_coordinate(fields[idx])
                .transpose()
                .map_err(|_| FormatError::InvalidJunctionRow {
                    line: line_number,
                    message: format!("invalid {} '{}'", name, fields[idx]),
                })
        };

        junctions.push(Junction::new(
            fields[indices.junction_id],
            fields[indices.chrom],
            Strand::normalize(fields[indices.strand]),
            coordinate(indices.exon_start, &columns.exon_start)?,
            coordinate(indices.exon_stop, &columns.exon_stop)?,
        ));
    }

    let table = JunctionTable::new(junctions)?;
    log::debug!("Read {} junctions", table.len());
    Ok(table)
}

/// Load a junction table file (optionally gzip/bzip2 compressed)
pub fn load_junction_table<P: AsRef<Path>>(path: P, columns: &JunctionColumns) -> Result<JunctionTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FormatError::FileNotFound(path.to_path_buf()).into());
    }
    let reader = SmartReader::open(path)?;
    read_junction_table(reader, delimiter_for(path), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SpliceAdjacencyError;

    const TABLE: &str = "\
junction_id\tchrom\tstrand\texon_start\texon_stop\tsample_count
junction:chr1:300-400:+\tchr1\t+\t401\t299\t3
junction:chr1:100-200:+\tchr1\t+\t201\t99\t5
";

    #[test]
    fn test_read_sorted_by_id() {
        let table = read_junction_table(TABLE.as_bytes(), '\t', &JunctionColumns::default()).unwrap();
        assert_eq!(table.len(), 2);
        let first = table.iter().next().unwrap();
        assert_eq!(first.id, "junction:chr1:100-200:+");
        assert_eq!(first.exon_start, Some(201));
        assert_eq!(first.exon_stop, Some(99));
        assert_eq!(first.strand, Strand::Plus);
    }

    #[test]
    fn test_missing_column_is_config_error() {
        let data = "junction_id\tchrom\tstrand\texon_start\njunction:chr1:1-2:+\tchr1\t+\t3\n";
        let err = read_junction_table(data.as_bytes(), '\t', &JunctionColumns::default()).unwrap_err();
        match err {
            SpliceAdjacencyError::Config(ConfigError::MissingColumn { column }) => {
                assert_eq!(column, "exon_stop")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_column_names_csv() {
        let data = "\"id\",\"seqname\",\"str\",\"upstream_exon_stop\",\"downstream_exon_start\"\n\
                    \"junction:chr2:10-20:-\",\"chr2\",\"-\",\"9\",\"21.0\"\n";
        let columns = JunctionColumns {
            junction_id: "id".into(),
            exon_start: "downstream_exon_start".into(),
            exon_stop: "upstream_exon_stop".into(),
            chrom: "seqname".into(),
            strand: "str".into(),
        };
        let table = read_junction_table(data.as_bytes(), ',', &columns).unwrap();
        let j = table.get("junction:chr2:10-20:-").unwrap();
        assert_eq!(j.chrom, "chr2");
        assert_eq!(j.strand, Strand::Minus);
        assert_eq!(j.exon_start, Some(21));
        assert_eq!(j.exon_stop, Some(9));
    }

    #[test]
    fn test_missing_coordinates_are_absent() {
        let data = "junction_id\tchrom\tstrand\texon_start\texon_stop\n\
                    junction:chr1:1-2:+\tchr1\t+\tNA\t\n";
        let table = read_junction_table(data.as_bytes(), '\t', &JunctionColumns::default()).unwrap();
        let j = table.iter().next().unwrap();
        assert_eq!(j.exon_start, None);
        assert_eq!(j.exon_stop, None);
    }

    #[test]
    fn test_invalid_coordinate_names_line() {
        let data = "junction_id\tchrom\tstrand\texon_start\texon_stop\n\
                    junction:chr1:1-2:+\tchr1\t+\tabc\t5\n";
        let err = read_junction_table(data.as_bytes(), '\t', &JunctionColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            SpliceAdjacencyError::Format(FormatError::InvalidJunctionRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let err = read_junction_table("".as_bytes(), '\t', &JunctionColumns::default()).unwrap_err();
        assert!(matches!(err, SpliceAdjacencyError::Config(ConfigError::EmptyTable)));
    }

    #[test]
    fn test_unknown_strand_normalized() {
        let data = "junction_id\tchrom\tstrand\texon_start\texon_stop\n\
                    junction:chr1:1-2\tchr1\tNone\t3\t0\n";
        let table = read_junction_table(data.as_bytes(), '\t', &JunctionColumns::default()).unwrap();
        assert_eq!(table.iter().next().unwrap().strand, Strand::Unstranded);
    }

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for(Path::new("sj.csv")), ',');
        assert_eq!(delimiter_for(Path::new("sj.CSV.gz")), ',');
        assert_eq!(delimiter_for(Path::new("sj.tsv")), '\t');
        assert_eq!(delimiter_for(Path::new("sj_metadata")), '\t');
    }
}
