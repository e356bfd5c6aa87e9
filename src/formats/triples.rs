//! Exon-junction adjacency table output
//!
//! Three tab-separated columns: `exon_id`, `direction`, `junction_id`.

use crate::core::AdjacencyTriple;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header of the adjacency table
pub const HEADER: [&str; 3] = ["exon_id", "direction", "junction_id"];

/// Write the adjacency table with a header line
///
/// Returns the number of triples written.
pub fn write_adjacency_table<W: Write>(triples: &[AdjacencyTriple], writer: &mut W) -> std::io::Result<usize> {
    writeln!(writer, "{}", HEADER.join("\t"))?;
    for triple in triples {
        writeln!(
            writer,
            "{}\t{}\t{}",
            triple.exon_id, triple.direction, triple.junction_id
        )?;
    }
    Ok(triples.len())
}

/// Write the adjacency table to a file
pub fn write_adjacency_file<P: AsRef<Path>>(triples: &[AdjacencyTriple], path: P) -> std::io::Result<usize> {
    let mut writer = BufWriter::with_capacity(128 * 1024, File::create(path.as_ref())?);
    let n = write_adjacency_table(triples, &mut writer)?;
    writer.flush()?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;

    #[test]
    fn test_write_adjacency_table() {
        let triples = vec![
            AdjacencyTriple {
                exon_id: "exon:chr1:201-249:+".into(),
                direction: Direction::Upstream,
                junction_id: "junction:chr1:250-260:+".into(),
            },
            AdjacencyTriple {
                exon_id: "exon:chr1:201-249:+".into(),
                direction: Direction::Downstream,
                junction_id: "junction:chr1:100-200:+".into(),
            },
        ];
        let mut out = Vec::new();
        assert_eq!(write_adjacency_table(&triples, &mut out).unwrap(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "exon_id\tdirection\tjunction_id\n\
             exon:chr1:201-249:+\tupstream\tjunction:chr1:250-260:+\n\
             exon:chr1:201-249:+\tdownstream\tjunction:chr1:100-200:+\n"
        );
    }

    #[test]
    fn test_empty_table_has_header() {
        let mut out = Vec::new();
        assert_eq!(write_adjacency_table(&[], &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "exon_id\tdirection\tjunction_id\n");
    }
}
