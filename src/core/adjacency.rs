//! Exon-junction adjacency resolution
//!
//! For every exon, junctions whose `exon_stop` equals the exon stop lie
//! after it in the genome, and junctions whose `exon_start` equals the
//! exon start lie before it. The triple `(exon, direction, junction)`
//! reads "exon is `direction` of junction" in transcript orientation, so
//! the genome directions are swapped for minus-strand exons.

use crate::core::junction::JunctionTable;
use crate::core::observer::ProgressObserver;
use crate::core::region::Strand;
use crate::core::store::{AnnotationStore, Feature, FeatureType};
use std::collections::HashMap;
use std::fmt;

/// Exon types the resolver iterates
pub const EXON_TYPES: [FeatureType; 2] = [FeatureType::Exon, FeatureType::NovelExon];

/// Report progress every this many exons
const PROGRESS_INTERVAL: usize = 10_000;

/// Position of an exon relative to a junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Upstream,
    Downstream,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "`exon_id` is `direction` of `junction_id`"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacencyTriple {
    pub exon_id: String,
    pub direction: Direction,
    pub junction_id: String,
}

/// Junction row indices adjacent to one exon, per direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacent<'a> {
    pub upstream: &'a [usize],
    pub downstream: &'a [usize],
}

/// Swap genome directions into transcript directions
///
/// `None` for unstranded exons, which have no transcript orientation.
pub fn to_stranded_transcript_adjacency(in_genome: Adjacent<'_>, strand: Strand) -> Option<Adjacent<'_>> {
    match strand {
        Strand::Plus => Some(in_genome),
        Strand::Minus => Some(Adjacent {
            upstream: in_genome.downstream,
            downstream: in_genome.upstream,
        }),
        Strand::Unstranded => None,
    }
}

/// Junction rows per chromosome, keyed by (strand, exon boundary)
type BoundaryIndex<'a> = HashMap<&'a str, HashMap<(Strand, u64), Vec<usize>>>;

/// Junction rows keyed by chrom, strand and exon boundary coordinate
///
/// Row lists are in table order.
pub struct JunctionBoundaryIndex<'a> {
    table: &'a JunctionTable,
    by_exon_stop: BoundaryIndex<'a>,
    by_exon_start: BoundaryIndex<'a>,
}

fn boundary_rows<'m>(index: &'m BoundaryIndex<'_>, exon: &Feature, coord: u64) -> &'m [usize] {
    index
        .get(exon.seqid.as_str())
        .and_then(|by_coord| by_coord.get(&(exon.strand, coord)))
        .map(|rows| rows.as_slice())
        .unwrap_or(&[])
}

impl<'a> JunctionBoundaryIndex<'a> {
    pub fn new(table: &'a JunctionTable) -> Self {
        let mut by_exon_stop: BoundaryIndex<'a> = HashMap::new();
        let mut by_exon_start: BoundaryIndex<'a> = HashMap::new();

        for (row, junction) in table.iter().enumerate() {
            let chrom = junction.chrom.as_str();
            if let Some(stop) = junction.exon_stop {
                by_exon_stop
                    .entry(chrom)
                    .or_default()
                    .entry((junction.strand, stop))
                    .or_default()
                    .push(row);
            }
            if let Some(start) = junction.exon_start {
                by_exon_start
                    .entry(chrom)
                    .or_default()
                    .entry((junction.strand, start))
                    .or_default()
                    .push(row);
            }
        }

        Self {
            table,
            by_exon_stop,
            by_exon_start,
        }
    }

    /// Junctions next to an exon in genome coordinates
    pub fn genome_adjacent(&self, exon: &Feature) -> Adjacent<'_> {
        Adjacent {
            upstream: boundary_rows(&self.by_exon_stop, exon, exon.end),
            downstream: boundary_rows(&self.by_exon_start, exon, exon.start),
        }
    }

    /// Triples for a single exon: upstream first, then downstream
    pub fn adjacent_junctions_single_exon(&self, exon: &Feature) -> Vec<AdjacencyTriple> {
        let in_genome = self.genome_adjacent(exon);
        let Some(in_transcript) = to_stranded_transcript_adjacency(in_genome, exon.strand) else {
            return vec![];
        };

        let junctions = self.table.as_slice();
        [
            (Direction::Upstream, in_transcript.upstream),
            (Direction::Downstream, in_transcript.downstream),
        ]
        .into_iter()
        .flat_map(move |(direction, rows)| {
            rows.iter().map(move |&row| AdjacencyTriple {
                exon_id: exon.id.clone(),
                direction,
                junction_id: junctions[row].id.clone(),
            })
        })
        .collect()
    }
}

/// Upstream and downstream exons of every junction
///
/// Iterates annotated and novel exons in store order.
pub fn neighboring_exons<S>(
    table: &JunctionTable,
    store: &S,
    observer: &dyn ProgressObserver,
) -> Vec<AdjacencyTriple>
where
    S: AnnotationStore + ?Sized,
{
    const STAGE: &str = "Annotating junctions with neighboring exons";

    let index = JunctionBoundaryIndex::new(table);
    let exons = store.features_of_type(&EXON_TYPES);
    let n_exons = exons.len();

    let mut triples = Vec::new();
    for (i, exon) in exons.into_iter().enumerate() {
        if (i + 1) % PROGRESS_INTERVAL == 0 {
            observer.on_progress(STAGE, i + 1, n_exons);
        }
        triples.extend(index.adjacent_junctions_single_exon(exon));
    }

    observer.on_done(STAGE);
    triples
}
