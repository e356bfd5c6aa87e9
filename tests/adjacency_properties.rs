//! Adjacency resolution property tests
//!
//! Minus-strand exons see the same junctions as their plus-strand mirror,
//! with upstream and downstream exchanged.

use proptest::prelude::*;
use splice_adjacency::core::{
    exon_id, neighboring_exons, to_stranded_transcript_adjacency, Adjacent, Direction, Feature,
    FeatureType, Junction, JunctionBoundaryIndex, JunctionTable, MemoryStore, NullObserver, Strand,
};

fn exon(start: u64, stop: u64, strand: Strand) -> Feature {
    Feature::new(exon_id("chr1", start, stop, strand), "chr1", FeatureType::Exon, start, stop, strand)
}

fn arb_boundary() -> impl Strategy<Value = Option<u64>> {
    prop::option::of(prop_oneof![Just(200u64), Just(201), Just(249), Just(250)])
}

/// Junctions with a boundary on one of a few exon coordinates
fn arb_junctions(strand: Strand) -> impl Strategy<Value = Vec<Junction>> {
    prop::collection::vec((arb_boundary(), arb_boundary()), 0..12).prop_map(move |bounds| {
        bounds
            .into_iter()
            .enumerate()
            .map(|(i, (start, stop))| Junction::new(format!("j{:02}", i), "chr1", strand, start, stop))
            .collect()
    })
}

fn flip(junctions: &[Junction]) -> Vec<Junction> {
    junctions
        .iter()
        .map(|j| Junction {
            strand: Strand::Minus,
            ..j.clone()
        })
        .collect()
}

proptest! {
    /// Property: the minus strand swaps directions and keeps junction sets
    #[test]
    fn test_minus_strand_mirrors_plus(junctions in arb_junctions(Strand::Plus)) {
        let plus_table = JunctionTable::new(junctions.clone()).unwrap();
        let minus_table = JunctionTable::new(flip(&junctions)).unwrap();

        let plus = JunctionBoundaryIndex::new(&plus_table)
            .adjacent_junctions_single_exon(&exon(201, 249, Strand::Plus));
        let minus = JunctionBoundaryIndex::new(&minus_table)
            .adjacent_junctions_single_exon(&exon(201, 249, Strand::Minus));

        let pick = |triples: &[splice_adjacency::AdjacencyTriple], d: Direction| -> Vec<String> {
            triples
                .iter()
                .filter(|t| t.direction == d)
                .map(|t| t.junction_id.clone())
                .collect()
        };
        prop_assert_eq!(pick(&plus, Direction::Upstream), pick(&minus, Direction::Downstream));
        prop_assert_eq!(pick(&plus, Direction::Downstream), pick(&minus, Direction::Upstream));
    }

    /// Property: upstream triples always come before downstream triples
    #[test]
    fn test_upstream_before_downstream(junctions in arb_junctions(Strand::Plus)) {
        let table = JunctionTable::new(junctions).unwrap();
        let triples = JunctionBoundaryIndex::new(&table)
            .adjacent_junctions_single_exon(&exon(201, 249, Strand::Plus));
        let first_downstream = triples
            .iter()
            .position(|t| t.direction == Direction::Downstream)
            .unwrap_or(triples.len());
        prop_assert!(triples[first_downstream..]
            .iter()
            .all(|t| t.direction == Direction::Downstream));
    }

    /// Property: every triple's junction touches the exon boundary it claims
    #[test]
    fn test_triples_match_boundaries(junctions in arb_junctions(Strand::Plus)) {
        let table = JunctionTable::new(junctions).unwrap();
        let triples = JunctionBoundaryIndex::new(&table)
            .adjacent_junctions_single_exon(&exon(201, 249, Strand::Plus));
        for triple in &triples {
            let junction = table.get(&triple.junction_id).unwrap();
            match triple.direction {
                Direction::Upstream => prop_assert_eq!(junction.exon_stop, Some(249)),
                Direction::Downstream => prop_assert_eq!(junction.exon_start, Some(201)),
            }
        }
    }
}

#[test]
fn test_transcript_adjacency_swap() {
    let up = [1usize, 2];
    let down = [3usize];
    let genome = Adjacent {
        upstream: &up,
        downstream: &down,
    };

    assert_eq!(to_stranded_transcript_adjacency(genome.clone(), Strand::Plus), Some(genome.clone()));
    assert_eq!(
        to_stranded_transcript_adjacency(genome.clone(), Strand::Minus),
        Some(Adjacent {
            upstream: &down,
            downstream: &up,
        })
    );
    assert_eq!(to_stranded_transcript_adjacency(genome, Strand::Unstranded), None);
}

#[test]
fn test_scenario_exon_after_junction() {
    for (strand, expected) in [(Strand::Plus, Direction::Downstream), (Strand::Minus, Direction::Upstream)] {
        let table = JunctionTable::new(vec![Junction::new("j1", "chr1", strand, Some(201), None)]).unwrap();
        let store = MemoryStore::from_features(vec![exon(201, 249, strand)]);

        let triples = neighboring_exons(&table, &store, &NullObserver);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].direction, expected);
        assert_eq!(triples[0].junction_id, "j1");
        assert_eq!(triples[0].exon_id, exon_id("chr1", 201, 249, strand));
    }
}
