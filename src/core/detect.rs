//! De novo exon detection
//!
//! Looks at every unordered pair of junctions on the same chromosome and
//! proposes an exon in the gap between them when the gap is short:
//!
//! 1. Overlapping junctions never enclose an exon
//! 2. Option 1: `|j1.stop - j2.start| < max` gives `(j1.stop + 1, j2.start - 1)`
//! 3. Option 2: `|j2.stop - j1.start| < max` gives `(j2.stop + 1, j1.start - 1)`
//!
//! Option 1 is always tried first. Candidates are merged into the store
//! one at a time, in chromosome then pair order.

use crate::core::error::Result;
use crate::core::junction::JunctionTable;
use crate::core::merge::add_exon_to_store;
use crate::core::observer::ProgressObserver;
use crate::core::region::{Region, Strand};
use crate::core::store::AnnotationStore;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Default upper bound (exclusive) on the junction gap of a novel exon
pub const MAX_DE_NOVO_EXON_LENGTH: u64 = 100;

/// Detector settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    pub max_de_novo_exon_length: u64,
    /// Threads for the per-chromosome pair scan (1 = sequential)
    pub threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_de_novo_exon_length: MAX_DE_NOVO_EXON_LENGTH,
            threads: 1,
        }
    }
}

impl DetectorConfig {
    pub fn with_max_length(max_de_novo_exon_length: u64) -> Self {
        Self {
            max_de_novo_exon_length,
            ..Self::default()
        }
    }
}

/// An exon proposed by a pair of junctions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateExon {
    pub chrom: String,
    pub start: u64,
    pub stop: u64,
    pub strand: Strand,
    pub junction1: Region,
    pub junction2: Region,
}

/// Pair scan result for one chromosome
#[derive(Debug, Clone, Default)]
pub struct ChromScan {
    pub candidates: Vec<CandidateExon>,
    pub pairs: usize,
    pub overlapping: usize,
}

/// Detection statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionStats {
    pub pairs_examined: usize,
    pub overlapping_pairs: usize,
    pub candidates: usize,
    pub exons_inserted: usize,
    pub exons_existing: usize,
}

/// Start and stop of an exon that could sit between two junctions
///
/// Returns `None` when the junctions overlap or neither gap is shorter
/// than `max_length`.
pub fn is_there_an_exon_here(
    junction1: &Region,
    junction2: &Region,
    max_length: u64,
) -> Option<(u64, u64)> {
    if junction1.overlaps(junction2) {
        return None;
    }

    // Junction boundaries are intron coordinates: the exon starts one base
    // after a junction stop and stops one base before a junction start.
    let option1 = junction1.stop().abs_diff(junction2.start()) < max_length;
    let option2 = junction2.stop().abs_diff(junction1.start()) < max_length;

    if option1 {
        Some((junction1.stop().checked_add(1)?, junction2.start().checked_sub(1)?))
    } else if option2 {
        Some((junction2.stop().checked_add(1)?, junction1.start().checked_sub(1)?))
    } else {
        None
    }
}

/// Scan all unordered pairs of junctions on one chromosome
///
/// `regions` must all be on the same chromosome; pair order follows
/// slice order.
pub fn scan_chromosome(regions: &[Region], max_length: u64) -> ChromScan {
    let mut scan = ChromScan::default();

    for (i, junction1) in regions.iter().enumerate() {
        for junction2 in &regions[i + 1..] {
            scan.pairs += 1;
            if junction1.overlaps(junction2) {
                scan.overlapping += 1;
                continue;
            }

            if let Some((start, stop)) = is_there_an_exon_here(junction1, junction2, max_length) {
                scan.candidates.push(CandidateExon {
                    chrom: junction1.chrom().to_string(),
                    start,
                    stop,
                    strand: junction1.strand().combine_pair(junction2.strand()),
                    junction1: junction1.clone(),
                    junction2: junction2.clone(),
                });
            }
        }
    }

    scan
}

/// Parse junction ids and group the regions by chromosome
///
/// Chromosomes come out sorted; within a chromosome regions keep table
/// (junction id) order.
pub fn regions_by_chrom(table: &JunctionTable) -> Result<BTreeMap<String, Vec<Region>>> {
    let mut by_chrom: BTreeMap<String, Vec<Region>> = BTreeMap::new();
    for junction in table.iter() {
        let region = junction.region()?;
        by_chrom
            .entry(region.chrom().to_string())
            .or_default()
            .push(region);
    }
    Ok(by_chrom)
}

/// Find all candidate exons, grouped by chromosome
///
/// With `threads > 1` chromosomes are scanned in parallel; the returned
/// order is the same as a sequential scan.
pub fn find_candidate_exons(table: &JunctionTable, config: &DetectorConfig) -> Result<Vec<ChromScan>> {
    let by_chrom = regions_by_chrom(table)?;
    let max_length = config.max_de_novo_exon_length;

    if config.threads <= 1 {
        return Ok(by_chrom
            .values()
            .map(|regions| scan_chromosome(regions, max_length))
            .collect());
    }

    let groups: Vec<&Vec<Region>> = by_chrom.values().collect();
    let scan_all = || -> Vec<ChromScan> {
        groups
            .par_iter()
            .map(|regions| scan_chromosome(regions, max_length))
            .collect()
    };

    match rayon::ThreadPoolBuilder::new().num_threads(config.threads).build() {
        Ok(pool) => Ok(pool.install(scan_all)),
        Err(e) => {
            log::warn!("Could not build thread pool ({}), scanning sequentially", e);
            Ok(groups
                .iter()
                .map(|regions| scan_chromosome(regions, max_length))
                .collect())
        }
    }
}

/// Detect novel exons from junction gaps and merge them into the store
pub fn detect_exons_from_junctions<S>(
    table: &JunctionTable,
    store: &mut S,
    config: &DetectorConfig,
    observer: &dyn ProgressObserver,
) -> Result<DetectionStats>
where
    S: AnnotationStore + ?Sized,
{
    let scans = find_candidate_exons(table, config)?;
    let mut stats = DetectionStats::default();

    // Single serialized merge path: the store's id check deduplicates
    // candidates with identical coordinates.
    for scan in scans {
        stats.pairs_examined += scan.pairs;
        stats.overlapping_pairs += scan.overlapping;
        stats.candidates += scan.candidates.len();

        for candidate in scan.candidates {
            observer.on_exon_found(&candidate.junction1, &candidate.junction2);
            let outcomes = add_exon_to_store(
                store,
                &candidate.chrom,
                candidate.start,
                candidate.stop,
                candidate.strand,
                observer,
            )?;
            for outcome in outcomes {
                if outcome.is_inserted() {
                    stats.exons_inserted += 1;
                } else {
                    stats.exons_existing += 1;
                }
            }
        }
    }

    observer.on_done("De novo exon detection");
    Ok(stats)
}
