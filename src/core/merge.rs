//! Exon merge engine
//!
//! Inserts a candidate exon into the annotation store once per overlapping
//! gene (or once, geneless, when no gene overlaps). Insertion is idempotent:
//! an id that already exists, or an integrity error from the store, is
//! reported as `MergeOutcome::AlreadyPresent` and otherwise ignored.

use crate::core::error::{StoreError, StoreResult};
use crate::core::observer::ProgressObserver;
use crate::core::store::{AnnotationStore, Attributes, Feature, FeatureType};
use crate::core::Strand;
use std::fmt;

/// Source tag of exons created from junction gaps
pub const OUTRIGGER_DE_NOVO: &str = "outrigger_de_novo";

/// Display name used when a gene has neither `gene_name` nor `gene_id`
pub const UNKNOWN_GENE: &str = "unknown_gene";

/// Deterministic exon id: `exon:<chrom>:<start>-<stop>:<strand>`
///
/// # Examples
/// ```
/// use splice_adjacency::core::{exon_id, Strand};
/// assert_eq!(exon_id("chr1", 201, 249, Strand::Plus), "exon:chr1:201-249:+");
/// assert_eq!(exon_id("chr1", 201, 249, Strand::Unstranded), "exon:chr1:201-249:.");
/// ```
pub fn exon_id(chrom: &str, start: u64, stop: u64, strand: Strand) -> String {
    format!("exon:{}:{}-{}:{}", chrom, start, stop, strand)
}

/// Human-readable gene label of a novel exon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneDisplayName {
    /// From `gene_name`
    Name(String),
    /// From `gene_id`, no `gene_name` present
    Id(String),
    Unknown,
}

impl GeneDisplayName {
    pub fn as_str(&self) -> &str {
        match self {
            GeneDisplayName::Name(s) | GeneDisplayName::Id(s) => s,
            GeneDisplayName::Unknown => UNKNOWN_GENE,
        }
    }
}

impl fmt::Display for GeneDisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prioritized lookup: `gene_name`, then `gene_id`, then unknown.
/// Multiple values are joined with `,`.
pub fn gene_display_name(attributes: &Attributes) -> GeneDisplayName {
    let joined = |key: &str| {
        attributes
            .get(key)
            .filter(|values| !values.is_empty())
            .map(|values| values.join(","))
    };

    if let Some(name) = joined("gene_name") {
        GeneDisplayName::Name(name)
    } else if let Some(id) = joined("gene_id") {
        GeneDisplayName::Id(id)
    } else {
        GeneDisplayName::Unknown
    }
}

/// Result of merging one candidate exon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted(String),
    AlreadyPresent(String),
}

impl MergeOutcome {
    pub fn id(&self) -> &str {
        match self {
            MergeOutcome::Inserted(id) | MergeOutcome::AlreadyPresent(id) => id,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, MergeOutcome::Inserted(_))
    }
}

fn novel_exon(chrom: &str, start: u64, stop: u64, strand: Strand) -> Feature {
    Feature::new(
        exon_id(chrom, start, stop, strand),
        chrom,
        FeatureType::NovelExon,
        start,
        stop,
        strand,
    )
    .with_source(OUTRIGGER_DE_NOVO)
}

/// Insert, treating a uniqueness violation as "already there"
fn insert_idempotent<S>(store: &mut S, exon: Feature) -> StoreResult<MergeOutcome>
where
    S: AnnotationStore + ?Sized,
{
    let id = exon.id.clone();
    match store.insert(exon) {
        Ok(()) => Ok(MergeOutcome::Inserted(id)),
        Err(StoreError::Integrity(_)) => Ok(MergeOutcome::AlreadyPresent(id)),
        Err(e) => Err(e),
    }
}

/// Add the exon `[start, stop]` on `chrom` to the store
///
/// One novel exon is created per gene overlapping the interval (on
/// `strand` when stranded), carrying that gene's strand and attributes.
/// Without an overlapping gene a single geneless novel exon is created.
pub fn add_exon_to_store<S>(
    store: &mut S,
    chrom: &str,
    start: u64,
    stop: u64,
    strand: Strand,
    observer: &dyn ProgressObserver,
) -> StoreResult<Vec<MergeOutcome>>
where
    S: AnnotationStore + ?Sized,
{
    let overlapping_genes = store.genes_overlapping(chrom, start, stop, strand);

    if overlapping_genes.is_empty() {
        let exon = novel_exon(chrom, start, stop, strand);
        let outcome = insert_idempotent(store, exon.clone())?;
        if outcome.is_inserted() {
            observer.on_exon_added(&exon, None);
        }
        return Ok(vec![outcome]);
    }

    let candidates: Vec<Feature> = overlapping_genes
        .into_iter()
        .map(|gene| novel_exon(chrom, start, stop, gene.strand).with_attributes(gene.attributes))
        .collect();

    let mut outcomes = Vec::with_capacity(candidates.len());
    for exon in candidates {
        let gene_name = gene_display_name(&exon.attributes);

        match store.get(&exon.id) {
            Ok(_) => {
                outcomes.push(MergeOutcome::AlreadyPresent(exon.id));
                continue;
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let outcome = insert_idempotent(store, exon.clone())?;
        if outcome.is_inserted() {
            observer.on_exon_added(&exon, Some(&gene_name));
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
