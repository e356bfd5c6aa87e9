//! Annotation store
//!
//! The gene/exon feature database the detector, merge engine and resolver
//! talk to. `AnnotationStore` is the capability they need; `MemoryStore`
//! implements it with a rust-lapper gene index per chromosome.

use crate::core::error::{StoreError, StoreResult};
use crate::core::Strand;
use rust_lapper::{Interval, Lapper};
use std::collections::HashMap;
use std::fmt;

/// Feature type of a gene model record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Gene,
    Transcript,
    Exon,
    /// Exon inferred from junction gaps
    NovelExon,
    Other(String),
}

impl FeatureType {
    pub fn as_str(&self) -> &str {
        match self {
            FeatureType::Gene => "gene",
            FeatureType::Transcript => "transcript",
            FeatureType::Exon => "exon",
            FeatureType::NovelExon => "novel_exon",
            FeatureType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "gene" => FeatureType::Gene,
            "transcript" | "mRNA" => FeatureType::Transcript,
            "exon" => FeatureType::Exon,
            "novel_exon" => FeatureType::NovelExon,
            other => FeatureType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered multi-valued feature attributes (`gene_id`, `gene_name`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Vec<String>)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping first-seen key order
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// First value of a key
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A gene model feature (gene, transcript, exon, novel exon)
///
/// Coordinates are 1-based and closed, like GTF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub id: String,
    pub seqid: String,
    pub source: String,
    pub featuretype: FeatureType,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub attributes: Attributes,
}

impl Feature {
    pub fn new(
        id: impl Into<String>,
        seqid: impl Into<String>,
        featuretype: FeatureType,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> Self {
        Self {
            id: id.into(),
            seqid: seqid.into(),
            source: ".".to_string(),
            featuretype,
            start,
            end,
            strand,
            attributes: Attributes::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Capability the engine needs from a gene/exon feature database
pub trait AnnotationStore {
    /// Genes overlapping the closed interval `[start, stop]` on `chrom`
    ///
    /// A stranded query only returns genes on that strand; an unstranded
    /// query returns genes on any strand.
    fn genes_overlapping(&self, chrom: &str, start: u64, stop: u64, strand: Strand) -> Vec<Feature>;

    /// Look up a feature by id
    fn get(&self, id: &str) -> StoreResult<&Feature>;

    /// All features of the given types, in store order
    fn features_of_type(&self, types: &[FeatureType]) -> Vec<&Feature>;

    /// Insert a new feature; an existing id is `StoreError::Integrity`
    fn insert(&mut self, feature: Feature) -> StoreResult<()>;

    /// Insert a feature or replace the one with the same id
    fn upsert(&mut self, feature: Feature);
}

/// Gene interval in the per-chromosome index; value is the feature slot
type GeneInterval = Interval<u64, usize>;

/// In-memory annotation store
///
/// Iteration order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    features: Vec<Feature>,
    ids: HashMap<String, usize>,
    /// Chromosome -> gene interval tree
    genes: HashMap<String, Lapper<u64, usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from features, first occurrence of an id wins
    pub fn from_features<I: IntoIterator<Item = Feature>>(features: I) -> Self {
        let mut store = Self::new();
        for feature in features {
            if store.ids.contains_key(&feature.id) {
                log::debug!("Skipping duplicate feature id {}", feature.id);
                continue;
            }
            store.push(feature);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of indexed genes on a chromosome
    pub fn gene_count(&self, chrom: &str) -> usize {
        self.genes.get(chrom).map(|l| l.len()).unwrap_or(0)
    }

    fn gene_interval(feature: &Feature, slot: usize) -> GeneInterval {
        // Lapper intervals are half-open
        Interval {
            start: feature.start.min(feature.end),
            stop: feature.start.max(feature.end).saturating_add(1),
            val: slot,
        }
    }

    fn push(&mut self, feature: Feature) {
        let slot = self.features.len();
        if feature.featuretype == FeatureType::Gene {
            let interval = Self::gene_interval(&feature, slot);
            match self.genes.get_mut(&feature.seqid) {
                Some(lapper) => lapper.insert(interval),
                None => {
                    self.genes
                        .insert(feature.seqid.clone(), Lapper::new(vec![interval]));
                }
            }
        }
        self.ids.insert(feature.id.clone(), slot);
        self.features.push(feature);
    }

    fn rebuild_gene_index(&mut self) {
        let mut by_chrom: HashMap<String, Vec<GeneInterval>> = HashMap::new();
        for (slot, feature) in self.features.iter().enumerate() {
            if feature.featuretype == FeatureType::Gene {
                by_chrom
                    .entry(feature.seqid.clone())
                    .or_default()
                    .push(Self::gene_interval(feature, slot));
            }
        }
        self.genes = by_chrom
            .into_iter()
            .map(|(chrom, intervals)| (chrom, Lapper::new(intervals)))
            .collect();
    }
}

impl AnnotationStore for MemoryStore {
    fn genes_overlapping(&self, chrom: &str, start: u64, stop: u64, strand: Strand) -> Vec<Feature> {
        let Some(lapper) = self.genes.get(chrom) else {
            return vec![];
        };

        let (lo, hi) = (start.min(stop), start.max(stop));
        let mut slots: Vec<usize> = lapper
            .find(lo, hi.saturating_add(1))
            .map(|iv| iv.val)
            .filter(|&slot| !strand.is_stranded() || self.features[slot].strand == strand)
            .collect();
        slots.sort_by_key(|&slot| (self.features[slot].start, slot));

        slots.into_iter().map(|slot| self.features[slot].clone()).collect()
    }

    fn get(&self, id: &str) -> StoreResult<&Feature> {
        self.ids
            .get(id)
            .map(|&slot| &self.features[slot])
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn features_of_type(&self, types: &[FeatureType]) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| types.contains(&f.featuretype))
            .collect()
    }

    fn insert(&mut self, feature: Feature) -> StoreResult<()> {
        if self.ids.contains_key(&feature.id) {
            return Err(StoreError::Integrity(feature.id));
        }
        self.push(feature);
        Ok(())
    }

    fn upsert(&mut self, feature: Feature) {
        match self.ids.get(&feature.id).copied() {
            Some(slot) => {
                let was_gene = self.features[slot].featuretype == FeatureType::Gene;
                let is_gene = feature.featuretype == FeatureType::Gene;
                self.features[slot] = feature;
                if was_gene || is_gene {
                    self.rebuild_gene_index();
                }
            }
            None => self.push(feature),
        }
    }
}
