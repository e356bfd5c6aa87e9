//! SpliceAdjacency - exon/junction adjacency for alternative splicing
//!
//! Annotates splice junctions with their neighboring exons and infers de
//! novo exons from short gaps between junctions.
//!
//! # Features
//!
//! - De novo exon detection from junction pairs on the same chromosome
//! - Idempotent merging of novel exons into a strand-aware gene annotation
//! - Upstream/downstream exon-junction triples in transcript orientation
//! - Gzip/bzip2 junction tables and GTF/GFF annotations
//!
//! # Example
//!
//! ```ignore
//! use splice_adjacency::{ExonJunctionAdjacencies, DetectorConfig, LogObserver};
//! use splice_adjacency::formats::{load_annotation, load_junction_table, JunctionColumns};
//!
//! let junctions = load_junction_table("sj_metadata.csv", &JunctionColumns::default())?;
//! let mut store = load_annotation("gencode.gtf.gz")?;
//!
//! let adjacencies = ExonJunctionAdjacencies::new(junctions, DetectorConfig::default());
//! adjacencies.detect_exons_from_junctions(&mut store, &LogObserver)?;
//! let triples = adjacencies.neighboring_exons(&store, &LogObserver);
//! ```

pub mod core;
pub mod formats;
pub mod pipeline;

// Re-export commonly used types
pub use core::{
    AdjacencyTriple, AnnotationStore, ConfigError, DetectionStats, DetectorConfig, Direction,
    Feature, FeatureType, Junction, JunctionTable, LogObserver, MemoryStore, NullObserver,
    ProgressObserver, Region, RegionParseError, SpliceAdjacencyError, StoreError, Strand,
};
pub use pipeline::ExonJunctionAdjacencies;
