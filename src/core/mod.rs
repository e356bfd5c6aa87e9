//! Core adjacency and inference engine
//!
//! This module contains regions, the annotation store capability,
//! de novo exon detection, exon merging and adjacency resolution.

pub mod adjacency;
pub mod detect;
mod error;
pub mod io;
mod junction;
pub mod merge;
mod observer;
mod region;
pub mod store;

pub use adjacency::{
    neighboring_exons, to_stranded_transcript_adjacency, AdjacencyTriple, Adjacent, Direction,
    JunctionBoundaryIndex, EXON_TYPES,
};
pub use detect::{
    detect_exons_from_junctions, find_candidate_exons, is_there_an_exon_here, scan_chromosome,
    CandidateExon, ChromScan, DetectionStats, DetectorConfig, MAX_DE_NOVO_EXON_LENGTH,
};
pub use error::{
    ConfigError, FormatError, FormatResult, RegionParseError, Result, SpliceAdjacencyError,
    StoreError, StoreResult,
};
pub use io::{detect_compression, CompressionFormat, SmartReader};
pub use junction::{Junction, JunctionTable};
pub use merge::{
    add_exon_to_store, exon_id, gene_display_name, GeneDisplayName, MergeOutcome,
    OUTRIGGER_DE_NOVO, UNKNOWN_GENE,
};
pub use observer::{LogObserver, NullObserver, ProgressObserver};
pub use region::{Region, Strand};
pub use store::{AnnotationStore, Attributes, Feature, FeatureType, MemoryStore};
