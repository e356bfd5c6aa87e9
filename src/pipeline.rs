//! Exon-junction adjacency pipeline stage
//!
//! Bundles a junction table with the detector settings and runs the
//! detector, resolver and de novo export against an annotation store.

use crate::core::{
    detect_exons_from_junctions, neighboring_exons, AdjacencyTriple, AnnotationStore,
    DetectionStats, DetectorConfig, JunctionTable, ProgressObserver, Result,
};
use crate::formats::gtf;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default file name of the de novo exon export
pub const NOVEL_EXONS_GTF: &str = "novel_exons.gtf";

/// Annotate junctions with their neighboring exons
pub struct ExonJunctionAdjacencies {
    junctions: JunctionTable,
    config: DetectorConfig,
}

impl ExonJunctionAdjacencies {
    pub fn new(junctions: JunctionTable, config: DetectorConfig) -> Self {
        Self { junctions, config }
    }

    pub fn junctions(&self) -> &JunctionTable {
        &self.junctions
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Find exons in short gaps between junctions and add them to the store
    pub fn detect_exons_from_junctions<S>(
        &self,
        store: &mut S,
        observer: &dyn ProgressObserver,
    ) -> Result<DetectionStats>
    where
        S: AnnotationStore + ?Sized,
    {
        detect_exons_from_junctions(&self.junctions, store, &self.config, observer)
    }

    /// `(exon, direction, junction)` triples for every exon in the store
    pub fn neighboring_exons<S>(&self, store: &S, observer: &dyn ProgressObserver) -> Vec<AdjacencyTriple>
    where
        S: AnnotationStore + ?Sized,
    {
        neighboring_exons(&self.junctions, store, observer)
    }

    /// Write all de novo exons in the store to a GTF file
    pub fn write_de_novo_exons<S, P>(&self, store: &S, path: P) -> Result<usize>
    where
        S: AnnotationStore + ?Sized,
        P: AsRef<Path>,
    {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        let n = gtf::write_de_novo_exons(store, &mut writer)?;
        writer.flush()?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction, Junction, MemoryStore, NullObserver};

    #[test]
    fn test_detect_then_resolve() {
        let table = JunctionTable::new(vec![
            Junction::from_id("junction:chr1:100-200:+").unwrap(),
            Junction::from_id("junction:chr1:250-260:+").unwrap(),
        ])
        .unwrap();
        let pipeline = ExonJunctionAdjacencies::new(table, DetectorConfig::default());
        let mut store = MemoryStore::new();

        pipeline.detect_exons_from_junctions(&mut store, &NullObserver).unwrap();
        let triples = pipeline.neighboring_exons(&store, &NullObserver);

        // exon 201-249 sits after junction 100-200 and before junction 250-260
        let got: Vec<(&str, Direction, &str)> = triples
            .iter()
            .map(|t| (t.exon_id.as_str(), t.direction, t.junction_id.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("exon:chr1:201-249:+", Direction::Upstream, "junction:chr1:250-260:+"),
                ("exon:chr1:201-249:+", Direction::Downstream, "junction:chr1:100-200:+"),
            ]
        );
    }

    #[test]
    fn test_zero_max_length_still_resolves() {
        let table = JunctionTable::new(vec![
            Junction::from_id("junction:chr1:100-200:+").unwrap(),
            Junction::from_id("junction:chr1:250-260:+").unwrap(),
        ])
        .unwrap();
        let pipeline = ExonJunctionAdjacencies::new(table, DetectorConfig::with_max_length(0));
        let annotated = crate::core::Feature::new(
            "exon:chr1:201-249:+",
            "chr1",
            crate::core::FeatureType::Exon,
            201,
            249,
            crate::core::Strand::Plus,
        );
        let mut store = MemoryStore::from_features(vec![annotated]);

        let stats = pipeline.detect_exons_from_junctions(&mut store, &NullObserver).unwrap();
        assert_eq!(stats.pairs_examined, 1);
        assert_eq!(stats.candidates, 0);
        assert_eq!(store.len(), 1);

        let triples = pipeline.neighboring_exons(&store, &NullObserver);
        assert_eq!(triples.len(), 2);
    }
}
