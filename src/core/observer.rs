//! Progress reporting
//!
//! The engine never logs on its own; it reports to an injected observer.

use crate::core::region::Region;
use crate::core::store::Feature;
use crate::core::merge::GeneDisplayName;

/// Receives progress events from the detector, merge engine and resolver
pub trait ProgressObserver {
    /// A pair of junctions leaves room for an exon
    fn on_exon_found(&self, _junction1: &Region, _junction2: &Region) {}

    /// A novel exon was added to the store; `gene` is `None` when it lies
    /// outside any annotated gene
    fn on_exon_added(&self, _exon: &Feature, _gene: Option<&GeneDisplayName>) {}

    /// `done` of `total` units completed
    fn on_progress(&self, _stage: &str, _done: usize, _total: usize) {}

    fn on_done(&self, _stage: &str) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_exon_found(&self, junction1: &Region, junction2: &Region) {
        log::debug!("Found new exon between {} and {}", junction1, junction2);
    }

    fn on_exon_added(&self, exon: &Feature, gene: Option<&GeneDisplayName>) {
        match gene {
            Some(name) => {
                let gene_id = exon
                    .attributes
                    .get("gene_id")
                    .map(|ids| ids.join(","))
                    .unwrap_or_default();
                log::info!("Added a novel exon ({}) in the gene {} ({})", exon.id, gene_id, name);
            }
            None => log::info!(
                "Added a novel exon ({}), located in an unannotated gene",
                exon.id
            ),
        }
    }

    fn on_progress(&self, stage: &str, done: usize, total: usize) {
        log::info!("{}: {}/{} completed", stage, done, total);
    }

    fn on_done(&self, stage: &str) {
        log::info!("{}: done", stage);
    }
}
