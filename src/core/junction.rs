//! Splice junction table
//!
//! Read-only input of the detector and resolver, indexed and sorted by
//! junction id.

use crate::core::error::{ConfigError, RegionParseError};
use crate::core::region::{Region, Strand};

/// One row of the junction table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    /// Junction id, e.g. `junction:chr1:100-200:+`
    pub id: String,
    pub chrom: String,
    pub strand: Strand,
    /// Start of the exon downstream of the junction in genome coordinates
    pub exon_start: Option<u64>,
    /// Stop of the exon upstream of the junction in genome coordinates
    pub exon_stop: Option<u64>,
}

impl Junction {
    pub fn new(
        id: impl Into<String>,
        chrom: impl Into<String>,
        strand: Strand,
        exon_start: Option<u64>,
        exon_stop: Option<u64>,
    ) -> Self {
        Self {
            id: id.into(),
            chrom: chrom.into(),
            strand,
            exon_start,
            exon_stop,
        }
    }

    /// Build a junction whose columns are all derived from its id
    ///
    /// The flanking exon boundaries are one base outside the junction.
    pub fn from_id(id: &str) -> Result<Self, RegionParseError> {
        let region = Region::parse(id)?;
        Ok(Self {
            id: id.to_string(),
            chrom: region.chrom().to_string(),
            strand: region.strand(),
            exon_start: region.stop().checked_add(1),
            exon_stop: region.start().checked_sub(1),
        })
    }

    /// Region encoded in the junction id
    pub fn region(&self) -> Result<Region, RegionParseError> {
        Region::parse(&self.id)
    }
}

/// Junctions sorted by id
#[derive(Debug, Clone, Default)]
pub struct JunctionTable {
    junctions: Vec<Junction>,
}

impl JunctionTable {
    /// Sort by id; duplicate ids are rejected
    pub fn new(mut junctions: Vec<Junction>) -> Result<Self, ConfigError> {
        junctions.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(dup) = junctions.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(ConfigError::DuplicateJunction(dup[0].id.clone()));
        }
        Ok(Self { junctions })
    }

    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.iter()
    }

    pub fn as_slice(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn get(&self, id: &str) -> Option<&Junction> {
        self.junctions
            .binary_search_by(|j| j.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.junctions[i])
    }
}
