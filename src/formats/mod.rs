//! File format adapters
//!
//! Adapters for the junction table, GTF/GFF annotation and the adjacency table.

pub mod gtf;
pub mod junctions;
pub mod triples;

pub use gtf::{load_annotation, read_annotation, write_de_novo_exons, GffParseError, GffRecordView};
pub use junctions::{load_junction_table, read_junction_table, JunctionColumns};
pub use triples::{write_adjacency_file, write_adjacency_table};
