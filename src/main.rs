//! SpliceAdjacency CLI entry point
//!
//! Detects de novo exons from junction gaps and writes the exon-junction
//! adjacency table.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use splice_adjacency::core::{DetectorConfig, LogObserver, MemoryStore, MAX_DE_NOVO_EXON_LENGTH};
use splice_adjacency::formats::{self, junctions, JunctionColumns};
use splice_adjacency::pipeline::{ExonJunctionAdjacencies, NOVEL_EXONS_GTF};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "splice-adjacency")]
#[command(about = "Exon-junction adjacency and de novo exon inference")]
#[command(version)]
#[command(author = "SpliceAdjacency Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Inputs and detector settings shared by all subcommands
#[derive(Args)]
struct InputArgs {
    /// Splice junction table (tab-separated, or comma-separated for .csv)
    junctions: PathBuf,
    /// Gene annotation (GTF/GFF, optionally gzip/bzip2 compressed)
    annotation: PathBuf,
    /// Maximum gap between two junctions for a de novo exon
    #[arg(long = "max-de-novo-exon-length", default_value_t = MAX_DE_NOVO_EXON_LENGTH)]
    max_de_novo_exon_length: u64,
    /// Number of threads for the junction pair scan
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
    /// Junction id column
    #[arg(long = "junction-id-col", default_value = junctions::JUNCTION_ID)]
    junction_id: String,
    /// Exon start column
    #[arg(long = "exon-start-col", default_value = junctions::EXON_START)]
    exon_start: String,
    /// Exon stop column
    #[arg(long = "exon-stop-col", default_value = junctions::EXON_STOP)]
    exon_stop: String,
    /// Chromosome column
    #[arg(long = "chrom-col", default_value = junctions::CHROM)]
    chrom: String,
    /// Strand column
    #[arg(long = "strand-col", default_value = junctions::STRAND)]
    strand: String,
}

impl InputArgs {
    fn columns(&self) -> JunctionColumns {
        JunctionColumns {
            junction_id: self.junction_id.clone(),
            exon_start: self.exon_start.clone(),
            exon_stop: self.exon_stop.clone(),
            chrom: self.chrom.clone(),
            strand: self.strand.clone(),
        }
    }

    fn config(&self) -> DetectorConfig {
        DetectorConfig {
            max_de_novo_exon_length: self.max_de_novo_exon_length,
            threads: self.threads,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect de novo exons and write them as GTF
    DeNovo {
        #[command(flatten)]
        input: InputArgs,
        /// Output GTF (default: novel_exons.gtf)
        output: Option<PathBuf>,
    },
    /// Write the exon-junction adjacency table
    Adjacencies {
        #[command(flatten)]
        input: InputArgs,
        /// Output table (default: junction_exon_triples.tsv)
        output: Option<PathBuf>,
        /// Skip de novo exon detection
        #[arg(long = "no-de-novo")]
        no_de_novo: bool,
        /// Also write detected de novo exons to this GTF
        #[arg(long = "novel-exons")]
        novel_exons: Option<PathBuf>,
    },
}

fn load_inputs(input: &InputArgs) -> anyhow::Result<(ExonJunctionAdjacencies, MemoryStore)> {
    let start = Instant::now();
    eprintln!("Loading junction table: {:?}", input.junctions);
    let table = formats::load_junction_table(&input.junctions, &input.columns())
        .with_context(|| format!("Failed to load junction table {:?}", input.junctions))?;

    eprintln!("Loading annotation: {:?}", input.annotation);
    let store = formats::load_annotation(&input.annotation)
        .with_context(|| format!("Failed to load annotation {:?}", input.annotation))?;
    eprintln!(
        "Loaded {} junctions and {} features in {:.2}s",
        table.len(),
        store.len(),
        start.elapsed().as_secs_f64()
    );

    let adjacencies = ExonJunctionAdjacencies::new(table, input.config());
    Ok((adjacencies, store))
}

fn detect(adjacencies: &ExonJunctionAdjacencies, store: &mut MemoryStore) -> anyhow::Result<()> {
    let stats = adjacencies
        .detect_exons_from_junctions(store, &LogObserver)
        .context("De novo exon detection failed")?;

    eprintln!("\n=== De Novo Exon Detection ===");
    eprintln!("Junction pairs:  {}", stats.pairs_examined);
    eprintln!("Overlapping:     {}", stats.overlapping_pairs);
    eprintln!("Candidates:      {}", stats.candidates);
    eprintln!("Exons added:     {}", stats.exons_inserted);
    eprintln!("Already present: {}", stats.exons_existing);
    Ok(())
}

fn export_novel(adjacencies: &ExonJunctionAdjacencies, store: &MemoryStore, path: &Path) -> anyhow::Result<()> {
    let n = adjacencies
        .write_de_novo_exons(store, path)
        .with_context(|| format!("Failed to write de novo exons to {:?}", path))?;
    eprintln!("Wrote {} de novo exons to {:?}", n, path);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::DeNovo { input, output } => {
            let (adjacencies, mut store) = load_inputs(&input)?;
            detect(&adjacencies, &mut store)?;

            let output_path = output.unwrap_or_else(|| PathBuf::from(NOVEL_EXONS_GTF));
            export_novel(&adjacencies, &store, &output_path)?;
        }

        Commands::Adjacencies { input, output, no_de_novo, novel_exons } => {
            let (adjacencies, mut store) = load_inputs(&input)?;
            if !no_de_novo {
                detect(&adjacencies, &mut store)?;
            }
            if let Some(path) = novel_exons {
                export_novel(&adjacencies, &store, &path)?;
            }

            let output_path = output.unwrap_or_else(|| PathBuf::from("junction_exon_triples.tsv"));
            eprintln!("Resolving adjacencies: {:?}", output_path);
            let triples = adjacencies.neighboring_exons(&store, &LogObserver);
            let n = formats::write_adjacency_file(&triples, &output_path)
                .with_context(|| format!("Failed to write {:?}", output_path))?;

            eprintln!("\n=== Adjacency Statistics ===");
            eprintln!("Junctions:       {}", adjacencies.junctions().len());
            eprintln!("Triples:         {}", n);
        }
    }

    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
