//! Performance benchmarks for SpliceAdjacency
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use splice_adjacency::core::{
    find_candidate_exons, is_there_an_exon_here, neighboring_exons, scan_chromosome,
    DetectorConfig, Feature, FeatureType, Junction, JunctionTable, MemoryStore, NullObserver,
    Region, Strand,
};
use splice_adjacency::formats::GffRecordView;

/// Junctions tiled along a chromosome, alternating strand
fn synthetic_regions(chrom: &str, n: u64) -> Vec<Region> {
    (0..n)
        .map(|i| {
            let start = 1_000 + i * 150;
            let strand = if i % 2 == 0 { Strand::Plus } else { Strand::Minus };
            Region::new(chrom, start, start + 80, strand).unwrap()
        })
        .collect()
}

fn synthetic_table(chroms: usize, per_chrom: u64) -> JunctionTable {
    let junctions = (0..chroms)
        .flat_map(|c| synthetic_regions(&format!("chr{}", c + 1), per_chrom))
        .map(|r| Junction::from_id(&format!("junction:{}", r)).unwrap())
        .collect();
    JunctionTable::new(junctions).unwrap()
}

/// Benchmark the exon-between-junctions predicate
fn bench_exon_here(c: &mut Criterion) {
    let j1 = Region::parse("chr1:100-200:+").unwrap();
    let j2 = Region::parse("chr1:250-260:+").unwrap();

    c.bench_function("is_there_an_exon_here", |b| {
        b.iter(|| {
            let result = is_there_an_exon_here(black_box(&j1), black_box(&j2), black_box(100));
            black_box(result)
        })
    });
}

/// Benchmark the all-pairs scan on one chromosome
fn bench_scan_chromosome(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_chromosome");

    for size in [100u64, 500, 1000].iter() {
        let regions = synthetic_regions("chr1", *size);
        group.throughput(Throughput::Elements(size * (size - 1) / 2));
        group.bench_with_input(BenchmarkId::from_parameter(size), &regions, |b, regions| {
            b.iter(|| {
                let result = scan_chromosome(black_box(regions), 100);
                black_box(result)
            })
        });
    }

    group.finish();
}

/// Benchmark sequential vs parallel chromosome scans
fn bench_find_candidates(c: &mut Criterion) {
    let table = synthetic_table(8, 400);
    let mut group = c.benchmark_group("find_candidate_exons");

    for threads in [1usize, 4].iter() {
        let config = DetectorConfig {
            threads: *threads,
            ..DetectorConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| {
                let result = find_candidate_exons(black_box(&table), config).unwrap();
                black_box(result)
            })
        });
    }

    group.finish();
}

/// Benchmark adjacency resolution over an annotated chromosome
fn bench_neighboring_exons(c: &mut Criterion) {
    let table = synthetic_table(1, 5_000);
    let exons = (0..5_000u64).map(|i| {
        let start = 1_000 + i * 150 + 81;
        let stop = start + 68;
        let strand = if i % 2 == 0 { Strand::Plus } else { Strand::Minus };
        Feature::new(
            splice_adjacency::core::exon_id("chr1", start, stop, strand),
            "chr1",
            FeatureType::Exon,
            start,
            stop,
            strand,
        )
    });
    let store = MemoryStore::from_features(exons);

    c.bench_function("neighboring_exons", |b| {
        b.iter(|| {
            let result = neighboring_exons(black_box(&table), &store, &NullObserver);
            black_box(result)
        })
    });
}

/// Benchmark GTF line parsing
fn bench_gtf_parsing(c: &mut Criterion) {
    let line = b"chr1\tHAVANA\texon\t11869\t12227\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; transcript_id \"ENST00000456328.2\"; gene_name \"DDX11L1\";";

    c.bench_function("gtf_parsing", |b| {
        b.iter(|| {
            let result = GffRecordView::parse(black_box(line.as_slice()));
            black_box(result)
        })
    });
}

criterion_group!(
    benches,
    bench_exon_here,
    bench_scan_chromosome,
    bench_find_candidates,
    bench_neighboring_exons,
    bench_gtf_parsing,
);

criterion_main!(benches);
