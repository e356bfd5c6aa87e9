//! GFF/GTF format adapter
//!
//! Loads gene, transcript and exon records into a `MemoryStore` and renders
//! features back as GTF lines (used for the de novo exon export).
//! Coordinates are 1-based and closed on both sides.

use crate::core::io::{ByteLineIterator, SmartReader};
use crate::core::{
    exon_id, AnnotationStore, Attributes, Feature, FeatureType, FormatError, MemoryStore,
    Result, Strand,
};
use memchr::memchr;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// GFF/GTF parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GffParseError {
    EmptyLine,
    TooFewFields { expected: usize, found: usize },
    InvalidUtf8(&'static str),
    InvalidNumber(&'static str, String),
}

impl std::fmt::Display for GffParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GffParseError::EmptyLine => write!(f, "Empty line"),
            GffParseError::TooFewFields { expected, found } => {
                write!(f, "Too few fields: expected {}, found {}", expected, found)
            }
            GffParseError::InvalidUtf8(field) => write!(f, "Invalid UTF-8 in field: {}", field),
            GffParseError::InvalidNumber(field, value) => {
                write!(f, "Invalid number in field {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for GffParseError {}

/// Zero-copy GFF/GTF record view
/// GFF format: seqname, source, feature, start, end, score, strand, frame, attributes
pub struct GffRecordView<'a> {
    pub seqname: &'a str,
    pub source: &'a str,
    pub feature: &'a str,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    pub strand: Strand,
    pub attributes: &'a str,
}

impl<'a> GffRecordView<'a> {
    /// Parse a GFF/GTF line with minimal allocation
    pub fn parse(line: &'a [u8]) -> std::result::Result<Self, GffParseError> {
        if line.is_empty() {
            return Err(GffParseError::EmptyLine);
        }

        // Find field boundaries using memchr for tab characters
        let mut field_bounds = Vec::with_capacity(9);
        let mut start_pos = 0;
        loop {
            match memchr(b'\t', &line[start_pos..]) {
                Some(tab_pos) => {
                    let end_pos = start_pos + tab_pos;
                    field_bounds.push((start_pos, end_pos));
                    start_pos = end_pos + 1;
                }
                None => {
                    field_bounds.push((start_pos, line.len()));
                    break;
                }
            }
        }

        if field_bounds.len() < 9 {
            return Err(GffParseError::TooFewFields {
                expected: 9,
                found: field_bounds.len(),
            });
        }

        let get_field = |idx: usize, name: &'static str| -> std::result::Result<&'a str, GffParseError> {
            let (start, end) = field_bounds[idx];
            std::str::from_utf8(&line[start..end]).map_err(|_| GffParseError::InvalidUtf8(name))
        };

        let seqname = get_field(0, "seqname")?;
        let source = get_field(1, "source")?;
        let feature = get_field(2, "feature")?;

        let start_str = get_field(3, "start")?;
        let start: u64 = start_str
            .parse()
            .map_err(|_| GffParseError::InvalidNumber("start", start_str.to_string()))?;

        let end_str = get_field(4, "end")?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| GffParseError::InvalidNumber("end", end_str.to_string()))?;

        let strand_str = get_field(6, "strand")?;
        // Unrecognized strand symbols are unstranded
        let strand = Strand::normalize(strand_str);

        let attributes = get_field(8, "attributes")?;

        Ok(Self {
            seqname,
            source,
            feature,
            start,
            end,
            strand,
            attributes,
        })
    }
}

/// Parse a GTF (`key "value";`) or GFF3 (`key=v1,v2;`) attribute column
pub fn parse_attributes(field: &str) -> Attributes {
    let mut attributes = Attributes::new();
    if field == "." {
        return attributes;
    }

    for entry in field.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let eq = entry.find('=');
        let space = entry.find(char::is_whitespace);
        match (eq, space) {
            (Some(eq), sp) if sp.map_or(true, |sp| eq < sp) => {
                let (key, values) = (&entry[..eq], &entry[eq + 1..]);
                for value in values.split(',') {
                    attributes.push(key.trim(), value.trim());
                }
            }
            (_, Some(sp)) => {
                let key = &entry[..sp];
                let value = entry[sp..].trim().trim_matches('"');
                attributes.push(key, value);
            }
            _ => attributes.push(entry, ""),
        }
    }
    attributes
}

fn location_id(prefix: &str, view: &GffRecordView) -> String {
    format!(
        "{}:{}:{}-{}:{}",
        prefix, view.seqname, view.start, view.end, view.strand
    )
}

/// Feature for a gene-model record; `None` for record types the store
/// does not keep (CDS, UTR, start_codon, ...)
pub fn feature_from_record(view: &GffRecordView) -> Option<Feature> {
    let featuretype = FeatureType::parse(view.feature);
    let attributes = parse_attributes(view.attributes);

    let id = match featuretype {
        FeatureType::Exon | FeatureType::NovelExon => {
            exon_id(view.seqname, view.start, view.end, view.strand)
        }
        FeatureType::Gene => attributes
            .first("gene_id")
            .or_else(|| attributes.first("ID"))
            .map(str::to_string)
            .unwrap_or_else(|| location_id("gene", view)),
        FeatureType::Transcript => attributes
            .first("transcript_id")
            .or_else(|| attributes.first("ID"))
            .map(str::to_string)
            .unwrap_or_else(|| location_id("transcript", view)),
        FeatureType::Other(_) => return None,
    };

    Some(
        Feature::new(id, view.seqname, featuretype, view.start, view.end, view.strand)
            .with_source(view.source)
            .with_attributes(attributes),
    )
}

/// Read gene-model features from GTF/GFF text into a new store
///
/// The first record wins when two records map to the same id (e.g. an
/// exon shared by several transcripts).
pub fn read_annotation<R: BufRead>(reader: R) -> Result<MemoryStore> {
    let mut lines = ByteLineIterator::new(reader);
    let mut features = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;

        if line.is_empty() {
            continue;
        }
        if line.starts_with(b"##FASTA") {
            break;
        }
        if line[0] == b'#' {
            continue;
        }

        let view = GffRecordView::parse(line).map_err(|e| FormatError::InvalidGff {
            line: line_number,
            message: e.to_string(),
        })?;
        if let Some(feature) = feature_from_record(&view) {
            features.push(feature);
        }
    }

    let store = MemoryStore::from_features(features);
    log::debug!("Loaded {} annotation features", store.len());
    Ok(store)
}

/// Load an annotation file (optionally gzip/bzip2 compressed)
pub fn load_annotation<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FormatError::FileNotFound(path.to_path_buf()).into());
    }
    read_annotation(SmartReader::open(path)?)
}

/// GTF attribute column for a feature
fn format_attributes(attributes: &Attributes) -> String {
    if attributes.is_empty() {
        return ".".to_string();
    }
    attributes
        .iter()
        .flat_map(|(key, values)| values.iter().map(move |v| format!("{} \"{}\";", key, v)))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Feature {
    /// One GTF line, without the trailing newline
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t.\t{}",
            self.seqid,
            self.source,
            self.featuretype,
            self.start,
            self.end,
            self.strand,
            format_attributes(&self.attributes)
        )
    }
}

/// Write all novel exons of the store as GTF lines, in store order
///
/// Returns the number of features written.
pub fn write_de_novo_exons<S, W>(store: &S, writer: &mut W) -> std::io::Result<usize>
where
    S: AnnotationStore + ?Sized,
    W: Write,
{
    let novel = store.features_of_type(&[FeatureType::NovelExon]);
    for exon in &novel {
        writeln!(writer, "{}", exon)?;
    }
    Ok(novel.len())
}
