//! Transcript and sequence data access.
//!
//! The engine is a pure function of its inputs: every projection call reads
//! one immutable [`TranscriptRecord`] snapshot through the
//! [`TranscriptProvider`] trait and never writes back. [`InMemoryProvider`]
//! is the bundled implementation, populated programmatically or from a JSON
//! file (plain or gzip).
//!
//! # JSON format
//!
//! ```json
//! {
//!   "transcripts": {
//!     "NM_004119.2": {
//!       "contig": "NC_000013.10",
//!       "strand": "-",
//!       "exons": [[28674583, 28674729, 0, 146], ...],
//!       "gaps": [null, "M185 I3 M250", ...],
//!       "cds_start": 96,
//!       "cds_end": 3078,
//!       "tx_sequence": "GCAGC...",
//!       "protein": "NP_004110.2"
//!     }
//!   },
//!   "contigs": {
//!     "NC_000013.10": { "offset": 28600000, "sequence": "ACGT..." }
//!   }
//! }
//! ```
//!
//! Exon arrays are `[g_start, g_end, t_start, t_end]`, 0-based half-open on
//! both axes; `gaps` holds per-exon GFF3 Gap strings. Contig sequences may
//! carry an `offset` so fixtures only store the relevant slab.

use crate::align::{parse_gap, GapOp, Strand, TranscriptAlignment};
use crate::codon::ReadingFrame;
use crate::error::TxliftError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Everything the engine needs to know about one transcript.
#[derive(Debug, Clone)]
pub struct TranscriptRecord {
    pub alignment: TranscriptAlignment,
    /// Coding region, `None` for non-coding transcripts.
    pub reading_frame: Option<ReadingFrame>,
    /// Full transcript sequence (exonic bases, transcript orientation).
    pub tx_sequence: String,
    /// Accession of the translated protein, if any.
    pub protein_accession: Option<String>,
}

/// Read-only access to transcript records and genomic sequence.
pub trait TranscriptProvider {
    /// Look up a transcript record by accession.
    fn record(&self, accession: &str) -> Result<&TranscriptRecord, TxliftError>;

    /// Fetch genomic sequence for a 0-based half-open span, in plus-strand
    /// orientation.
    fn genomic_sequence(
        &self,
        contig: &str,
        g_start: u64,
        g_end: u64,
    ) -> Result<String, TxliftError>;
}

/// A contig sequence slab, optionally offset from the contig start.
#[derive(Debug, Clone)]
struct ContigSlab {
    offset: u64,
    sequence: String,
}

/// In-memory provider backed by hash maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    transcripts: HashMap<String, TranscriptRecord>,
    contigs: HashMap<String, ContigSlab>,
    /// Base accession (no version) to the versioned accession we hold.
    base_to_versioned: HashMap<String, String>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transcript record.
    pub fn add_transcript(&mut self, accession: impl Into<String>, record: TranscriptRecord) {
        let accession = accession.into();
        if let Some(base) = accession.split('.').next() {
            self.base_to_versioned
                .insert(base.to_string(), accession.clone());
        }
        self.transcripts.insert(accession, record);
    }

    /// Register a contig sequence. `offset` is the 0-based genomic position
    /// of the first stored base.
    pub fn add_contig(&mut self, contig: impl Into<String>, offset: u64, sequence: impl Into<String>) {
        self.contigs.insert(
            contig.into(),
            ContigSlab {
                offset,
                sequence: sequence.into(),
            },
        );
    }

    /// Load from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TxliftError> {
        let file = File::open(path.as_ref()).map_err(|e| TxliftError::Io {
            msg: format!("failed to open transcript file: {}", e),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load from a gzip-compressed JSON file.
    pub fn from_json_gz<P: AsRef<Path>>(path: P) -> Result<Self, TxliftError> {
        let file = File::open(path.as_ref()).map_err(|e| TxliftError::Io {
            msg: format!("failed to open transcript file: {}", e),
        })?;
        let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
        Self::from_reader(BufReader::new(decoder))
    }

    /// Load from any reader producing the JSON format above.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TxliftError> {
        let raw: RawFile = serde_json::from_reader(reader)?;
        let mut provider = Self::new();

        for (accession, tx) in raw.transcripts {
            let gaps = parse_gap_column(&accession, &tx.gaps, tx.exons.len());
            let strand = Strand::parse(&tx.strand).ok_or_else(|| {
                TxliftError::AlignmentInconsistency {
                    transcript: accession.clone(),
                    msg: format!("unrecognized strand {:?}", tx.strand),
                }
            })?;
            let alignment =
                TranscriptAlignment::from_exons(&accession, tx.contig, strand, &tx.exons, &gaps)?;

            let reading_frame = match (tx.cds_start, tx.cds_end) {
                (Some(start), Some(end)) => Some(ReadingFrame::new(start, end)),
                _ => None,
            };

            provider.add_transcript(
                accession,
                TranscriptRecord {
                    alignment,
                    reading_frame,
                    tx_sequence: tx.tx_sequence,
                    protein_accession: tx.protein,
                },
            );
        }

        for (name, contig) in raw.contigs {
            provider.add_contig(name, contig.offset, contig.sequence);
        }

        Ok(provider)
    }
}

impl TranscriptProvider for InMemoryProvider {
    fn record(&self, accession: &str) -> Result<&TranscriptRecord, TxliftError> {
        if let Some(record) = self.transcripts.get(accession) {
            return Ok(record);
        }
        // Version fallback: NM_000088.2 resolves to whichever NM_000088.x
        // we hold.
        if let Some(base) = accession.split('.').next() {
            if let Some(versioned) = self.base_to_versioned.get(base) {
                if let Some(record) = self.transcripts.get(versioned) {
                    log::debug!("{} resolved via version fallback to {}", accession, versioned);
                    return Ok(record);
                }
            }
        }
        Err(TxliftError::ReferenceNotFound {
            id: accession.to_string(),
        })
    }

    fn genomic_sequence(
        &self,
        contig: &str,
        g_start: u64,
        g_end: u64,
    ) -> Result<String, TxliftError> {
        let slab = self
            .contigs
            .get(contig)
            .ok_or_else(|| TxliftError::SequenceNotFound {
                id: contig.to_string(),
            })?;

        if g_start < slab.offset
            || g_end < g_start
            || (g_end - slab.offset) as usize > slab.sequence.len()
        {
            return Err(TxliftError::SequenceNotFound {
                id: format!("{}:{}-{}", contig, g_start, g_end),
            });
        }

        let lo = (g_start - slab.offset) as usize;
        let hi = (g_end - slab.offset) as usize;
        Ok(slab.sequence[lo..hi].to_uppercase())
    }
}

/// Parse the per-exon gap column, tolerating malformed entries.
///
/// A gap string that fails to parse is dropped with a warning and the exon
/// treated as gapless; alignment validation then decides whether the record
/// is still usable.
fn parse_gap_column(
    accession: &str,
    gaps: &[Option<String>],
    exon_count: usize,
) -> Vec<Option<Vec<GapOp>>> {
    let mut out = Vec::with_capacity(exon_count);
    for i in 0..exon_count {
        let parsed = match gaps.get(i).and_then(|g| g.as_deref()) {
            Some(s) => match parse_gap(s) {
                Ok(ops) => Some(ops),
                Err(err) => {
                    log::warn!("{}: malformed gap string {:?}: {}", accession, s, err);
                    None
                }
            },
            None => None,
        };
        out.push(parsed);
    }
    out
}

#[derive(Debug, Deserialize)]
struct RawFile {
    #[serde(default)]
    transcripts: HashMap<String, RawTranscript>,
    #[serde(default)]
    contigs: HashMap<String, RawContig>,
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    contig: String,
    strand: String,
    exons: Vec<[u64; 4]>,
    #[serde(default)]
    gaps: Vec<Option<String>>,
    #[serde(default)]
    cds_start: Option<u64>,
    #[serde(default)]
    cds_end: Option<u64>,
    tx_sequence: String,
    #[serde(default)]
    protein: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContig {
    #[serde(default)]
    offset: u64,
    sequence: String,
}
