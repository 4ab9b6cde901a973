//! Exon/intron alignment model.
//!
//! A transcript's relationship to its genomic context is represented as an
//! ordered list of [`AlignmentBlock`]s, each pairing a genomic span with a
//! transcript span and tagged with an operation. This is the CIGAR-like
//! structure the coordinate translator walks.
//!
//! # Coordinate Systems
//!
//! | Side | Basis | Format |
//! |------|-------|--------|
//! | Genomic (`g_start`, `g_end`) | 0-based | Half-open `[start, end)` |
//! | Transcript (`t_start`, `t_end`) | 0-based | Half-open `[start, end)` |
//!
//! Blocks are stored in transcript order. On the minus strand the genomic
//! coordinates of successive blocks therefore decrease. Within any single
//! block `g_start < g_end` still holds; the translator applies the strand
//! when converting offsets.

use crate::error::TxliftError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Genomic strand of a transcript alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Parse from the conventional string forms.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" | "1" | "plus" => Some(Strand::Plus),
            "-" | "-1" | "minus" => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// A single operation from a GFF3 Gap attribute string.
///
/// The format is letter-first and space-separated (`M185 I3 M250`), unlike
/// SAM CIGAR. `I` means bases present in the transcript but not the genome;
/// `D` means bases present in the genome but not the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapOp {
    /// Alignment match of `n` bases.
    Match(u64),
    /// `n` transcript-only bases.
    Insertion(u64),
    /// `n` genome-only bases.
    Deletion(u64),
}

/// Parse a GFF3 Gap attribute string into operations.
///
/// Returns an empty vector for empty or whitespace-only input.
///
/// # Errors
///
/// Returns [`TxliftError::InvalidGap`] for unknown operation letters or
/// non-numeric lengths.
pub fn parse_gap(gap_str: &str) -> Result<Vec<GapOp>, TxliftError> {
    let trimmed = gap_str.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split_whitespace()
        .map(|token| {
            if token.len() < 2 {
                return Err(TxliftError::InvalidGap {
                    msg: format!("token too short: '{token}'"),
                });
            }
            let (op_char, len_str) = token.split_at(1);
            let length: u64 = len_str.parse().map_err(|_| TxliftError::InvalidGap {
                msg: format!("bad length in token: '{token}'"),
            })?;
            match op_char {
                "M" => Ok(GapOp::Match(length)),
                "I" => Ok(GapOp::Insertion(length)),
                "D" => Ok(GapOp::Deletion(length)),
                _ => Err(TxliftError::InvalidGap {
                    msg: format!("unknown operation '{op_char}' in token: '{token}'"),
                }),
            }
        })
        .collect()
}

/// Block operation tag.
///
/// Introns are genome-only spans like alignment deletions, but the two are
/// deliberately distinct: a position falling in an intron gets intron-offset
/// notation, while a position falling in a true alignment deletion has no
/// defined transcript equivalent and projects ambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockOp {
    /// Both sides advance together.
    Match,
    /// Transcript-only bases (zero-length genomic span).
    TxInsertion,
    /// Genome-only bases within an exon (zero-length transcript span).
    TxDeletion,
    /// Genome-only bases between exons (zero-length transcript span).
    Intron,
}

/// One aligned block between genomic and transcript space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentBlock {
    /// Genomic start (0-based, inclusive).
    pub g_start: u64,
    /// Genomic end (0-based, exclusive).
    pub g_end: u64,
    /// Transcript start (0-based, inclusive).
    pub t_start: u64,
    /// Transcript end (0-based, exclusive).
    pub t_end: u64,
    /// Operation tag.
    pub op: BlockOp,
}

impl AlignmentBlock {
    pub fn g_len(&self) -> u64 {
        self.g_end - self.g_start
    }

    pub fn t_len(&self) -> u64 {
        self.t_end - self.t_start
    }

    pub fn contains_genome(&self, g: u64) -> bool {
        g >= self.g_start && g < self.g_end
    }

    pub fn contains_tx(&self, t: u64) -> bool {
        t >= self.t_start && t < self.t_end
    }
}

/// Validated exon/intron alignment of one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptAlignment {
    /// Genomic contig/chromosome (e.g. "NC_000005.9").
    pub contig: String,
    /// Strand of the transcript on the contig.
    pub strand: Strand,
    /// Blocks in transcript order.
    blocks: Vec<AlignmentBlock>,
}

impl TranscriptAlignment {
    /// Build from pre-assembled blocks, validating the tiling invariants.
    pub fn new(
        transcript: &str,
        contig: String,
        strand: Strand,
        blocks: Vec<AlignmentBlock>,
    ) -> Result<Self, TxliftError> {
        let alignment = Self {
            contig,
            strand,
            blocks,
        };
        alignment.validate(transcript)?;
        Ok(alignment)
    }

    /// Build from cdot-style exon arrays `[g_start, g_end, t_start, t_end]`
    /// (0-based half-open on both sides, sorted by transcript position) plus
    /// optional per-exon GFF3 Gap operations.
    ///
    /// Introns are synthesized between consecutive exons. An exon with gap
    /// operations is split into sub-blocks; on the minus strand the genomic
    /// cursor walks downward from the exon's genomic end.
    pub fn from_exons(
        transcript: &str,
        contig: String,
        strand: Strand,
        exons: &[[u64; 4]],
        gaps: &[Option<Vec<GapOp>>],
    ) -> Result<Self, TxliftError> {
        if exons.is_empty() {
            return Err(TxliftError::AlignmentInconsistency {
                transcript: transcript.to_string(),
                msg: "no exons".to_string(),
            });
        }

        let mut blocks = Vec::new();
        for (i, exon) in exons.iter().enumerate() {
            let [g_start, g_end, t_start, t_end] = *exon;

            // Intron between the previous exon and this one.
            if i > 0 {
                let prev = exons[i - 1];
                let (ig_start, ig_end) = match strand {
                    Strand::Plus => (prev[1], g_start),
                    Strand::Minus => (g_end, prev[0]),
                };
                if ig_start >= ig_end {
                    return Err(TxliftError::AlignmentInconsistency {
                        transcript: transcript.to_string(),
                        msg: format!("exons {} and {} abut or overlap genomically", i, i + 1),
                    });
                }
                blocks.push(AlignmentBlock {
                    g_start: ig_start,
                    g_end: ig_end,
                    t_start,
                    t_end: t_start,
                    op: BlockOp::Intron,
                });
            }

            let ops = gaps.get(i).and_then(|g| g.as_deref());
            match ops {
                None | Some([]) => {
                    blocks.push(AlignmentBlock {
                        g_start,
                        g_end,
                        t_start,
                        t_end,
                        op: BlockOp::Match,
                    });
                }
                Some(ops) => {
                    split_exon(strand, g_start, g_end, t_start, t_end, ops, &mut blocks).map_err(
                        |msg| TxliftError::AlignmentInconsistency {
                            transcript: transcript.to_string(),
                            msg: format!("exon {}: {}", i + 1, msg),
                        },
                    )?;
                }
            }
        }

        Self::new(transcript, contig, strand, blocks)
    }

    /// Ordered block list.
    pub fn blocks(&self) -> &[AlignmentBlock] {
        &self.blocks
    }

    /// Transcript length covered by the alignment.
    pub fn tx_len(&self) -> u64 {
        self.blocks.last().map(|b| b.t_end).unwrap_or(0)
    }

    /// Number of exons (runs of non-intron blocks).
    pub fn exon_count(&self) -> usize {
        1 + self
            .blocks
            .iter()
            .filter(|b| b.op == BlockOp::Intron)
            .count()
    }

    /// Find the block containing a transcript position. Zero-length
    /// transcript spans (introns, deletions) never match.
    pub fn block_for_tx(&self, t: u64) -> Option<&AlignmentBlock> {
        // Binary search over t_start; zero-length blocks share t_start with
        // their neighbors, so scan the small run around the partition point.
        let idx = self.blocks.partition_point(|b| b.t_end <= t);
        self.blocks[idx..].iter().find(|b| b.contains_tx(t))
    }

    /// Find the block containing a genomic position.
    pub fn block_for_genome(&self, g: u64) -> Option<&AlignmentBlock> {
        let idx = match self.strand {
            Strand::Plus => self.blocks.partition_point(|b| b.g_end <= g),
            Strand::Minus => self.blocks.partition_point(|b| b.g_start > g),
        };
        self.blocks[idx..].iter().find(|b| b.contains_genome(g))
    }

    /// Genomic span of the whole alignment as `(min, max_exclusive)`.
    pub fn genomic_span(&self) -> (u64, u64) {
        match self.strand {
            Strand::Plus => (
                self.blocks.first().map(|b| b.g_start).unwrap_or(0),
                self.blocks.last().map(|b| b.g_end).unwrap_or(0),
            ),
            Strand::Minus => (
                self.blocks.last().map(|b| b.g_start).unwrap_or(0),
                self.blocks.first().map(|b| b.g_end).unwrap_or(0),
            ),
        }
    }

    /// Blocks whose genomic span intersects `[g_start, g_end)`.
    pub fn blocks_overlapping_genome(&self, g_start: u64, g_end: u64) -> Vec<&AlignmentBlock> {
        self.blocks
            .iter()
            .filter(|b| b.g_start < g_end && b.g_end > g_start && b.g_len() > 0)
            .collect()
    }

    /// Enforce the tiling invariants on both coordinate spaces.
    ///
    /// Violations always surface as `AlignmentInconsistency`, never as a
    /// silently wrong translation later.
    fn validate(&self, transcript: &str) -> Result<(), TxliftError> {
        let fail = |msg: String| {
            Err(TxliftError::AlignmentInconsistency {
                transcript: transcript.to_string(),
                msg,
            })
        };

        if self.blocks.is_empty() {
            return fail("empty block list".to_string());
        }
        if self.blocks[0].t_start != 0 {
            return fail(format!(
                "first block starts at transcript position {}, expected 0",
                self.blocks[0].t_start
            ));
        }
        let tx_len = self.blocks[self.blocks.len() - 1].t_end;

        for (i, b) in self.blocks.iter().enumerate() {
            if b.g_start > b.g_end || b.t_start > b.t_end {
                return fail(format!("block {} has a negative-length span", i));
            }
            let shape_ok = match b.op {
                BlockOp::Match => b.g_len() == b.t_len() && b.g_len() > 0,
                BlockOp::TxInsertion => b.g_len() == 0 && b.t_len() > 0,
                BlockOp::TxDeletion | BlockOp::Intron => b.t_len() == 0 && b.g_len() > 0,
            };
            if !shape_ok {
                return fail(format!(
                    "block {} ({:?}) spans {} genomic and {} transcript bases",
                    i,
                    b.op,
                    b.g_len(),
                    b.t_len()
                ));
            }
            // Introns need a flanking exonic base on each side to anchor
            // offset notation on; this also rules out introns at the
            // alignment edge or behind a run of zero-transcript-length
            // blocks.
            if b.op == BlockOp::Intron && (b.t_start == 0 || b.t_start == tx_len) {
                return fail(format!(
                    "block {} is an intron with no flanking exonic base",
                    i
                ));
            }

            if i > 0 {
                let prev = &self.blocks[i - 1];
                if b.t_start != prev.t_end {
                    return fail(format!(
                        "transcript space discontinuity between blocks {} and {}",
                        i - 1,
                        i
                    ));
                }
                let genomic_ok = match self.strand {
                    Strand::Plus => b.g_start == prev.g_end,
                    Strand::Minus => b.g_end == prev.g_start,
                };
                if !genomic_ok {
                    return fail(format!(
                        "genomic space discontinuity between blocks {} and {}",
                        i - 1,
                        i
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Split one exon into blocks according to its gap operations.
fn split_exon(
    strand: Strand,
    g_start: u64,
    g_end: u64,
    t_start: u64,
    t_end: u64,
    ops: &[GapOp],
    out: &mut Vec<AlignmentBlock>,
) -> Result<(), String> {
    let mut t = t_start;
    // The genomic cursor walks in transcript direction: up the contig on the
    // plus strand, down from the exon end on the minus strand.
    let mut g = match strand {
        Strand::Plus => g_start,
        Strand::Minus => g_end,
    };

    for op in ops {
        match *op {
            GapOp::Match(len) => {
                let (bg_start, bg_end) = match strand {
                    Strand::Plus => (g, g + len),
                    Strand::Minus => (g - len, g),
                };
                out.push(AlignmentBlock {
                    g_start: bg_start,
                    g_end: bg_end,
                    t_start: t,
                    t_end: t + len,
                    op: BlockOp::Match,
                });
                t += len;
                g = match strand {
                    Strand::Plus => g + len,
                    Strand::Minus => g - len,
                };
            }
            GapOp::Insertion(len) => {
                let anchor = g;
                out.push(AlignmentBlock {
                    g_start: anchor,
                    g_end: anchor,
                    t_start: t,
                    t_end: t + len,
                    op: BlockOp::TxInsertion,
                });
                t += len;
            }
            GapOp::Deletion(len) => {
                let (bg_start, bg_end) = match strand {
                    Strand::Plus => (g, g + len),
                    Strand::Minus => (g - len, g),
                };
                out.push(AlignmentBlock {
                    g_start: bg_start,
                    g_end: bg_end,
                    t_start: t,
                    t_end: t,
                    op: BlockOp::TxDeletion,
                });
                g = match strand {
                    Strand::Plus => g + len,
                    Strand::Minus => g - len,
                };
            }
        }
    }

    let g_done = match strand {
        Strand::Plus => g == g_end,
        Strand::Minus => g == g_start,
    };
    if t != t_end || !g_done {
        return Err(format!(
            "gap operations cover {} transcript bases, exon spans {}",
            t - t_start,
            t_end - t_start
        ));
    }
    Ok(())
}
