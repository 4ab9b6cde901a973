//! Position and interval types for the supported coordinate systems.
//!
//! | Type | System | Basis |
//! |------|--------|-------|
//! | [`GenomePos`] | g. | 1-based |
//! | [`CdsPos`] | c. | 1-based CDS numbering, negative = 5' UTR, `*` = 3' UTR |
//! | [`ProtPos`] | p. | 1-based amino acid index |
//!
//! A [`CdsPos`] carries an optional intron offset. The invariant, enforced
//! by the coordinate translator, is that a non-zero offset always anchors on
//! the nearest flanking exonic base: `c.1837+21` means 21 bases into the
//! intron after the exon ending at c.1837. Offset zero is never emitted; a
//! position exactly at an exon boundary belongs to the exon.

use crate::edit::AminoAcid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Genomic position (g. coordinates), 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomePos {
    pub base: u64,
}

impl GenomePos {
    pub fn new(base: u64) -> Self {
        Self { base }
    }
}

impl fmt::Display for GenomePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

/// CDS position (c. coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CdsPos {
    /// Base position: positive CDS numbering, negative for 5' UTR. With
    /// `utr3` set, the position counts forward from the stop codon.
    pub base: i64,
    /// Intron offset (`+` downstream of a donor, `-` upstream of an
    /// acceptor). `None` for exonic positions.
    pub offset: Option<i64>,
    /// `*` notation: position downstream of the stop codon.
    pub utr3: bool,
}

impl CdsPos {
    /// Exonic CDS position.
    pub fn new(base: i64) -> Self {
        Self {
            base,
            offset: None,
            utr3: false,
        }
    }

    /// CDS position with an intron offset.
    pub fn with_offset(base: i64, offset: i64) -> Self {
        Self {
            base,
            offset: Some(offset),
            utr3: false,
        }
    }

    /// 3' UTR position (`*` notation).
    pub fn utr3(base: i64) -> Self {
        Self {
            base,
            offset: None,
            utr3: true,
        }
    }

    pub fn is_intronic(&self) -> bool {
        matches!(self.offset, Some(o) if o != 0)
    }

    pub fn is_5utr(&self) -> bool {
        !self.utr3 && self.base < 0
    }

    pub fn is_3utr(&self) -> bool {
        self.utr3
    }

    /// Intron offset, zero for exonic positions.
    pub fn offset_or_zero(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

impl fmt::Display for CdsPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.utr3 {
            write!(f, "*{}", self.base)?;
        } else {
            write!(f, "{}", self.base)?;
        }
        if let Some(offset) = self.offset {
            if offset >= 0 {
                write!(f, "+{}", offset)?;
            } else {
                write!(f, "{}", offset)?;
            }
        }
        Ok(())
    }
}

/// Protein position: reference amino acid plus 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtPos {
    pub aa: AminoAcid,
    pub number: u64,
}

impl ProtPos {
    pub fn new(aa: AminoAcid, number: u64) -> Self {
        Self { aa, number }
    }
}

impl fmt::Display for ProtPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.aa.to_three_letter(), self.number)
    }
}

/// Genomic interval, inclusive on both ends, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeInterval {
    pub start: GenomePos,
    pub end: GenomePos,
}

impl GenomeInterval {
    pub fn new(start: GenomePos, end: GenomePos) -> Self {
        debug_assert!(
            start.base <= end.base,
            "interval start {} after end {}",
            start.base,
            end.base
        );
        Self { start, end }
    }

    pub fn point(pos: GenomePos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u64 {
        self.end.base - self.start.base + 1
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for GenomeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}_{}", self.start, self.end)
        }
    }
}

/// CDS interval, inclusive on both ends in transcript order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CdsInterval {
    pub start: CdsPos,
    pub end: CdsPos,
}

impl CdsInterval {
    pub fn new(start: CdsPos, end: CdsPos) -> Self {
        Self { start, end }
    }

    pub fn point(pos: CdsPos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for CdsInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}_{}", self.start, self.end)
        }
    }
}

/// Protein location: a single residue or a residue range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtLoc {
    Single(ProtPos),
    Range(ProtPos, ProtPos),
}

impl fmt::Display for ProtLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtLoc::Single(pos) => write!(f, "{}", pos),
            ProtLoc::Range(start, end) => write!(f, "{}_{}", start, end),
        }
    }
}
