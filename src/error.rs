//! Error types for txlift
//!
//! The error taxonomy mirrors the layering of the engine:
//!
//! - `AlignmentInconsistency` is fatal for a transcript: the supplied
//!   exon/gap structure does not tile both coordinate spaces.
//! - `PositionOutOfRange` / `NoIntronicProjection` / `AmbiguousProjection`
//!   are positional failures raised by the coordinate translator.
//! - `UnmappableVariant` wraps positional failures at the variant projector
//!   layer; the protein consequence calculator converts it into the
//!   terminal uncertain state (`p.?`) rather than guessing.

use thiserror::Error;

/// Errors produced by alignment validation, coordinate translation, and
/// variant projection.
#[derive(Debug, Error)]
pub enum TxliftError {
    /// The supplied alignment blocks are discontinuous, overlapping, or out
    /// of order. Rejects the transcript entirely.
    #[error("inconsistent alignment for {transcript}: {msg}")]
    AlignmentInconsistency { transcript: String, msg: String },

    /// A position lies outside the defined transcript or genomic span.
    #[error("position {pos} out of range: {msg}")]
    PositionOutOfRange { pos: i64, msg: String },

    /// An intronic position has no meaning in the requested target system.
    #[error("intronic position {pos}{offset:+} has no projection in the target system")]
    NoIntronicProjection { pos: i64, offset: i64 },

    /// An alignment gap (insertion or deletion operation) makes the
    /// target-system position undefined over the queried interval.
    #[error("ambiguous projection: {msg}")]
    AmbiguousProjection { msg: String },

    /// Whole-variant projection failure. Wraps the positional errors so
    /// callers never see a partial or garbled descriptor.
    #[error("cannot map {variant}: {msg}")]
    UnmappableVariant { variant: String, msg: String },

    /// No transcript record for the requested accession.
    #[error("reference not found: {id}")]
    ReferenceNotFound { id: String },

    /// The provider has no sequence for the requested contig or span.
    #[error("sequence not available: {id}")]
    SequenceNotFound { id: String },

    /// Malformed GFF3 Gap string in alignment input.
    #[error("invalid gap string: {msg}")]
    InvalidGap { msg: String },

    /// Provider file I/O failure.
    #[error("I/O error: {msg}")]
    Io { msg: String },

    /// Provider JSON parse failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TxliftError {
    /// True for the positional errors that the protein layer converts into
    /// the uncertain terminal state.
    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            TxliftError::PositionOutOfRange { .. }
                | TxliftError::NoIntronicProjection { .. }
                | TxliftError::AmbiguousProjection { .. }
                | TxliftError::UnmappableVariant { .. }
        )
    }
}
