//! Coordinate projection and protein consequence prediction for HGVS-style
//! variant descriptors.
//!
//! Given a parsed variant descriptor, a transcript-to-genome alignment, and
//! a reading frame, this crate projects the variant between genomic (`g.`)
//! and transcript (`c.`) coordinates and predicts the protein (`p.`)
//! consequence. Intronic positions use offset notation (`c.1837+21`);
//! insertions and duplications crossing a splice boundary keep their literal
//! payload; anything the alignment cannot place deterministically becomes an
//! explicit error, or `p.?` at the protein layer, never a guess.
//!
//! Nomenclature parsing and reference data retrieval are out of scope:
//! descriptors arrive as structured values and alignments come from a
//! [`TranscriptProvider`].
//!
//! # Example
//!
//! ```
//! use txlift::{
//!     CdsInterval, CdsPos, CdsVariant, ConsequenceCalculator, InMemoryProvider, NaEdit,
//!     ReadingFrame, Strand, TranscriptAlignment, TranscriptRecord, VariantProjector,
//! };
//!
//! # fn main() -> txlift::Result<()> {
//! // A single-exon transcript with a 6-base 5' UTR and a 7-codon CDS.
//! let tx_sequence = "GGGAAAATGGCTTGGAAAGTGCTGTAAGGGCCCGGGCCC".to_string();
//! let alignment = TranscriptAlignment::from_exons(
//!     "NM_EX.1",
//!     "chr1".to_string(),
//!     Strand::Plus,
//!     &[[1000, 1039, 0, 39]],
//!     &[None],
//! )?;
//! let mut provider = InMemoryProvider::new();
//! provider.add_contig("chr1", 1000, tx_sequence.clone());
//! provider.add_transcript(
//!     "NM_EX.1",
//!     TranscriptRecord {
//!         alignment,
//!         reading_frame: Some(ReadingFrame::new(6, 27)),
//!         tx_sequence,
//!         protein_accession: Some("NP_EX.1".to_string()),
//!     },
//! );
//!
//! let variant = CdsVariant::new(
//!     "NM_EX.1",
//!     CdsInterval::point(CdsPos::new(5)),
//!     NaEdit::Substitution {
//!         reference: "C".to_string(),
//!         alternative: "A".to_string(),
//!     },
//! );
//!
//! let projector = VariantProjector::new(&provider);
//! assert_eq!(
//!     projector.cds_to_genome(&variant)?.to_string(),
//!     "chr1:g.1011C>A"
//! );
//!
//! let calculator = ConsequenceCalculator::new(&provider);
//! assert_eq!(
//!     calculator.consequence(&variant)?.to_string(),
//!     "NP_EX.1:p.(Ala2Asp)"
//! );
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod codon;
pub mod consequence;
pub mod edit;
pub mod error;
pub mod position;
pub mod project;
pub mod provider;
pub mod translate;
pub mod variant;

pub use align::{AlignmentBlock, BlockOp, GapOp, Strand, TranscriptAlignment};
pub use codon::{CodonTable, ReadingFrame, Translation};
pub use consequence::ConsequenceCalculator;
pub use edit::{AminoAcid, AminoAcidSeq, NaEdit, ProteinEdit};
pub use error::TxliftError;
pub use position::{
    CdsInterval, CdsPos, GenomeInterval, GenomePos, ProtLoc, ProtPos,
};
pub use project::{TranscriptEdit, VariantProjector};
pub use provider::{InMemoryProvider, TranscriptProvider, TranscriptRecord};
pub use translate::{CoordinateTranslator, TxSite};
pub use variant::{
    CdsVariant, CoordinateSystem, GenomeVariant, ProteinConsequence, ProteinVariant,
};

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, TxliftError>;
