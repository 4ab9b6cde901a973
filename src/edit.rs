//! Edit types for nucleotide and protein variants.
//!
//! The edit kind set is fixed by the nomenclature grammar, so both enums are
//! closed tagged variants matched exhaustively by the projector and the
//! consequence calculator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nucleotide-level edit, shared between g. and c. descriptors.
///
/// Payload sequences are uppercase DNA in the orientation of the descriptor's
/// own coordinate system; the projector reverse-complements them when
/// crossing strands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NaEdit {
    /// Single-base substitution (e.g. `A>G`).
    Substitution { reference: String, alternative: String },
    /// Deletion of the spanned interval.
    Deletion,
    /// Insertion between the two anchor positions.
    Insertion { sequence: String },
    /// Duplication of the spanned interval.
    Duplication,
    /// Deletion of the spanned interval with insertion of a new sequence.
    DelIns { sequence: String },
    /// Inversion of the spanned interval.
    Inversion,
    /// No change.
    Identity,
}

impl fmt::Display for NaEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => write!(f, "{}>{}", reference, alternative),
            NaEdit::Deletion => write!(f, "del"),
            NaEdit::Insertion { sequence } => write!(f, "ins{}", sequence),
            NaEdit::Duplication => write!(f, "dup"),
            NaEdit::DelIns { sequence } => write!(f, "delins{}", sequence),
            NaEdit::Inversion => write!(f, "inv"),
            NaEdit::Identity => write!(f, "="),
        }
    }
}

/// Check that a payload contains only unambiguous DNA bases.
pub fn is_dna(sequence: &str) -> bool {
    !sequence.is_empty() && sequence.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// Reverse complement of an uppercase DNA sequence. Non-ACGT characters are
/// passed through unchanged (N stays N).
pub fn reverse_complement(sequence: &str) -> String {
    sequence
        .chars()
        .rev()
        .map(|c| match c.to_ascii_uppercase() {
            'A' => 'T',
            'T' => 'A',
            'C' => 'G',
            'G' => 'C',
            other => other,
        })
        .collect()
}

/// Amino acid, displayed as the 3-letter code used in p. notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala, // A
    Arg, // R
    Asn, // N
    Asp, // D
    Cys, // C
    Gln, // Q
    Glu, // E
    Gly, // G
    His, // H
    Ile, // I
    Leu, // L
    Lys, // K
    Met, // M
    Phe, // F
    Pro, // P
    Ser, // S
    Thr, // T
    Trp, // W
    Tyr, // Y
    Val, // V
    Ter, // * (stop codon)
    Xaa, // X (unknown)
}

impl AminoAcid {
    /// Parse from 3-letter code.
    pub fn from_three_letter(s: &str) -> Option<Self> {
        match s {
            "Ala" => Some(Self::Ala),
            "Arg" => Some(Self::Arg),
            "Asn" => Some(Self::Asn),
            "Asp" => Some(Self::Asp),
            "Cys" => Some(Self::Cys),
            "Gln" => Some(Self::Gln),
            "Glu" => Some(Self::Glu),
            "Gly" => Some(Self::Gly),
            "His" => Some(Self::His),
            "Ile" => Some(Self::Ile),
            "Leu" => Some(Self::Leu),
            "Lys" => Some(Self::Lys),
            "Met" => Some(Self::Met),
            "Phe" => Some(Self::Phe),
            "Pro" => Some(Self::Pro),
            "Ser" => Some(Self::Ser),
            "Thr" => Some(Self::Thr),
            "Trp" => Some(Self::Trp),
            "Tyr" => Some(Self::Tyr),
            "Val" => Some(Self::Val),
            "Ter" => Some(Self::Ter),
            "Xaa" => Some(Self::Xaa),
            _ => None,
        }
    }

    /// 3-letter code.
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Ter => "Ter",
            Self::Xaa => "Xaa",
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

/// A run of amino acids, displayed as concatenated 3-letter codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AminoAcidSeq(pub Vec<AminoAcid>);

impl AminoAcidSeq {
    pub fn new(residues: Vec<AminoAcid>) -> Self {
        Self(residues)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AminoAcidSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for aa in &self.0 {
            write!(f, "{}", aa.to_three_letter())?;
        }
        Ok(())
    }
}

/// Protein-level edit, rendered after the protein location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProteinEdit {
    /// Single residue change (e.g. `Val600Glu`); the reference residue is
    /// part of the location.
    Substitution { alternative: AminoAcid },
    /// Deletion of the located residue range.
    Deletion,
    /// Insertion between two flanking residues (e.g. `Lys614_Val615ins...`).
    Insertion { sequence: AminoAcidSeq },
    /// Replacement of the located range.
    DelIns { sequence: AminoAcidSeq },
    /// Frameshift: `new_aa` is the residue appearing at the first affected
    /// position, `ter_pos` the 1-based codon offset of the new stop counted
    /// from that residue. `None` means no stop before the transcript end
    /// (`fsTer?`).
    Frameshift {
        new_aa: AminoAcid,
        ter_pos: Option<u64>,
    },
    /// Silent change at the located residue (`Gly613=`).
    Identity,
}

impl fmt::Display for ProteinEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProteinEdit::Substitution { alternative } => write!(f, "{}", alternative),
            ProteinEdit::Deletion => write!(f, "del"),
            ProteinEdit::Insertion { sequence } => write!(f, "ins{}", sequence),
            ProteinEdit::DelIns { sequence } => write!(f, "delins{}", sequence),
            ProteinEdit::Frameshift { new_aa, ter_pos } => {
                write!(f, "{}fsTer", new_aa)?;
                match ter_pos {
                    Some(pos) => write!(f, "{}", pos),
                    None => write!(f, "?"),
                }
            }
            ProteinEdit::Identity => write!(f, "="),
        }
    }
}
