//! Variant descriptors and canonical rendering.
//!
//! One immutable struct per coordinate system. Projection never mutates a
//! descriptor in place; each hop constructs a new value. The `Display` impls
//! are the formatter: they are pure and total over valid descriptors, so a
//! descriptor that exists can always be rendered.

use crate::edit::{NaEdit, ProteinEdit};
use crate::position::{CdsInterval, GenomeInterval, ProtLoc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate system tag, rendered as the descriptor prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    Genome,
    Cds,
    Protein,
}

impl CoordinateSystem {
    pub fn prefix(&self) -> &'static str {
        match self {
            CoordinateSystem::Genome => "g.",
            CoordinateSystem::Cds => "c.",
            CoordinateSystem::Protein => "p.",
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A g. variant: contig accession, interval, edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeVariant {
    pub accession: String,
    pub interval: GenomeInterval,
    pub edit: NaEdit,
}

impl GenomeVariant {
    pub fn new(accession: impl Into<String>, interval: GenomeInterval, edit: NaEdit) -> Self {
        Self {
            accession: accession.into(),
            interval,
            edit,
        }
    }
}

impl fmt::Display for GenomeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:g.{}{}", self.accession, self.interval, self.edit)
    }
}

/// A c. variant: transcript accession, CDS interval, edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CdsVariant {
    pub accession: String,
    pub interval: CdsInterval,
    pub edit: NaEdit,
}

impl CdsVariant {
    pub fn new(accession: impl Into<String>, interval: CdsInterval, edit: NaEdit) -> Self {
        Self {
            accession: accession.into(),
            interval,
            edit,
        }
    }
}

impl fmt::Display for CdsVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:c.{}{}", self.accession, self.interval, self.edit)
    }
}

/// Predicted protein consequence.
///
/// All computed consequences are predictions, rendered in parentheses
/// (`p.(Gly613=)`). `Uncertain` is the terminal state for anything the
/// engine declines to predict and renders as the bare `p.?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProteinConsequence {
    /// A located edit, e.g. `(Tyr733AspfsTer8)`.
    Predicted { location: ProtLoc, edit: ProteinEdit },
    /// Start codon disrupted: `(Met1?)`.
    StartLost,
    /// No prediction possible: `?`.
    Uncertain,
}

impl fmt::Display for ProteinConsequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProteinConsequence::Predicted { location, edit } => {
                write!(f, "({}{})", location, edit)
            }
            ProteinConsequence::StartLost => write!(f, "(Met1?)"),
            ProteinConsequence::Uncertain => write!(f, "?"),
        }
    }
}

/// A p. variant: protein accession plus consequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProteinVariant {
    pub accession: String,
    pub consequence: ProteinConsequence,
}

impl ProteinVariant {
    pub fn new(accession: impl Into<String>, consequence: ProteinConsequence) -> Self {
        Self {
            accession: accession.into(),
            consequence,
        }
    }

    pub fn uncertain(accession: impl Into<String>) -> Self {
        Self::new(accession, ProteinConsequence::Uncertain)
    }
}

impl fmt::Display for ProteinVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:p.{}", self.accession, self.consequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{AminoAcid, AminoAcidSeq};
    use crate::position::{CdsPos, GenomePos, ProtPos};

    #[test]
    fn test_genome_variant_display() {
        let v = GenomeVariant::new(
            "NC_000017.10",
            GenomeInterval::point(GenomePos::new(29562981)),
            NaEdit::Substitution {
                reference: "C".to_string(),
                alternative: "T".to_string(),
            },
        );
        assert_eq!(v.to_string(), "NC_000017.10:g.29562981C>T");
    }

    #[test]
    fn test_cds_variant_display() {
        let v = CdsVariant::new(
            "NM_004119.2",
            CdsInterval::new(CdsPos::with_offset(1837, 21), CdsPos::with_offset(1837, 22)),
            NaEdit::Insertion {
                sequence: "CGAG".to_string(),
            },
        );
        assert_eq!(v.to_string(), "NM_004119.2:c.1837+21_1837+22insCGAG");

        let dup = CdsVariant::new(
            "NM_004119.2",
            CdsInterval::new(CdsPos::new(1835), CdsPos::with_offset(1837, 3)),
            NaEdit::Duplication,
        );
        assert_eq!(dup.to_string(), "NM_004119.2:c.1835_1837+3dup");
    }

    #[test]
    fn test_protein_variant_display() {
        let v = ProteinVariant::new(
            "NP_004110.2",
            ProteinConsequence::Predicted {
                location: ProtLoc::Range(
                    ProtPos::new(AminoAcid::Gly, 613),
                    ProtPos::new(AminoAcid::Lys, 614),
                ),
                edit: ProteinEdit::Insertion {
                    sequence: AminoAcidSeq::new(vec![AminoAcid::Ile, AminoAcid::Gly]),
                },
            },
        );
        assert_eq!(v.to_string(), "NP_004110.2:p.(Gly613_Lys614insIleGly)");

        let fs = ProteinVariant::new(
            "NP_004447.2",
            ProteinConsequence::Predicted {
                location: ProtLoc::Single(ProtPos::new(AminoAcid::Tyr, 733)),
                edit: ProteinEdit::Frameshift {
                    new_aa: AminoAcid::Asp,
                    ter_pos: Some(8),
                },
            },
        );
        assert_eq!(fs.to_string(), "NP_004447.2:p.(Tyr733AspfsTer8)");
    }

    #[test]
    fn test_uncertain_is_bare() {
        let v = ProteinVariant::uncertain("NP_000258.1");
        assert_eq!(v.to_string(), "NP_000258.1:p.?");
    }

    #[test]
    fn test_start_lost_display() {
        let v = ProteinVariant::new("NP_1.1", ProteinConsequence::StartLost);
        assert_eq!(v.to_string(), "NP_1.1:p.(Met1?)");
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(CoordinateSystem::Genome.prefix(), "g.");
        assert_eq!(CoordinateSystem::Cds.prefix(), "c.");
        assert_eq!(CoordinateSystem::Protein.prefix(), "p.");
    }
}
