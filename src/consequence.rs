//! Protein consequence prediction.
//!
//! The calculator applies a normalized transcript edit to the transcript
//! sequence, translates the reference and alternate coding sequences (the
//! alternate reads through into the 3' UTR so a shifted frame can find its
//! new stop), trims the common prefix and suffix, and classifies what is
//! left.
//!
//! Failure handling is asymmetric on purpose: positional failures from the
//! projection layers resolve to the terminal uncertain state (`p.?`), never
//! to a guessed change, while data failures (missing transcript, missing
//! sequence) propagate as errors.

use crate::codon::{CodonTable, ReadingFrame, Translation};
use crate::edit::{AminoAcid, AminoAcidSeq, ProteinEdit};
use crate::error::TxliftError;
use crate::position::{ProtLoc, ProtPos};
use crate::project::{TranscriptEdit, VariantProjector};
use crate::provider::TranscriptProvider;
use crate::variant::{CdsVariant, ProteinConsequence, ProteinVariant};

/// Computes predicted protein consequences for c. variants.
#[derive(Debug, Clone)]
pub struct ConsequenceCalculator<'a, P: TranscriptProvider> {
    provider: &'a P,
    table: CodonTable,
}

impl<'a, P: TranscriptProvider> ConsequenceCalculator<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            table: CodonTable::standard(),
        }
    }

    /// Predict the protein consequence of a c. variant.
    ///
    /// Positional failures anywhere in the projection chain yield the
    /// uncertain consequence (`p.?`); they are terminal, never retried.
    pub fn consequence(&self, variant: &CdsVariant) -> Result<ProteinVariant, TxliftError> {
        let record = self.provider.record(&variant.accession)?;
        let protein = record.protein_accession.clone().ok_or_else(|| {
            TxliftError::ReferenceNotFound {
                id: format!("protein accession for {}", variant.accession),
            }
        })?;

        let projector = VariantProjector::new(self.provider);
        let edit = match projector.cds_to_transcript_edit(variant) {
            Ok(edit) => edit,
            Err(err) if err.is_positional() => {
                log::debug!("{}: no protein prediction: {}", variant, err);
                return Ok(ProteinVariant::uncertain(protein));
            }
            Err(err) => return Err(err),
        };

        // A c. variant implies a reading frame; without one the site
        // translation above would already have failed.
        let frame = match record.reading_frame {
            Some(frame) => frame,
            None => return Ok(ProteinVariant::uncertain(protein)),
        };

        let consequence = self.classify(&record.tx_sequence, frame, &edit)?;
        Ok(ProteinVariant::new(protein, consequence))
    }

    fn classify(
        &self,
        tx_sequence: &str,
        frame: ReadingFrame,
        edit: &TranscriptEdit,
    ) -> Result<ProteinConsequence, TxliftError> {
        let (cds_start, cds_end) = (frame.cds_start, frame.cds_end);

        // Entirely outside the coding sequence: no prediction. An insertion
        // anchored exactly at the CDS edge lands in the UTR.
        if edit.t_end <= cds_start || edit.t_start >= cds_end {
            return Ok(ProteinConsequence::Uncertain);
        }
        // Start codon disrupted.
        if edit.t_start < cds_start + 3 && edit.t_end > cds_start {
            return Ok(ProteinConsequence::StartLost);
        }

        let ref_cds = slice(tx_sequence, cds_start, cds_end)?;
        let reference = self.table.translate(ref_cds);

        let mut alt_sequence =
            String::with_capacity(tx_sequence.len() + edit.replacement.len());
        alt_sequence.push_str(slice(tx_sequence, 0, edit.t_start)?);
        alt_sequence.push_str(&edit.replacement);
        alt_sequence.push_str(slice(tx_sequence, edit.t_end, tx_sequence.len() as u64)?);

        // The alternate reads through into the 3' UTR so a shifted frame can
        // still find its stop.
        let alternate = self.table.translate(&alt_sequence[cds_start as usize..]);

        Ok(self.diff(frame, edit, &reference, &alternate))
    }

    /// Trim and classify the reference/alternate protein difference.
    fn diff(
        &self,
        frame: ReadingFrame,
        edit: &TranscriptEdit,
        reference: &Translation,
        alternate: &Translation,
    ) -> ProteinConsequence {
        let r = &reference.residues;
        let a = &alternate.residues;

        if r == a {
            // Silent: locate the codon the edit touched.
            let codon = (edit.t_start - frame.cds_start) / 3;
            return match r.get(codon as usize) {
                Some(&aa) => ProteinConsequence::Predicted {
                    location: ProtLoc::Single(ProtPos::new(aa, codon + 1)),
                    edit: ProteinEdit::Identity,
                },
                None => ProteinConsequence::Uncertain,
            };
        }

        let p = r
            .iter()
            .zip(a.iter())
            .take_while(|(x, y)| x == y)
            .count();

        let (Some(&ref_aa), alt_aa) = (r.get(p), a.get(p).copied()) else {
            // The reference ran out before a difference: pure extension past
            // the stop, which only happens when the stop itself was edited.
            return ProteinConsequence::Uncertain;
        };

        // Stop-loss: the reference stop is the first changed residue, the
        // new protein extends past it. No prediction.
        if ref_aa == AminoAcid::Ter {
            return ProteinConsequence::Uncertain;
        }

        // First changed residue is a stop: report a plain nonsense
        // substitution whatever the nucleotide-level shape.
        if alt_aa == Some(AminoAcid::Ter) {
            return ProteinConsequence::Predicted {
                location: ProtLoc::Single(ProtPos::new(ref_aa, p as u64 + 1)),
                edit: ProteinEdit::Substitution {
                    alternative: AminoAcid::Ter,
                },
            };
        }

        if edit.length_change() % 3 != 0 {
            let ter_pos = alternate.stopped.then(|| (a.len() - p) as u64);
            return ProteinConsequence::Predicted {
                location: ProtLoc::Single(ProtPos::new(ref_aa, p as u64 + 1)),
                edit: ProteinEdit::Frameshift {
                    new_aa: alt_aa.unwrap_or(AminoAcid::Xaa),
                    ter_pos,
                },
            };
        }

        // In-frame: trim the common suffix of what remains.
        let s = r[p..]
            .iter()
            .rev()
            .zip(a[p..].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();
        let ref_mid = &r[p..r.len() - s];
        let alt_mid = &a[p..a.len() - s];

        match (ref_mid.is_empty(), alt_mid.is_empty()) {
            (true, false) => {
                // Insertion between the flanking unchanged residues.
                if p == 0 {
                    return ProteinConsequence::StartLost;
                }
                ProteinConsequence::Predicted {
                    location: ProtLoc::Range(
                        ProtPos::new(r[p - 1], p as u64),
                        ProtPos::new(r[p], p as u64 + 1),
                    ),
                    edit: ProteinEdit::Insertion {
                        sequence: AminoAcidSeq::new(alt_mid.to_vec()),
                    },
                }
            }
            (false, true) => ProteinConsequence::Predicted {
                location: residue_range(ref_mid, p),
                edit: ProteinEdit::Deletion,
            },
            (false, false) => {
                if ref_mid.len() == 1 && alt_mid.len() == 1 {
                    ProteinConsequence::Predicted {
                        location: ProtLoc::Single(ProtPos::new(ref_mid[0], p as u64 + 1)),
                        edit: ProteinEdit::Substitution {
                            alternative: alt_mid[0],
                        },
                    }
                } else {
                    ProteinConsequence::Predicted {
                        location: residue_range(ref_mid, p),
                        edit: ProteinEdit::DelIns {
                            sequence: AminoAcidSeq::new(alt_mid.to_vec()),
                        },
                    }
                }
            }
            (true, true) => unreachable!("equal translations handled above"),
        }
    }
}

fn residue_range(residues: &[AminoAcid], offset: usize) -> ProtLoc {
    let first = ProtPos::new(residues[0], offset as u64 + 1);
    if residues.len() == 1 {
        ProtLoc::Single(first)
    } else {
        ProtLoc::Range(
            first,
            ProtPos::new(
                residues[residues.len() - 1],
                (offset + residues.len()) as u64,
            ),
        )
    }
}

fn slice(sequence: &str, start: u64, end: u64) -> Result<&str, TxliftError> {
    sequence
        .get(start as usize..end as usize)
        .ok_or_else(|| TxliftError::SequenceNotFound {
            id: format!("transcript bases {}..{}", start, end),
        })
}
