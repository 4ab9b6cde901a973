//! Genetic code and reading frame arithmetic.

use crate::edit::AminoAcid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coding region of a transcript.
///
/// Both bounds are 0-based transcript coordinates, half-open: `cds_start`
/// is the first base of the start codon, `cds_end` the base after the stop
/// codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingFrame {
    pub cds_start: u64,
    pub cds_end: u64,
}

impl ReadingFrame {
    pub fn new(cds_start: u64, cds_end: u64) -> Self {
        Self { cds_start, cds_end }
    }

    /// CDS length in nucleotides, stop codon included.
    pub fn cds_len(&self) -> u64 {
        self.cds_end - self.cds_start
    }

    /// 1-based codon index for a 1-based CDS position.
    pub fn codon_index(cds_pos: i64) -> u64 {
        ((cds_pos - 1) / 3 + 1) as u64
    }

    /// Position within the codon (1, 2, or 3) for a 1-based CDS position.
    pub fn codon_frame(cds_pos: i64) -> u8 {
        ((cds_pos - 1) % 3 + 1) as u8
    }
}

/// Standard genetic code table.
#[derive(Debug, Clone)]
pub struct CodonTable {
    codon_to_aa: HashMap<[u8; 3], AminoAcid>,
}

impl CodonTable {
    /// Create the standard genetic code.
    pub fn standard() -> Self {
        let code: &[(&str, AminoAcid)] = &[
            ("TTT", AminoAcid::Phe),
            ("TTC", AminoAcid::Phe),
            ("TTA", AminoAcid::Leu),
            ("TTG", AminoAcid::Leu),
            ("CTT", AminoAcid::Leu),
            ("CTC", AminoAcid::Leu),
            ("CTA", AminoAcid::Leu),
            ("CTG", AminoAcid::Leu),
            ("ATT", AminoAcid::Ile),
            ("ATC", AminoAcid::Ile),
            ("ATA", AminoAcid::Ile),
            ("ATG", AminoAcid::Met),
            ("GTT", AminoAcid::Val),
            ("GTC", AminoAcid::Val),
            ("GTA", AminoAcid::Val),
            ("GTG", AminoAcid::Val),
            ("TCT", AminoAcid::Ser),
            ("TCC", AminoAcid::Ser),
            ("TCA", AminoAcid::Ser),
            ("TCG", AminoAcid::Ser),
            ("AGT", AminoAcid::Ser),
            ("AGC", AminoAcid::Ser),
            ("CCT", AminoAcid::Pro),
            ("CCC", AminoAcid::Pro),
            ("CCA", AminoAcid::Pro),
            ("CCG", AminoAcid::Pro),
            ("ACT", AminoAcid::Thr),
            ("ACC", AminoAcid::Thr),
            ("ACA", AminoAcid::Thr),
            ("ACG", AminoAcid::Thr),
            ("GCT", AminoAcid::Ala),
            ("GCC", AminoAcid::Ala),
            ("GCA", AminoAcid::Ala),
            ("GCG", AminoAcid::Ala),
            ("TAT", AminoAcid::Tyr),
            ("TAC", AminoAcid::Tyr),
            ("TAA", AminoAcid::Ter),
            ("TAG", AminoAcid::Ter),
            ("TGA", AminoAcid::Ter),
            ("CAT", AminoAcid::His),
            ("CAC", AminoAcid::His),
            ("CAA", AminoAcid::Gln),
            ("CAG", AminoAcid::Gln),
            ("AAT", AminoAcid::Asn),
            ("AAC", AminoAcid::Asn),
            ("AAA", AminoAcid::Lys),
            ("AAG", AminoAcid::Lys),
            ("GAT", AminoAcid::Asp),
            ("GAC", AminoAcid::Asp),
            ("GAA", AminoAcid::Glu),
            ("GAG", AminoAcid::Glu),
            ("TGT", AminoAcid::Cys),
            ("TGC", AminoAcid::Cys),
            ("TGG", AminoAcid::Trp),
            ("CGT", AminoAcid::Arg),
            ("CGC", AminoAcid::Arg),
            ("CGA", AminoAcid::Arg),
            ("CGG", AminoAcid::Arg),
            ("AGA", AminoAcid::Arg),
            ("AGG", AminoAcid::Arg),
            ("GGT", AminoAcid::Gly),
            ("GGC", AminoAcid::Gly),
            ("GGA", AminoAcid::Gly),
            ("GGG", AminoAcid::Gly),
        ];

        let codon_to_aa = code
            .iter()
            .map(|(codon, aa)| {
                let bytes = codon.as_bytes();
                ([bytes[0], bytes[1], bytes[2]], *aa)
            })
            .collect();

        Self { codon_to_aa }
    }

    /// Look up a single codon. Unknown or ambiguous codons give `Xaa`.
    pub fn decode(&self, codon: &[u8]) -> AminoAcid {
        if codon.len() != 3 {
            return AminoAcid::Xaa;
        }
        let key = [
            codon[0].to_ascii_uppercase(),
            codon[1].to_ascii_uppercase(),
            codon[2].to_ascii_uppercase(),
        ];
        self.codon_to_aa.get(&key).copied().unwrap_or(AminoAcid::Xaa)
    }

    /// Translate a nucleotide sequence codon by codon.
    ///
    /// Stops after the first stop codon (which is included in the output) or
    /// when fewer than three bases remain. `stopped` in the return value is
    /// false when the sequence ran out without an in-frame stop.
    pub fn translate(&self, sequence: &str) -> Translation {
        let bytes = sequence.as_bytes();
        let mut residues = Vec::with_capacity(bytes.len() / 3);
        let mut stopped = false;

        for codon in bytes.chunks_exact(3) {
            let aa = self.decode(codon);
            residues.push(aa);
            if aa == AminoAcid::Ter {
                stopped = true;
                break;
            }
        }

        Translation { residues, stopped }
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Result of translating a nucleotide sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Residues up to and including the first stop, if any.
    pub residues: Vec<AminoAcid>,
    /// Whether an in-frame stop codon was reached.
    pub stopped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let table = CodonTable::standard();
        assert_eq!(table.decode(b"ATG"), AminoAcid::Met);
        assert_eq!(table.decode(b"TAA"), AminoAcid::Ter);
        assert_eq!(table.decode(b"ggc"), AminoAcid::Gly);
        assert_eq!(table.decode(b"NNN"), AminoAcid::Xaa);
        assert_eq!(table.decode(b"AT"), AminoAcid::Xaa);
    }

    #[test]
    fn test_translate_stops_at_ter() {
        let table = CodonTable::standard();
        let t = table.translate("ATGCCCAAATAGGGG");
        assert_eq!(
            t.residues,
            vec![AminoAcid::Met, AminoAcid::Pro, AminoAcid::Lys, AminoAcid::Ter]
        );
        assert!(t.stopped);
    }

    #[test]
    fn test_translate_no_stop() {
        let table = CodonTable::standard();
        let t = table.translate("ATGCCCAAA");
        assert_eq!(t.residues.len(), 3);
        assert!(!t.stopped);
    }

    #[test]
    fn test_translate_partial_tail_ignored() {
        let table = CodonTable::standard();
        let t = table.translate("ATGCC");
        assert_eq!(t.residues, vec![AminoAcid::Met]);
        assert!(!t.stopped);
    }

    #[test]
    fn test_codon_arithmetic() {
        assert_eq!(ReadingFrame::codon_index(1), 1);
        assert_eq!(ReadingFrame::codon_index(3), 1);
        assert_eq!(ReadingFrame::codon_index(4), 2);
        assert_eq!(ReadingFrame::codon_index(1837), 613);
        assert_eq!(ReadingFrame::codon_index(2196), 732);
        assert_eq!(ReadingFrame::codon_frame(1), 1);
        assert_eq!(ReadingFrame::codon_frame(2), 2);
        assert_eq!(ReadingFrame::codon_frame(3), 3);
        assert_eq!(ReadingFrame::codon_frame(4), 1);
    }

    #[test]
    fn test_reading_frame_len() {
        let rf = ReadingFrame::new(50, 400);
        assert_eq!(rf.cds_len(), 350);
    }
}
