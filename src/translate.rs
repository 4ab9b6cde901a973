//! Coordinate translation between genomic, transcript, and CDS positions.
//!
//! All public positions are 1-based HGVS values ([`GenomePos`], [`CdsPos`]);
//! the intermediate [`TxSite`] is a 0-based transcript index plus a signed
//! intron offset, which is what the projector works with.
//!
//! Boundary ties are deterministic: a genomic position exactly at an exon
//! boundary is exonic (offset 0), never assigned to the adjacent intron.
//! Inside an intron the nearer exon wins, with the donor side taking exact
//! midpoints.

use crate::align::{BlockOp, Strand, TranscriptAlignment};
use crate::codon::ReadingFrame;
use crate::error::TxliftError;
use crate::position::{CdsPos, GenomePos};

/// A transcript-anchored site: 0-based exonic index plus intron offset.
///
/// `offset != 0` means the site lies `offset` bases into the intron flanking
/// the exonic base `t` (positive past the donor, negative before the
/// acceptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSite {
    pub t: u64,
    pub offset: i64,
}

impl TxSite {
    pub fn exonic(t: u64) -> Self {
        Self { t, offset: 0 }
    }

    pub fn is_intronic(&self) -> bool {
        self.offset != 0
    }
}

/// Translator over one transcript's alignment snapshot.
///
/// Borrows the read-only alignment and reading frame for the duration of a
/// single projection call; no state is retained across calls.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTranslator<'a> {
    alignment: &'a TranscriptAlignment,
    frame: Option<ReadingFrame>,
}

impl<'a> CoordinateTranslator<'a> {
    pub fn new(alignment: &'a TranscriptAlignment, frame: Option<ReadingFrame>) -> Self {
        Self { alignment, frame }
    }

    pub fn alignment(&self) -> &TranscriptAlignment {
        self.alignment
    }

    /// Map a genomic position onto the transcript.
    ///
    /// Exonic positions translate through the containing match block.
    /// Intronic positions anchor on the nearer flanking exon boundary with a
    /// signed offset. A position inside an alignment deletion has no defined
    /// transcript equivalent.
    pub fn genome_to_site(&self, pos: GenomePos) -> Result<TxSite, TxliftError> {
        if pos.base == 0 {
            return Err(TxliftError::PositionOutOfRange {
                pos: 0,
                msg: "genomic positions are 1-based".to_string(),
            });
        }
        let g = pos.base - 1;
        let block = self.alignment.block_for_genome(g).ok_or_else(|| {
            TxliftError::PositionOutOfRange {
                pos: pos.base as i64,
                msg: format!("outside the aligned span of {}", self.alignment.contig),
            }
        })?;

        match block.op {
            BlockOp::Match => {
                let k = match self.alignment.strand {
                    Strand::Plus => g - block.g_start,
                    Strand::Minus => block.g_end - 1 - g,
                };
                Ok(TxSite::exonic(block.t_start + k))
            }
            BlockOp::Intron => {
                let len = block.g_len();
                // Distance from the donor (transcript-5') side of the intron.
                let into = match self.alignment.strand {
                    Strand::Plus => g - block.g_start,
                    Strand::Minus => block.g_end - 1 - g,
                };
                let donor_off = (into + 1) as i64;
                let acceptor_off = (len - into) as i64;
                if donor_off <= acceptor_off {
                    Ok(TxSite {
                        t: block.t_start - 1,
                        offset: donor_off,
                    })
                } else {
                    Ok(TxSite {
                        t: block.t_start,
                        offset: -acceptor_off,
                    })
                }
            }
            BlockOp::TxDeletion => Err(TxliftError::AmbiguousProjection {
                msg: format!(
                    "genomic position {} falls in an alignment deletion",
                    pos.base
                ),
            }),
            // Zero-length genomic span, cannot contain a position.
            BlockOp::TxInsertion => unreachable!("insertion block matched a genomic position"),
        }
    }

    /// Map a transcript site to its genomic position.
    ///
    /// Intron offsets translate exactly: the intron length is known from the
    /// genomic side, and an offset overshooting the intron is out of range.
    pub fn site_to_genome(&self, site: TxSite) -> Result<GenomePos, TxliftError> {
        let block = self.alignment.block_for_tx(site.t).ok_or_else(|| {
            TxliftError::PositionOutOfRange {
                pos: site.t as i64,
                msg: format!(
                    "beyond the transcript span of {} bases",
                    self.alignment.tx_len()
                ),
            }
        })?;

        if block.op == BlockOp::TxInsertion {
            return Err(TxliftError::AmbiguousProjection {
                msg: format!(
                    "transcript position {} lies in transcript-only sequence",
                    site.t
                ),
            });
        }

        let k = site.t - block.t_start;
        let base = match self.alignment.strand {
            Strand::Plus => block.g_start + k,
            Strand::Minus => block.g_end - 1 - k,
        };

        if site.offset == 0 {
            return Ok(GenomePos::new(base + 1));
        }

        // Apply the intron offset in genomic direction.
        let shifted = match self.alignment.strand {
            Strand::Plus => base as i64 + site.offset,
            Strand::Minus => base as i64 - site.offset,
        };
        if shifted < 0 {
            return Err(TxliftError::PositionOutOfRange {
                pos: shifted,
                msg: "intron offset extends past the contig start".to_string(),
            });
        }
        let shifted = shifted as u64;

        // The offset must land inside the intron flanking the anchor
        // boundary itself; overshooting into the next intron is an error,
        // not a coerced position. The flanking intron shares its (empty)
        // transcript coordinate with the anchored exon edge.
        let boundary_t = if site.offset > 0 { site.t + 1 } else { site.t };
        match self.alignment.block_for_genome(shifted) {
            Some(b) if b.op == BlockOp::Intron && b.t_start == boundary_t => {
                Ok(GenomePos::new(shifted + 1))
            }
            _ => Err(TxliftError::PositionOutOfRange {
                pos: site.t as i64,
                msg: format!(
                    "intron offset {} does not land in the flanking intron",
                    site.offset
                ),
            }),
        }
    }

    /// Map a CDS position to a transcript site.
    pub fn cds_to_site(&self, pos: CdsPos) -> Result<TxSite, TxliftError> {
        let frame = self.frame.ok_or_else(|| TxliftError::PositionOutOfRange {
            pos: pos.base,
            msg: "transcript has no reading frame".to_string(),
        })?;

        let t = if pos.utr3 {
            if pos.base < 1 {
                return Err(TxliftError::PositionOutOfRange {
                    pos: pos.base,
                    msg: "3' UTR positions are 1-based".to_string(),
                });
            }
            frame.cds_end as i64 + pos.base - 1
        } else if pos.base > 0 {
            frame.cds_start as i64 + pos.base - 1
        } else if pos.base < 0 {
            frame.cds_start as i64 + pos.base
        } else {
            return Err(TxliftError::PositionOutOfRange {
                pos: 0,
                msg: "c.0 is not a valid position".to_string(),
            });
        };

        if t < 0 || t as u64 >= self.alignment.tx_len() {
            return Err(TxliftError::PositionOutOfRange {
                pos: pos.base,
                msg: format!(
                    "maps to transcript offset {} outside 0..{}",
                    t,
                    self.alignment.tx_len()
                ),
            });
        }

        Ok(TxSite {
            t: t as u64,
            offset: pos.offset_or_zero(),
        })
    }

    /// Map a transcript site to CDS numbering.
    pub fn site_to_cds(&self, site: TxSite) -> Result<CdsPos, TxliftError> {
        let frame = self.frame.ok_or_else(|| TxliftError::PositionOutOfRange {
            pos: site.t as i64,
            msg: "transcript has no reading frame".to_string(),
        })?;

        let offset = if site.offset != 0 {
            Some(site.offset)
        } else {
            None
        };

        let pos = if site.t < frame.cds_start {
            CdsPos {
                base: -((frame.cds_start - site.t) as i64),
                offset,
                utr3: false,
            }
        } else if site.t < frame.cds_end {
            CdsPos {
                base: (site.t - frame.cds_start) as i64 + 1,
                offset,
                utr3: false,
            }
        } else {
            CdsPos {
                base: (site.t - frame.cds_end) as i64 + 1,
                offset,
                utr3: true,
            }
        };
        Ok(pos)
    }

    /// Genomic position straight to CDS numbering.
    pub fn genome_to_cds(&self, pos: GenomePos) -> Result<CdsPos, TxliftError> {
        let site = self.genome_to_site(pos)?;
        self.site_to_cds(site)
    }

    /// CDS position straight to genomic.
    pub fn cds_to_genome(&self, pos: CdsPos) -> Result<GenomePos, TxliftError> {
        let site = self.cds_to_site(pos)?;
        self.site_to_genome(site)
    }

    /// 1-based codon index for a coding, exonic CDS position.
    ///
    /// Intronic positions have no codon: the protein system has no introns.
    pub fn codon_index(&self, pos: CdsPos) -> Result<u64, TxliftError> {
        if pos.is_intronic() {
            return Err(TxliftError::NoIntronicProjection {
                pos: pos.base,
                offset: pos.offset_or_zero(),
            });
        }
        if pos.utr3 || pos.base < 1 {
            return Err(TxliftError::PositionOutOfRange {
                pos: pos.base,
                msg: "position is outside the coding sequence".to_string(),
            });
        }
        Ok(ReadingFrame::codon_index(pos.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::TranscriptAlignment;

    /// Exons of 100/200/150 bases, CDS from transcript offset 50 to 400.
    fn translator_fixture() -> (TranscriptAlignment, ReadingFrame) {
        let aln = TranscriptAlignment::from_exons(
            "NM_TEST.1",
            "NC_000001.11".to_string(),
            Strand::Plus,
            &[
                [1000, 1100, 0, 100],
                [2000, 2200, 100, 300],
                [3000, 3150, 300, 450],
            ],
            &[None, None, None],
        )
        .unwrap();
        (aln, ReadingFrame::new(50, 400))
    }

    fn minus_fixture() -> (TranscriptAlignment, ReadingFrame) {
        let aln = TranscriptAlignment::from_exons(
            "NM_MINUS.1",
            "NC_000001.11".to_string(),
            Strand::Minus,
            &[
                [3000, 3150, 0, 150],
                [2000, 2200, 150, 350],
                [1000, 1100, 350, 450],
            ],
            &[None, None, None],
        )
        .unwrap();
        (aln, ReadingFrame::new(50, 400))
    }

    #[test]
    fn test_genome_to_site_exonic() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        assert_eq!(tr.genome_to_site(GenomePos::new(1001)).unwrap(), TxSite::exonic(0));
        assert_eq!(tr.genome_to_site(GenomePos::new(2001)).unwrap(), TxSite::exonic(100));
        assert_eq!(tr.genome_to_site(GenomePos::new(3150)).unwrap(), TxSite::exonic(449));
    }

    #[test]
    fn test_genome_to_site_intronic() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        // First base of intron 1 (g.1101): donor side, +1 from last exon base.
        let site = tr.genome_to_site(GenomePos::new(1101)).unwrap();
        assert_eq!(site, TxSite { t: 99, offset: 1 });

        // Last base of intron 1 (g.2000): acceptor side, -1 from next exon.
        let site = tr.genome_to_site(GenomePos::new(2000)).unwrap();
        assert_eq!(site, TxSite { t: 100, offset: -1 });

        // Exact midpoint of the 900bp intron goes to the donor side.
        let site = tr.genome_to_site(GenomePos::new(1550)).unwrap();
        assert_eq!(site, TxSite { t: 99, offset: 450 });
        let site = tr.genome_to_site(GenomePos::new(1551)).unwrap();
        assert_eq!(site, TxSite { t: 100, offset: -450 });
    }

    #[test]
    fn test_boundary_belongs_to_exon() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        // g.1100 is the last exon base, g.2001 the first of the next exon;
        // both are exonic with offset 0, never intronic.
        assert_eq!(
            tr.genome_to_site(GenomePos::new(1100)).unwrap(),
            TxSite::exonic(99)
        );
        assert_eq!(
            tr.genome_to_site(GenomePos::new(2001)).unwrap(),
            TxSite::exonic(100)
        );
    }

    #[test]
    fn test_genome_to_site_out_of_range() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));
        assert!(matches!(
            tr.genome_to_site(GenomePos::new(500)),
            Err(TxliftError::PositionOutOfRange { .. })
        ));
        assert!(matches!(
            tr.genome_to_site(GenomePos::new(4000)),
            Err(TxliftError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_site_to_genome_round_trip() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        for g in [1001, 1050, 1100, 2001, 2100, 2200, 3001, 3150] {
            let site = tr.genome_to_site(GenomePos::new(g)).unwrap();
            assert_eq!(tr.site_to_genome(site).unwrap().base, g, "g.{}", g);
        }
    }

    #[test]
    fn test_site_to_genome_intron_offset() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        let g = tr
            .site_to_genome(TxSite { t: 99, offset: 21 })
            .unwrap();
        assert_eq!(g.base, 1121);

        let g = tr
            .site_to_genome(TxSite { t: 100, offset: -5 })
            .unwrap();
        assert_eq!(g.base, 1996);

        // Offset overshooting the intron is rejected, not clamped.
        assert!(matches!(
            tr.site_to_genome(TxSite { t: 99, offset: 2000 }),
            Err(TxliftError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_intron_offset_must_stay_in_flanking_intron() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        // c.50+1150 overshoots the 900bp first intron and lands inside the
        // second intron (g.2250): rejected, never returned as a position.
        assert!(matches!(
            tr.site_to_genome(TxSite { t: 99, offset: 1150 }),
            Err(TxliftError::PositionOutOfRange { .. })
        ));

        // Acceptor-side overshoot past exon 2 into the first intron.
        assert!(matches!(
            tr.site_to_genome(TxSite { t: 300, offset: -1001 }),
            Err(TxliftError::PositionOutOfRange { .. })
        ));

        // A mid-exon anchor cannot carry an intron offset even when the
        // shifted base happens to fall in an intron.
        assert!(matches!(
            tr.site_to_genome(TxSite { t: 95, offset: 5 }),
            Err(TxliftError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_minus_strand_round_trip() {
        let (aln, rf) = minus_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        assert_eq!(tr.genome_to_site(GenomePos::new(3150)).unwrap(), TxSite::exonic(0));
        assert_eq!(tr.genome_to_site(GenomePos::new(3001)).unwrap(), TxSite::exonic(149));
        assert_eq!(tr.genome_to_site(GenomePos::new(2200)).unwrap(), TxSite::exonic(150));

        // First intronic base past the donor of exon 1 is g.3000.
        let site = tr.genome_to_site(GenomePos::new(3000)).unwrap();
        assert_eq!(site, TxSite { t: 149, offset: 1 });

        for g in [3150, 3001, 2200, 2001, 1100, 1001] {
            let site = tr.genome_to_site(GenomePos::new(g)).unwrap();
            assert_eq!(tr.site_to_genome(site).unwrap().base, g, "g.{}", g);
        }
    }

    #[test]
    fn test_cds_round_trip() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        // c.1 sits at transcript offset 50 = g.1051.
        assert_eq!(tr.cds_to_genome(CdsPos::new(1)).unwrap().base, 1051);
        assert_eq!(tr.genome_to_cds(GenomePos::new(1051)).unwrap(), CdsPos::new(1));

        // 5' UTR: c.-50 is the first transcript base.
        assert_eq!(tr.cds_to_genome(CdsPos::new(-50)).unwrap().base, 1001);
        assert_eq!(
            tr.genome_to_cds(GenomePos::new(1001)).unwrap(),
            CdsPos::new(-50)
        );

        // 3' UTR: c.*1 is transcript offset 400 = g.3101.
        assert_eq!(tr.cds_to_genome(CdsPos::utr3(1)).unwrap().base, 3101);
        assert_eq!(
            tr.genome_to_cds(GenomePos::new(3101)).unwrap(),
            CdsPos::utr3(1)
        );

        // Intronic: c.50+1 (transcript offset 99 is c.50, exon 1 end).
        assert_eq!(
            tr.cds_to_genome(CdsPos::with_offset(50, 1)).unwrap().base,
            1101
        );
        assert_eq!(
            tr.genome_to_cds(GenomePos::new(1101)).unwrap(),
            CdsPos::with_offset(50, 1)
        );
    }

    #[test]
    fn test_cds_invalid_positions() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        assert!(tr.cds_to_site(CdsPos::new(0)).is_err());
        // c.-51 would be before the transcript start.
        assert!(tr.cds_to_site(CdsPos::new(-51)).is_err());
        // c.*51 would be past the transcript end.
        assert!(tr.cds_to_site(CdsPos::utr3(51)).is_err());
    }

    #[test]
    fn test_no_reading_frame() {
        let (aln, _) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, None);
        assert!(tr.cds_to_site(CdsPos::new(1)).is_err());
    }

    #[test]
    fn test_deletion_block_is_ambiguous() {
        // Exon 1 carries a 10bp genome-only gap: M50 D10 M40.
        let aln = TranscriptAlignment::from_exons(
            "NM_DEL.1",
            "chr1".to_string(),
            Strand::Plus,
            &[[1000, 1100, 0, 90]],
            &[Some(vec![
                crate::align::GapOp::Match(50),
                crate::align::GapOp::Deletion(10),
                crate::align::GapOp::Match(40),
            ])],
        )
        .unwrap();
        let tr = CoordinateTranslator::new(&aln, None);

        // g.1055 falls in the deleted span.
        assert!(matches!(
            tr.genome_to_site(GenomePos::new(1055)),
            Err(TxliftError::AmbiguousProjection { .. })
        ));
        // Either side of the gap still maps.
        assert_eq!(tr.genome_to_site(GenomePos::new(1050)).unwrap(), TxSite::exonic(49));
        assert_eq!(tr.genome_to_site(GenomePos::new(1061)).unwrap(), TxSite::exonic(50));
    }

    #[test]
    fn test_insertion_block_is_ambiguous() {
        let aln = TranscriptAlignment::from_exons(
            "NM_INS.1",
            "chr1".to_string(),
            Strand::Plus,
            &[[1000, 1100, 0, 110]],
            &[Some(vec![
                crate::align::GapOp::Match(50),
                crate::align::GapOp::Insertion(10),
                crate::align::GapOp::Match(50),
            ])],
        )
        .unwrap();
        let tr = CoordinateTranslator::new(&aln, None);

        // Transcript offsets 50..60 are transcript-only.
        assert!(matches!(
            tr.site_to_genome(TxSite::exonic(55)),
            Err(TxliftError::AmbiguousProjection { .. })
        ));
        assert_eq!(tr.site_to_genome(TxSite::exonic(49)).unwrap().base, 1050);
        assert_eq!(tr.site_to_genome(TxSite::exonic(60)).unwrap().base, 1051);
    }

    #[test]
    fn test_codon_index() {
        let (aln, rf) = translator_fixture();
        let tr = CoordinateTranslator::new(&aln, Some(rf));

        assert_eq!(tr.codon_index(CdsPos::new(1)).unwrap(), 1);
        assert_eq!(tr.codon_index(CdsPos::new(4)).unwrap(), 2);
        assert!(matches!(
            tr.codon_index(CdsPos::with_offset(50, 21)),
            Err(TxliftError::NoIntronicProjection { .. })
        ));
        assert!(tr.codon_index(CdsPos::new(-5)).is_err());
        assert!(tr.codon_index(CdsPos::utr3(2)).is_err());
    }
}
