//! Property-based tests for coordinate translation and projection.
//!
//! Covers the engine's structural guarantees: exonic round-trip identity,
//! alignment monotonicity enforcement, and splice-preserving payload length.

use proptest::prelude::*;
use txlift::{
    CdsInterval, CdsPos, CdsVariant, CoordinateTranslator, GenomePos, InMemoryProvider, NaEdit,
    ReadingFrame, Strand, TranscriptAlignment, TranscriptRecord, TxliftError, TxSite,
    VariantProjector,
};

/// Exon/intron length pairs; the final intron length is unused.
fn structure() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((1u64..60, 1u64..60), 1..5)
}

/// Build exon arrays for the given structure on either strand.
fn build_exons(lens: &[(u64, u64)], strand: Strand) -> Vec<[u64; 4]> {
    let genomic_span: u64 =
        lens.iter().map(|(e, _)| e).sum::<u64>() + lens[..lens.len() - 1].iter().map(|(_, i)| i).sum::<u64>();

    let mut exons = Vec::with_capacity(lens.len());
    let mut t = 0u64;
    match strand {
        Strand::Plus => {
            let mut g = 1000u64;
            for (i, (exon_len, intron_len)) in lens.iter().enumerate() {
                exons.push([g, g + exon_len, t, t + exon_len]);
                t += exon_len;
                g += exon_len;
                if i + 1 < lens.len() {
                    g += intron_len;
                }
            }
        }
        Strand::Minus => {
            let mut g = 1000 + genomic_span;
            for (i, (exon_len, intron_len)) in lens.iter().enumerate() {
                exons.push([g - exon_len, g, t, t + exon_len]);
                t += exon_len;
                g -= exon_len;
                if i + 1 < lens.len() {
                    g -= intron_len;
                }
            }
        }
    }
    exons
}

proptest! {
    /// Transcript -> genome -> transcript is the identity for every exonic
    /// position, on both strands.
    #[test]
    fn exonic_round_trip(lens in structure(), minus in any::<bool>(), seed in any::<u64>()) {
        let strand = if minus { Strand::Minus } else { Strand::Plus };
        let exons = build_exons(&lens, strand);
        let alignment = TranscriptAlignment::from_exons(
            "NM_PROP.1",
            "chrP".to_string(),
            strand,
            &exons,
            &vec![None; exons.len()],
        )
        .unwrap();
        let translator = CoordinateTranslator::new(&alignment, None);

        let t = seed % alignment.tx_len();
        let g = translator.site_to_genome(TxSite::exonic(t)).unwrap();
        let back = translator.genome_to_site(g).unwrap();
        prop_assert_eq!(back, TxSite::exonic(t));
    }

    /// Genome -> transcript -> genome is the identity for every aligned
    /// genomic position that is not inside an alignment deletion.
    #[test]
    fn genomic_round_trip(lens in structure(), minus in any::<bool>(), seed in any::<u64>()) {
        let strand = if minus { Strand::Minus } else { Strand::Plus };
        let exons = build_exons(&lens, strand);
        let alignment = TranscriptAlignment::from_exons(
            "NM_PROP.1",
            "chrP".to_string(),
            strand,
            &exons,
            &vec![None; exons.len()],
        )
        .unwrap();
        let translator = CoordinateTranslator::new(&alignment, None);

        let (g_lo, g_hi) = alignment.genomic_span();
        let g = GenomePos::new(g_lo + seed % (g_hi - g_lo) + 1);
        let site = translator.genome_to_site(g).unwrap();
        let back = translator.site_to_genome(site).unwrap();
        prop_assert_eq!(back, g);
    }

    /// A transcript-coordinate gap between consecutive exons is always
    /// rejected, never silently absorbed.
    #[test]
    fn transcript_gap_is_inconsistent(len1 in 1u64..60, len2 in 1u64..60, gap in 1u64..20) {
        let exons = [
            [1000, 1000 + len1, 0, len1],
            [2000, 2000 + len2, len1 + gap, len1 + gap + len2],
        ];
        let result = TranscriptAlignment::from_exons(
            "NM_BAD.1",
            "chrP".to_string(),
            Strand::Plus,
            &exons,
            &[None, None],
        );
        let inconsistent = matches!(result, Err(TxliftError::AlignmentInconsistency { .. }));
        prop_assert!(inconsistent);
    }

    /// Genomically overlapping exons are always rejected.
    #[test]
    fn genomic_overlap_is_inconsistent(len1 in 10u64..60, len2 in 10u64..60, overlap in 1u64..9) {
        let exons = [
            [1000, 1000 + len1, 0, len1],
            [1000 + len1 - overlap, 1000 + len1 - overlap + len2, len1, len1 + len2],
        ];
        let result = TranscriptAlignment::from_exons(
            "NM_BAD.1",
            "chrP".to_string(),
            Strand::Plus,
            &exons,
            &[None, None],
        );
        let inconsistent = matches!(result, Err(TxliftError::AlignmentInconsistency { .. }));
        prop_assert!(inconsistent);
    }

    /// A duplication crossing the donor site keeps the literal payload:
    /// its length always equals the genomic span length, intronic bases
    /// included.
    #[test]
    fn splice_dup_payload_length(exonic in 0u64..10, intronic in 1u64..58) {
        let provider = donor_fixture();
        let projector = VariantProjector::new(&provider);

        let v = CdsVariant::new(
            "NM_PROP.1",
            CdsInterval::new(
                CdsPos::new(57 - exonic as i64),
                CdsPos::with_offset(57, intronic as i64),
            ),
            NaEdit::Duplication,
        );
        let edit = projector.cds_to_transcript_edit(&v).unwrap();
        prop_assert_eq!(edit.replacement.len() as u64, exonic + 1 + intronic);

        let g = projector.cds_to_genome(&v).unwrap();
        prop_assert_eq!(g.interval.len() as u64, exonic + 1 + intronic);
    }
}

/// Two-exon transcript with a 58-base intron after c.57.
fn donor_fixture() -> InMemoryProvider {
    let exon1 = format!("ATG{}GGA", "GCT".repeat(17));
    let intron = format!("ATT{}AG", "C".repeat(53));
    let exon2 = "AAAGTGTGCCTGTAAGTAACCGGGCCC";
    let contig = format!("{}{}{}", exon1, intron, exon2);
    let tx_sequence = format!("{}{}", exon1, exon2);

    let alignment = TranscriptAlignment::from_exons(
        "NM_PROP.1",
        "chrP".to_string(),
        Strand::Plus,
        &[[100, 157, 0, 57], [215, 242, 57, 84]],
        &[None, None],
    )
    .unwrap();

    let mut provider = InMemoryProvider::new();
    provider.add_contig("chrP", 100, contig);
    provider.add_transcript(
        "NM_PROP.1",
        TranscriptRecord {
            alignment,
            reading_frame: Some(ReadingFrame::new(0, 72)),
            tx_sequence,
            protein_accession: Some("NP_PROP.1".to_string()),
        },
    );
    provider
}
