//! Variant projection between coordinate systems.
//!
//! The projector translates both endpoints of a variant's interval, carries
//! the edit payload across (reverse-complementing over strand changes), and
//! applies the splice-preservation rule for insertions and duplications that
//! cross an exon/intron boundary: the literal sequence, intronic bases
//! included, is never truncated. Positional failures on either endpoint fail
//! the whole projection; a partial descriptor is never produced.

use crate::align::{BlockOp, Strand};
use crate::edit::{reverse_complement, NaEdit};
use crate::error::TxliftError;
use crate::position::{CdsInterval, GenomeInterval};
use crate::provider::{TranscriptProvider, TranscriptRecord};
use crate::translate::{CoordinateTranslator, TxSite};
use crate::variant::{CdsVariant, GenomeVariant};

/// A variant normalized onto the spliced transcript sequence.
///
/// Half-open 0-based transcript coordinates; `replacement` substitutes for
/// the spanned bases (empty for a pure deletion, span empty for a pure
/// insertion). This is the form the consequence calculator consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEdit {
    pub t_start: u64,
    pub t_end: u64,
    pub replacement: String,
}

impl TranscriptEdit {
    /// Signed length change on the transcript.
    pub fn length_change(&self) -> i64 {
        self.replacement.len() as i64 - (self.t_end - self.t_start) as i64
    }
}

/// Projects variants between g. and c. systems for one provider.
#[derive(Debug, Clone, Copy)]
pub struct VariantProjector<'a, P: TranscriptProvider> {
    provider: &'a P,
}

impl<'a, P: TranscriptProvider> VariantProjector<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// Project a c. variant onto its genomic contig.
    pub fn cds_to_genome(&self, variant: &CdsVariant) -> Result<GenomeVariant, TxliftError> {
        let record = self.provider.record(&variant.accession)?;
        let translator =
            CoordinateTranslator::new(&record.alignment, record.reading_frame);

        let g_start = self
            .endpoint(&variant.to_string(), translator.cds_to_genome(variant.interval.start))?;
        let g_end = self
            .endpoint(&variant.to_string(), translator.cds_to_genome(variant.interval.end))?;

        // Transcript order reverses genomic order on the minus strand.
        let interval = match record.alignment.strand {
            Strand::Plus => GenomeInterval::new(g_start, g_end),
            Strand::Minus => GenomeInterval::new(g_end, g_start),
        };

        let edit = orient_edit(&variant.edit, record.alignment.strand);
        Ok(GenomeVariant::new(
            record.alignment.contig.clone(),
            interval,
            edit,
        ))
    }

    /// Project a g. variant onto a transcript's CDS numbering.
    pub fn genome_to_cds(
        &self,
        variant: &GenomeVariant,
        tx_accession: &str,
    ) -> Result<CdsVariant, TxliftError> {
        let record = self.provider.record(tx_accession)?;
        if record.alignment.contig != variant.accession {
            return Err(TxliftError::UnmappableVariant {
                variant: variant.to_string(),
                msg: format!(
                    "{} is aligned to {}, not {}",
                    tx_accession, record.alignment.contig, variant.accession
                ),
            });
        }
        let translator =
            CoordinateTranslator::new(&record.alignment, record.reading_frame);

        let label = variant.to_string();
        let site_a = self.endpoint(&label, translator.genome_to_site(variant.interval.start))?;
        let site_b = self.endpoint(&label, translator.genome_to_site(variant.interval.end))?;

        // Order endpoints along the transcript.
        let (first, second) = if tx_order(site_a) <= tx_order(site_b) {
            (site_a, site_b)
        } else {
            (site_b, site_a)
        };
        let start = self.endpoint(&label, translator.site_to_cds(first))?;
        let end = self.endpoint(&label, translator.site_to_cds(second))?;

        let edit = orient_edit(&variant.edit, record.alignment.strand);
        Ok(CdsVariant::new(
            tx_accession,
            CdsInterval::new(start, end),
            edit,
        ))
    }

    /// Normalize a c. variant onto the spliced transcript sequence.
    ///
    /// This is where splice preservation happens: an insertion or
    /// duplication crossing exactly one exon/intron boundary keeps its
    /// literal genomic payload and is re-anchored after the 3'-most exonic
    /// base of its interval. Two or more crossed boundaries are ambiguous.
    /// Other edit kinds with intronic endpoints have no transcript
    /// rendition.
    pub fn cds_to_transcript_edit(
        &self,
        variant: &CdsVariant,
    ) -> Result<TranscriptEdit, TxliftError> {
        let record = self.provider.record(&variant.accession)?;
        let translator =
            CoordinateTranslator::new(&record.alignment, record.reading_frame);

        let start = translator.cds_to_site(variant.interval.start)?;
        let end = translator.cds_to_site(variant.interval.end)?;

        if !start.is_intronic() && !end.is_intronic() {
            return self.exonic_edit(record, start, end, &variant.edit);
        }

        match &variant.edit {
            NaEdit::Insertion { .. } | NaEdit::Duplication => {
                self.splice_preserving_edit(record, &translator, start, end, &variant.edit)
            }
            _ => {
                let (pos, offset) = if start.is_intronic() {
                    (variant.interval.start, start.offset)
                } else {
                    (variant.interval.end, end.offset)
                };
                Err(TxliftError::NoIntronicProjection {
                    pos: pos.base,
                    offset,
                })
            }
        }
    }

    /// Edit with both endpoints exonic: transcript bases map 1:1.
    fn exonic_edit(
        &self,
        record: &TranscriptRecord,
        start: TxSite,
        end: TxSite,
        edit: &NaEdit,
    ) -> Result<TranscriptEdit, TxliftError> {
        let (s, e) = (start.t, end.t);
        let edit = match edit {
            NaEdit::Substitution { alternative, .. } => TranscriptEdit {
                t_start: s,
                t_end: s + 1,
                replacement: alternative.clone(),
            },
            NaEdit::Deletion => TranscriptEdit {
                t_start: s,
                t_end: e + 1,
                replacement: String::new(),
            },
            NaEdit::DelIns { sequence } => TranscriptEdit {
                t_start: s,
                t_end: e + 1,
                replacement: sequence.clone(),
            },
            NaEdit::Insertion { sequence } => TranscriptEdit {
                t_start: s + 1,
                t_end: s + 1,
                replacement: sequence.clone(),
            },
            NaEdit::Duplication => TranscriptEdit {
                t_start: e + 1,
                t_end: e + 1,
                replacement: self.tx_slice(record, s, e + 1)?,
            },
            NaEdit::Inversion => TranscriptEdit {
                t_start: s,
                t_end: e + 1,
                replacement: reverse_complement(&self.tx_slice(record, s, e + 1)?),
            },
            NaEdit::Identity => TranscriptEdit {
                t_start: s,
                t_end: s,
                replacement: String::new(),
            },
        };
        Ok(edit)
    }

    /// Insertion or duplication with an intronic endpoint.
    fn splice_preserving_edit(
        &self,
        record: &TranscriptRecord,
        translator: &CoordinateTranslator<'_>,
        start: TxSite,
        end: TxSite,
        edit: &NaEdit,
    ) -> Result<TranscriptEdit, TxliftError> {
        let g_a = translator.site_to_genome(start)?;
        let g_b = translator.site_to_genome(end)?;
        let (g_min, g_max) = (g_a.base.min(g_b.base), g_a.base.max(g_b.base));

        // 0-based half-open genomic span of the interval.
        let span = (g_min - 1, g_max);
        self.check_alignment_gaps(record, span, start, end)?;

        let boundaries = crossed_boundaries(record, span);
        if boundaries == 0 {
            // Fully intronic: nothing to anchor on the transcript.
            return Err(TxliftError::NoIntronicProjection {
                pos: start.t as i64,
                offset: start.offset.max(end.offset),
            });
        }
        if boundaries > 1 {
            return Err(TxliftError::AmbiguousProjection {
                msg: format!(
                    "interval crosses {} exon/intron boundaries; the transcript rendition is undefined",
                    boundaries
                ),
            });
        }

        match edit {
            NaEdit::Insertion { sequence } => {
                // Anchors flank a splice junction; the payload lands on the
                // exonic side of it.
                let at = if !start.is_intronic() {
                    start.t + 1
                } else {
                    end.t
                };
                Ok(TranscriptEdit {
                    t_start: at,
                    t_end: at,
                    replacement: sequence.clone(),
                })
            }
            NaEdit::Duplication => {
                // Only the genomic sequence is contiguous across the splice
                // junction, so the payload comes from there.
                let payload =
                    self.provider
                        .genomic_sequence(&record.alignment.contig, span.0, span.1)?;
                let payload = match record.alignment.strand {
                    Strand::Plus => payload,
                    Strand::Minus => reverse_complement(&payload),
                };
                let anchor = last_exonic_t(record, span).ok_or_else(|| {
                    TxliftError::AmbiguousProjection {
                        msg: "no exonic base inside the duplicated interval".to_string(),
                    }
                })?;
                Ok(TranscriptEdit {
                    t_start: anchor + 1,
                    t_end: anchor + 1,
                    replacement: payload,
                })
            }
            _ => unreachable!("splice-preserving path only handles ins and dup"),
        }
    }

    /// Alignment gaps inside the interval make the rendition undefined.
    fn check_alignment_gaps(
        &self,
        record: &TranscriptRecord,
        span: (u64, u64),
        start: TxSite,
        end: TxSite,
    ) -> Result<(), TxliftError> {
        let (t_lo, t_hi) = (start.t.min(end.t), start.t.max(end.t));
        for block in record.alignment.blocks() {
            let in_genomic_span = block.g_start < span.1 && block.g_end > span.0;
            match block.op {
                BlockOp::TxDeletion if in_genomic_span => {
                    return Err(TxliftError::AmbiguousProjection {
                        msg: "alignment deletion inside the queried interval".to_string(),
                    });
                }
                BlockOp::TxInsertion if block.t_start > t_lo && block.t_start <= t_hi => {
                    return Err(TxliftError::AmbiguousProjection {
                        msg: "transcript-only sequence inside the queried interval".to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Wrap an endpoint translation failure as a whole-variant failure.
    fn endpoint<T>(
        &self,
        variant: &str,
        result: Result<T, TxliftError>,
    ) -> Result<T, TxliftError> {
        result.map_err(|err| match err {
            TxliftError::AmbiguousProjection { .. } => err,
            other => TxliftError::UnmappableVariant {
                variant: variant.to_string(),
                msg: other.to_string(),
            },
        })
    }

    fn tx_slice(
        &self,
        record: &TranscriptRecord,
        t_start: u64,
        t_end: u64,
    ) -> Result<String, TxliftError> {
        record
            .tx_sequence
            .get(t_start as usize..t_end as usize)
            .map(|s| s.to_string())
            .ok_or_else(|| TxliftError::SequenceNotFound {
                id: format!("transcript bases {}..{}", t_start, t_end),
            })
    }
}

/// Total order of sites along the transcript.
fn tx_order(site: TxSite) -> (u64, i64) {
    // A donor offset (+) sorts after its anchor base, an acceptor offset (-)
    // before.
    (site.t, site.offset)
}

/// Count exon/intron transitions inside a 0-based half-open genomic span.
fn crossed_boundaries(record: &TranscriptRecord, span: (u64, u64)) -> usize {
    let overlapping: Vec<BlockOp> = record
        .alignment
        .blocks_overlapping_genome(span.0, span.1)
        .iter()
        .map(|b| b.op)
        .filter(|op| matches!(op, BlockOp::Match | BlockOp::Intron))
        .collect();

    overlapping
        .windows(2)
        .filter(|w| (w[0] == BlockOp::Intron) != (w[1] == BlockOp::Intron))
        .count()
}

/// The 3'-most exonic transcript index whose genomic base lies in the span.
fn last_exonic_t(record: &TranscriptRecord, span: (u64, u64)) -> Option<u64> {
    record
        .alignment
        .blocks_overlapping_genome(span.0, span.1)
        .iter()
        .filter(|b| b.op == BlockOp::Match)
        .map(|b| match record.alignment.strand {
            Strand::Plus => b.t_start + span.1.min(b.g_end) - 1 - b.g_start,
            Strand::Minus => b.t_start + b.g_end - 1 - span.0.max(b.g_start),
        })
        .max()
}

/// Re-orient a nucleotide edit's payload across a strand flip.
fn orient_edit(edit: &NaEdit, strand: Strand) -> NaEdit {
    match strand {
        Strand::Plus => edit.clone(),
        Strand::Minus => match edit {
            NaEdit::Substitution {
                reference,
                alternative,
            } => NaEdit::Substitution {
                reference: reverse_complement(reference),
                alternative: reverse_complement(alternative),
            },
            NaEdit::Insertion { sequence } => NaEdit::Insertion {
                sequence: reverse_complement(sequence),
            },
            NaEdit::DelIns { sequence } => NaEdit::DelIns {
                sequence: reverse_complement(sequence),
            },
            other => other.clone(),
        },
    }
}
