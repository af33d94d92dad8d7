use crate::core::models::residue::AminoAcid;
use crate::engine::enumeration::Position;
use crate::engine::error::EngineError;
use std::collections::HashMap;
use std::io::Write;

/// A parsed score from the energy scoring tool: the binding total plus any
/// extra terms the tool reported on the same line.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyScore {
    pub total: f64,
    pub terms: Vec<f64>,
}

/// Terminal outcome of one variant. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantOutcome {
    Score(EnergyScore),
    /// Side-chain placement failed; carries the captured diagnostic text.
    PlacementFailure(String),
    /// Energy scoring failed; carries the captured diagnostic text.
    ScoringFailure(String),
}

impl VariantOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VariantOutcome::Score(_))
    }
}

/// One cell of the result matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixCell {
    /// Self-identity substitution; never scheduled, kept so every row has the
    /// same shape.
    NotApplicable,
    /// The run ended (cancelled) before this pair was processed.
    NotComputed,
    Outcome(VariantOutcome),
}

/// Accumulates variant outcomes keyed by (position, substitution).
///
/// Rows follow the enumerated position order, columns the substitution set
/// order. Self-identity cells are pre-marked `NotApplicable` at construction.
/// Recording the same pair twice is a fatal `DuplicateEntry`: it means the
/// driver double-processed work and the matrix can no longer be trusted.
#[derive(Debug)]
pub struct ResultMatrix {
    positions: Vec<Position>,
    substitutions: Vec<AminoAcid>,
    cells: Vec<Option<MatrixCell>>,
    row_index: HashMap<(char, isize, char), usize>,
    col_index: HashMap<AminoAcid, usize>,
}

impl ResultMatrix {
    pub fn new(positions: Vec<Position>, substitutions: Vec<AminoAcid>) -> Self {
        let row_index = positions
            .iter()
            .enumerate()
            .map(|(i, p)| ((p.chain, p.residue_number, p.insertion_code), i))
            .collect();
        let col_index = substitutions
            .iter()
            .enumerate()
            .map(|(i, &aa)| (aa, i))
            .collect();
        let mut cells = vec![None; positions.len() * substitutions.len()];
        for (row, position) in positions.iter().enumerate() {
            for (col, &aa) in substitutions.iter().enumerate() {
                if aa == position.original {
                    cells[row * substitutions.len() + col] = Some(MatrixCell::NotApplicable);
                }
            }
        }
        Self {
            positions,
            substitutions,
            cells,
            row_index,
            col_index,
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn substitutions(&self) -> &[AminoAcid] {
        &self.substitutions
    }

    fn cell_index(&self, position: &Position, substitution: AminoAcid) -> Option<usize> {
        let row = *self
            .row_index
            .get(&(position.chain, position.residue_number, position.insertion_code))?;
        let col = *self.col_index.get(&substitution)?;
        Some(row * self.substitutions.len() + col)
    }

    /// Records one variant's outcome.
    ///
    /// # Errors
    ///
    /// `DuplicateEntry` if the cell is already occupied (including the
    /// pre-marked self-identity cells), `Internal` if the pair was never
    /// enumerated.
    pub fn record(
        &mut self,
        position: &Position,
        substitution: AminoAcid,
        outcome: VariantOutcome,
    ) -> Result<(), EngineError> {
        let index = self
            .cell_index(position, substitution)
            .ok_or_else(|| {
                EngineError::Internal(format!(
                    "recording outcome for unenumerated pair {position} -> {}",
                    substitution.one_letter()
                ))
            })?;
        if self.cells[index].is_some() {
            return Err(EngineError::DuplicateEntry {
                position: position.to_string(),
                substitution: substitution.one_letter(),
            });
        }
        self.cells[index] = Some(MatrixCell::Outcome(outcome));
        Ok(())
    }

    /// Freezes the matrix for reporting. Unfilled cells (a cancelled run)
    /// become explicit `NotComputed` markers; nothing is ever omitted.
    pub fn freeze(self) -> FrozenMatrix {
        let cells = self
            .cells
            .into_iter()
            .map(|cell| cell.unwrap_or(MatrixCell::NotComputed))
            .collect();
        FrozenMatrix {
            positions: self.positions,
            substitutions: self.substitutions,
            cells,
        }
    }
}

/// The immutable, order-preserving view handed to the reporting collaborator.
#[derive(Debug, Clone)]
pub struct FrozenMatrix {
    positions: Vec<Position>,
    substitutions: Vec<AminoAcid>,
    cells: Vec<MatrixCell>,
}

impl FrozenMatrix {
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn substitutions(&self) -> &[AminoAcid] {
        &self.substitutions
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&MatrixCell> {
        if col >= self.substitutions.len() {
            return None;
        }
        self.cells.get(row * self.substitutions.len() + col)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Writes the matrix as CSV: one row per position, one column per
    /// substitution, plus position label and original identity columns.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        let mut header = vec!["position".to_string(), "original".to_string()];
        header.extend(
            self.substitutions
                .iter()
                .map(|aa| aa.one_letter().to_string()),
        );
        out.write_record(&header)?;

        for (row, position) in self.positions.iter().enumerate() {
            let mut record = vec![
                position.site_label(),
                position.original.one_letter().to_string(),
            ];
            for col in 0..self.substitutions.len() {
                let text = match self.cell(row, col) {
                    Some(MatrixCell::Outcome(VariantOutcome::Score(score))) => {
                        format!("{:.3}", score.total)
                    }
                    Some(MatrixCell::Outcome(VariantOutcome::PlacementFailure(_))) => {
                        "FAILED(placement)".to_string()
                    }
                    Some(MatrixCell::Outcome(VariantOutcome::ScoringFailure(_))) => {
                        "FAILED(scoring)".to_string()
                    }
                    Some(MatrixCell::NotApplicable) => "n/a".to_string(),
                    Some(MatrixCell::NotComputed) | None => "not computed".to_string(),
                };
                record.push(text);
            }
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(chain: char, number: isize, original: AminoAcid) -> Position {
        Position {
            chain,
            residue_number: number,
            insertion_code: ' ',
            original,
        }
    }

    fn small_matrix() -> ResultMatrix {
        ResultMatrix::new(
            vec![
                position('A', 1, AminoAcid::Glycine),
                position('A', 2, AminoAcid::Phenylalanine),
            ],
            vec![AminoAcid::Phenylalanine, AminoAcid::Tryptophan],
        )
    }

    fn score(total: f64) -> VariantOutcome {
        VariantOutcome::Score(EnergyScore {
            total,
            terms: vec![],
        })
    }

    #[test]
    fn self_identity_cells_are_premarked_not_applicable() {
        let matrix = small_matrix();
        let frozen = matrix.freeze();
        // Row A2 (PHE original) has n/a in the F column only.
        assert_eq!(frozen.cell(1, 0), Some(&MatrixCell::NotApplicable));
        assert_eq!(frozen.cell(1, 1), Some(&MatrixCell::NotComputed));
        assert_eq!(frozen.cell(0, 0), Some(&MatrixCell::NotComputed));
    }

    #[test]
    fn record_rejects_duplicates() {
        let mut matrix = small_matrix();
        let pos = position('A', 1, AminoAcid::Glycine);
        matrix
            .record(&pos, AminoAcid::Tryptophan, score(-1.0))
            .unwrap();
        let err = matrix
            .record(&pos, AminoAcid::Tryptophan, score(-2.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateEntry { .. }));
    }

    #[test]
    fn record_rejects_self_identity_cells() {
        let mut matrix = small_matrix();
        let pos = position('A', 2, AminoAcid::Phenylalanine);
        let err = matrix
            .record(&pos, AminoAcid::Phenylalanine, score(0.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateEntry { .. }));
    }

    #[test]
    fn insertion_coded_positions_occupy_distinct_rows() {
        let inserted = Position {
            insertion_code: 'A',
            ..position('A', 100, AminoAcid::Phenylalanine)
        };
        let mut matrix = ResultMatrix::new(
            vec![position('A', 100, AminoAcid::Glycine), inserted],
            vec![AminoAcid::Tryptophan],
        );
        matrix
            .record(
                &position('A', 100, AminoAcid::Glycine),
                AminoAcid::Tryptophan,
                score(-1.0),
            )
            .unwrap();
        matrix
            .record(&inserted, AminoAcid::Tryptophan, score(-2.0))
            .unwrap();

        let mut buffer = Vec::new();
        matrix.freeze().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "A100,G,-1.000");
        assert_eq!(lines[2], "A100A,F,-2.000");
    }

    #[test]
    fn record_rejects_unenumerated_pairs() {
        let mut matrix = small_matrix();
        let stranger = position('Q', 99, AminoAcid::Glycine);
        let err = matrix
            .record(&stranger, AminoAcid::Tryptophan, score(0.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
    }

    #[test]
    fn freeze_preserves_shape_and_fills_gaps() {
        let mut matrix = small_matrix();
        let pos = position('A', 1, AminoAcid::Glycine);
        matrix
            .record(&pos, AminoAcid::Phenylalanine, score(-3.5))
            .unwrap();
        let frozen = matrix.freeze();
        assert_eq!(frozen.cell_count(), 4);
        assert!(matches!(
            frozen.cell(0, 0),
            Some(MatrixCell::Outcome(VariantOutcome::Score(_)))
        ));
        assert_eq!(frozen.cell(0, 1), Some(&MatrixCell::NotComputed));
    }

    #[test]
    fn csv_renders_scores_failures_and_markers() {
        let mut matrix = small_matrix();
        matrix
            .record(
                &position('A', 1, AminoAcid::Glycine),
                AminoAcid::Phenylalanine,
                score(-3.25),
            )
            .unwrap();
        matrix
            .record(
                &position('A', 1, AminoAcid::Glycine),
                AminoAcid::Tryptophan,
                VariantOutcome::PlacementFailure("boom".into()),
            )
            .unwrap();
        matrix
            .record(
                &position('A', 2, AminoAcid::Phenylalanine),
                AminoAcid::Tryptophan,
                VariantOutcome::ScoringFailure("no score".into()),
            )
            .unwrap();

        let mut buffer = Vec::new();
        matrix.freeze().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "position,original,F,W");
        assert_eq!(lines[1], "A1,G,-3.250,FAILED(placement)");
        assert_eq!(lines[2], "A2,F,n/a,FAILED(scoring)");
    }
}
