//! Depth-first retrograde search.
//!
//! Explores retractions exhaustively down to the full-examination
//! depth, then switches to witness mode: one path to a possible start
//! is enough to prove a sequence extends, so the first success cuts the
//! branch.

use crate::chess::attacks;
use crate::chess::moves::Move;
use crate::chess::position::Position;
use crate::chess::retract;
use crate::chess::validate;
use crate::search::progress::{ProgressFrame, ProgressReporter};
use crate::search::EmitSequence;

/// Depth-first retrograde search driver.
pub struct Backtracker<'r, 'c, F> {
    emit: F,
    reporter: &'r mut ProgressReporter<'c>,
    full_examination_depth: usize,
    total_depth: usize,
}

impl<'r, 'c, F: EmitSequence> Backtracker<'r, 'c, F> {
    #[must_use]
    pub fn new(emit: F, reporter: &'r mut ProgressReporter<'c>) -> Self {
        Self {
            emit,
            reporter,
            full_examination_depth: 0,
            total_depth: 0,
        }
    }

    /// Enumerates every retrograde sequence of up to
    /// `full_examination_depth` moves behind `position`, continuing a
    /// single witness line down to `total_depth` beyond that.
    pub fn search(
        &mut self,
        position: &Position,
        full_examination_depth: usize,
        total_depth: usize,
    ) {
        self.full_examination_depth = full_examination_depth;
        self.total_depth = total_depth;
        self.reporter.start();
        let mut moves = Vec::new();
        let mut progress = Vec::new();
        self.backtrack(position, &mut moves, &mut progress);
        self.reporter.end();
    }

    fn backtrack(
        &mut self,
        position: &Position,
        moves: &mut Vec<Move>,
        progress: &mut Vec<ProgressFrame>,
    ) -> bool {
        if !validate::validate(position) {
            return false;
        }

        let current_depth = moves.len();
        let full_examination = current_depth < self.full_examination_depth;
        let at_deepest = current_depth == self.total_depth;

        if at_deepest || attacks::can_be_starting(position) {
            (self.emit)(position, moves, self.full_examination_depth);
            if at_deepest || !full_examination {
                return true;
            }
        }

        let mut found = false;
        let retractions = retract::enumerate_moves(position);
        progress.push((0, retractions.len()));
        for retraction in &retractions {
            self.reporter.report(progress);
            let mut previous = position.clone();
            retract::retract(&mut previous, retraction);
            moves.push(*retraction);
            if self.backtrack(&previous, moves, progress) {
                found = true;
            }
            moves.pop();
            if found && !full_examination {
                progress.pop();
                return true;
            }
            if let Some(frame) = progress.last_mut() {
                frame.0 += 1;
            }
        }
        progress.pop();
        found
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::validate::validate_and_stricten;

    fn solutions(fen: &str, full_examination_depth: usize, extra: usize) -> Vec<Vec<Move>> {
        let mut position = Position::from_fen(fen).unwrap();
        validate_and_stricten(&mut position).unwrap();
        let mut sequences = Vec::new();
        let mut reporter = ProgressReporter::new(None);
        let mut backtracker = Backtracker::new(
            |_position: &Position, moves: &[Move], _depth: usize| {
                sequences.push(moves.to_vec());
            },
            &mut reporter,
        );
        backtracker.search(&position, full_examination_depth, full_examination_depth + extra);
        sequences
    }

    #[test]
    fn depth_zero_emits_the_position_itself() {
        let sequences = solutions(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            0,
            0,
        );
        assert_eq!(sequences.len(), 1);
        assert!(sequences[0].is_empty());
    }

    #[test]
    fn declared_en_passant_pins_the_single_history() {
        let sequences = solutions(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            1,
            0,
        );
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].len(), 1);
        assert_eq!(sequences[0][0].to_long_algebraic(false, false), "Pe2-e4");
    }

    #[test]
    fn denied_en_passant_contradicts_the_double_push() {
        // The only one-ply history is the double push, which would have
        // made en passant available; a record denying it has no
        // history.
        let sequences = solutions(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
            1,
            0,
        );
        assert_eq!(sequences.len(), 0);
    }

    #[test]
    fn counterless_start_enumerates_knight_returns() {
        // Without counters the starting placement admits history: the
        // trivial empty sequence at depth 0, plus the 4 x 4 knight
        // round trips at depth 2.
        let sequences = solutions("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w", 2, 0);
        assert_eq!(sequences.len(), 17);
        assert_eq!(
            sequences.iter().filter(|moves| moves.is_empty()).count(),
            1
        );
        assert_eq!(
            sequences.iter().filter(|moves| moves.len() == 2).count(),
            16
        );
    }

    #[test]
    fn proof_depth_stops_after_one_witness() {
        // Full examination depth 1 with one extra proof ply: the single
        // retraction is emitted, then one witness continuation proves
        // it extends without enumerating alternatives.
        let sequences = solutions("rnbqkbnr/1ppppppp/p7/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq ? ?", 1, 1);
        assert!(!sequences.is_empty());
        assert!(sequences.iter().all(|moves| moves.len() <= 2));
    }
}
