//! Bidirectional search: a forward frontier grown from the canonical
//! start meets a backward frontier grown from the searched position.
//!
//! Each round expands whichever frontier predicts the cheaper next
//! level. After `depth` rounds the frontiers are joined on the
//! placement-only FEN key and verified with the specialization
//! relation: the fully determined forward state must refine the
//! possibly-Unknown backward state.

use std::collections::BTreeMap;

use crate::chess::advance;
use crate::chess::core::PieceKind;
use crate::chess::moves::Move;
use crate::chess::position::Position;
use crate::chess::retract;
use crate::chess::validate;
use crate::search::chain::PositionChain;
use crate::search::progress::ProgressReporter;
use crate::search::EmitSequence;

/// Bidirectional (meet-in-the-middle) search driver.
pub struct MeeterInTheMiddle<'r, 'c, F> {
    emit: F,
    reporter: &'r mut ProgressReporter<'c>,
    depth: usize,
}

impl<'r, 'c, F: EmitSequence> MeeterInTheMiddle<'r, 'c, F> {
    #[must_use]
    pub fn new(emit: F, reporter: &'r mut ProgressReporter<'c>) -> Self {
        Self {
            emit,
            reporter,
            depth: 0,
        }
    }

    /// Finds all `depth`-ply paths from the canonical starting position
    /// to a position the forward end of which specializes `position`.
    pub fn search(&mut self, position: &Position, depth: usize) {
        self.depth = depth;
        self.reporter.start();
        self.run(position, depth);
        self.reporter.end();
    }

    fn run(&mut self, position: &Position, depth: usize) {
        let mut front_chain = PositionChain::new();
        front_chain.add(Position::starting().pack(), None, 0);
        let mut back_chain = PositionChain::new();
        if validate::validate(position) {
            back_chain.add(position.pack(), None, 0);
        }
        // The consolidation is one more reported stage.
        let total_stages = depth + 1;
        for iteration in 0..depth {
            if back_chain.last_level().length == 0 {
                return;
            }
            if predict_next_level_size(&back_chain) < predict_next_level_size(&front_chain) {
                self.iterate(
                    &mut back_chain,
                    retract::enumerate_moves,
                    retract::retract,
                    true,
                    (iteration, total_stages),
                    None,
                );
            } else {
                self.iterate(
                    &mut front_chain,
                    |position| advance::enumerate_moves(position).to_vec(),
                    advance::advance,
                    false,
                    (iteration, total_stages),
                    Some(position),
                );
            }
        }
        self.consolidate(&front_chain, &back_chain, (total_stages - 1, total_stages));
    }

    /// Expands the chain's last level into a new one. The backward
    /// direction needs the full validation; forward positions inherit
    /// reachability from the start and only need the check predicate.
    /// A forward move of a pawn still standing on its initial square in
    /// the target position can never be part of a joining path and is
    /// skipped.
    fn iterate(
        &mut self,
        chain: &mut PositionChain,
        enumerate: impl Fn(&Position) -> Vec<Move>,
        perform: impl Fn(&mut Position, &Move),
        full_validation: bool,
        stage: (usize, usize),
        final_position: Option<&Position>,
    ) {
        chain.start_next_level();
        let last = chain.second_last_level();
        for step in 0..last.length {
            let index = last.start + step;
            self.reporter.report(&[stage, (step, last.length)]);
            let position = Position::unpack(&chain.get(index).position);
            for mv in enumerate(&position) {
                if let Some(target) = final_position {
                    if mv.piece == PieceKind::Pawn
                        && mv.from.rank() == mv.player.pawn_rank()
                        && target.is_piece_on(mv.from, mv.player, PieceKind::Pawn)
                    {
                        continue;
                    }
                }
                let mut next = position.clone();
                perform(&mut next, &mv);
                let keep = if full_validation {
                    validate::validate(&next)
                } else {
                    validate::validate_checks(&next)
                };
                if keep {
                    chain.add(next.pack(), Some(mv), index);
                }
            }
        }
    }

    /// Collects the incoming moves from a frontier entry back to the
    /// chain's seed, in that walking order.
    fn traverse(chain: &PositionChain, mut index: usize, moves: &mut Vec<Move>) {
        for _ in 1..chain.level_count() {
            let entry = chain.get(index);
            if let Some(mv) = entry.incoming {
                moves.push(mv);
            }
            index = entry.parent;
        }
    }

    fn merge(
        &mut self,
        front_chain: &PositionChain,
        front_index: usize,
        back_chain: &PositionChain,
        back_index: usize,
    ) {
        let mut moves = Vec::with_capacity(self.depth);
        Self::traverse(back_chain, back_index, &mut moves);
        moves.reverse();
        Self::traverse(front_chain, front_index, &mut moves);
        (self.emit)(&Position::starting(), &moves, self.depth);
    }

    fn consolidate(
        &mut self,
        front_chain: &PositionChain,
        back_chain: &PositionChain,
        stage: (usize, usize),
    ) {
        let front_level = front_chain.last_level();
        let back_level = back_chain.last_level();
        let total_steps = front_level.length + back_level.length;
        let mut step = 0;
        // Index the smaller frontier, scan the larger one.
        let front_indexed = front_level.length < back_level.length;
        let (indexed_chain, indexed_level, scanned_chain, scanned_level) = if front_indexed {
            (front_chain, front_level, back_chain, back_level)
        } else {
            (back_chain, back_level, front_chain, front_level)
        };
        let mut placements: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for index in indexed_level.start..indexed_level.start + indexed_level.length {
            self.reporter.report(&[stage, (step, total_steps)]);
            let placement = Position::unpack(&indexed_chain.get(index).position)
                .to_fen_placement(false);
            placements.entry(placement).or_default().push(index);
            step += 1;
        }
        for index in scanned_level.start..scanned_level.start + scanned_level.length {
            self.reporter.report(&[stage, (step, total_steps)]);
            let scanned = Position::unpack(&scanned_chain.get(index).position);
            if let Some(partners) = placements.get(&scanned.to_fen_placement(false)) {
                for &partner in partners {
                    let (front_index, back_index) = if front_indexed {
                        (partner, index)
                    } else {
                        (index, partner)
                    };
                    let front = Position::unpack(&front_chain.get(front_index).position);
                    let back = Position::unpack(&back_chain.get(back_index).position);
                    if front.can_be_specialization_of(&back) {
                        self.merge(front_chain, front_index, back_chain, back_index);
                    }
                }
            }
            step += 1;
        }
    }
}

/// Greedy growth estimate: the next level should be about
/// `last² / second_last` entries. Only relative order matters.
fn predict_next_level_size(chain: &PositionChain) -> f64 {
    if chain.level_count() < 2 {
        return 1.0;
    }
    let last = chain.last_level().length as f64;
    last * last / chain.second_last_level().length as f64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::validate::validate_and_stricten;

    fn solutions(fen: &str, depth: usize) -> Vec<Vec<Move>> {
        let mut position = Position::from_fen(fen).unwrap();
        validate_and_stricten(&mut position).unwrap();
        let mut sequences = Vec::new();
        let mut reporter = ProgressReporter::new(None);
        let mut meeter = MeeterInTheMiddle::new(
            |_position: &Position, moves: &[Move], _depth: usize| {
                sequences.push(moves.to_vec());
            },
            &mut reporter,
        );
        meeter.search(&position, depth);
        sequences
    }

    /// Replays an emitted sequence forward from the start; the reversed
    /// move order is the storage convention shared with the output
    /// layer.
    fn replay(moves: &[Move]) -> Position {
        let mut position = Position::starting();
        for mv in moves.iter().rev() {
            advance::advance(&mut position, mv);
        }
        position
    }

    #[test]
    fn finds_the_unique_three_ply_prelude() {
        // After 1. e4 e5 2. Nf3 the half-move clock and the absent
        // en-passant square exclude every other move order.
        let target = "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2";
        let sequences = solutions(target, 3);
        assert_eq!(sequences.len(), 1);
        let replayed = replay(&sequences[0]);
        let mut expected = Position::from_fen(target).unwrap();
        validate_and_stricten(&mut expected).unwrap();
        assert!(replayed.can_be_specialization_of(&expected));
        let notation: Vec<String> = sequences[0]
            .iter()
            .rev()
            .map(|mv| mv.to_long_algebraic(false, false))
            .collect();
        assert_eq!(notation, vec!["Pe2-e4", "Pe7-e5", "Ng1-f3"]);
    }

    #[test]
    fn join_respects_the_counters() {
        // The same placement with a zeroed half-move clock admits no
        // three-ply history: the clock says the last move was a pawn
        // move or capture, but it was a knight development.
        let target = "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 0 2";
        assert_eq!(solutions(target, 3).len(), 0);
    }

    #[test]
    fn two_ply_openings_join_in_the_middle() {
        // After 1. d4 d5 nothing distinguishes the move order (there is
        // only one), and the en passant squares pin both double pushes.
        let target = "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR w KQkq d6 0 2";
        let sequences = solutions(target, 2);
        assert_eq!(sequences.len(), 1);
        let notation: Vec<String> = sequences[0]
            .iter()
            .rev()
            .map(|mv| mv.to_long_algebraic(false, false))
            .collect();
        assert_eq!(notation, vec!["Pd2-d4", "Pd7-d5"]);
    }
}
