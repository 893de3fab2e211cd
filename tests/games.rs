//! Replays complete games move by move and checks the structural
//! invariants at every ply: the two move processors are mutually
//! inverse, the validator never rejects a truly reachable position,
//! and the packed form round-trips exactly.
//!
//! Every game is checked twice: once with the true record and once
//! "weakened" to placement and turn only, which exercises the Unknown
//! branches of the auxiliary state. Weakened replay compares placements
//! (replaying a retraction concretizes Unknown fields), full replay
//! uses the specialization relation.

use pretty_assertions::assert_eq;

use chass::chess::advance;
use chass::chess::attacks;
use chass::chess::moves::Move;
use chass::chess::position::Position;
use chass::chess::retract;
use chass::chess::san;
use chass::chess::validate;

const GAMES: [&str; 3] = [
    // A mating miniature: captures and a mate marker.
    "e4 e5 Qh5 Nc6 Bc4 Nf6 Qxf7#",
    // Both sides castle.
    "e4 e5 Nf3 Nc6 Bc4 Bc5 0-0 Nf6 d3 d6 c3 0-0",
    // En passant, answered by a regular pawn capture.
    "e4 Nf6 e5 d5 exd6 exd6",
];

fn weaken(position: &Position) -> Position {
    let record = position.to_fen_placement(true);
    let mut weakened = Position::from_fen(&record).unwrap();
    validate::validate_and_stricten(&mut weakened).unwrap();
    weakened
}

fn positions_agree(expected: &Position, produced: &Position, placement_only: bool) -> bool {
    if placement_only {
        expected.to_fen_placement(true) == produced.to_fen_placement(true)
    } else {
        expected.can_be_specialization_of(produced)
    }
}

/// `mv` must be enumerated in `from`, and performing it must land on
/// `to`.
fn check_move_processing(
    from: &Position,
    to: &Position,
    mv: &Move,
    enumerate: impl Fn(&Position) -> Vec<Move>,
    perform: impl Fn(&mut Position, &Move),
    placement_only: bool,
) -> bool {
    if !enumerate(from).contains(mv) {
        return false;
    }
    let mut produced = from.clone();
    perform(&mut produced, mv);
    positions_agree(to, &produced, placement_only)
}

fn forward(position: &Position) -> Vec<Move> {
    advance::enumerate_moves(position).to_vec()
}

/// Every forward move must be retractable back to where it came from,
/// and every retraction must be replayable forward.
fn check_processor_correspondence(position: &Position, weakened: bool) {
    let position = if weakened {
        weaken(position)
    } else {
        position.clone()
    };
    for mv in forward(&position) {
        let mut next = position.clone();
        advance::advance(&mut next, &mv);
        assert!(
            check_move_processing(
                &next,
                &position,
                &mv,
                retract::enumerate_moves,
                retract::retract,
                weakened,
            ),
            "{} is not retractable from {}",
            mv.to_long_algebraic(false, false),
            next.to_fen_placement(true),
        );
    }
    for mv in retract::enumerate_moves(&position) {
        let mut previous = position.clone();
        retract::retract(&mut previous, &mv);
        assert!(
            check_move_processing(&previous, &position, &mv, forward, advance::advance, weakened),
            "{} is not replayable from {}",
            mv.to_long_algebraic(false, false),
            previous.to_fen_placement(true),
        );
    }
}

/// A position reached by a legal move that passes the check predicate
/// must pass the full validator: the pruning bound has no false
/// negatives along real play.
fn check_validator_monotonicity(position: &Position, weakened: bool) {
    let position = if weakened {
        weaken(position)
    } else {
        position.clone()
    };
    assert!(
        validate::validate(&position),
        "reachable position rejected: {}",
        position.to_fen_placement(true),
    );
    for mv in forward(&position) {
        let mut next = position.clone();
        advance::advance(&mut next, &mv);
        if validate::validate_checks(&next) {
            assert!(
                validate::validate(&next),
                "reachable position rejected after {}: {}",
                mv.to_long_algebraic(false, false),
                next.to_fen_placement(true),
            );
        }
    }
}

fn check_pack_round_trip(position: &Position) {
    let unpacked = Position::unpack(&position.pack());
    assert!(position.can_be_specialization_of(&unpacked));
    assert!(unpacked.can_be_specialization_of(position));
    assert_eq!(position.pack(), unpacked.pack());
}

fn replay(game: &str) {
    let mut current = Position::starting();
    for notation in game.split_ascii_whitespace() {
        let (mv, check, mate) = san::interpret(notation, &current).unwrap();
        let check = check || mate;
        let previous = current.clone();
        advance::advance(&mut current, &mv);

        assert_eq!(
            mate,
            attacks::is_checkmated(&current),
            "mate marker mismatch after {notation}"
        );
        assert_eq!(
            check,
            attacks::is_in_check(&current, current.turn()),
            "check marker mismatch after {notation}"
        );

        check_pack_round_trip(&current);
        check_validator_monotonicity(&current, false);
        check_validator_monotonicity(&current, true);

        // The move just played must be among the enumerated
        // retractions of the position it produced.
        assert!(check_move_processing(
            &current,
            &previous,
            &mv,
            retract::enumerate_moves,
            retract::retract,
            false,
        ));
        assert!(check_move_processing(
            &weaken(&current),
            &weaken(&previous),
            &mv,
            retract::enumerate_moves,
            retract::retract,
            true,
        ));

        check_processor_correspondence(&current, false);
        check_processor_correspondence(&current, true);
    }
}

#[test]
fn mating_miniature() {
    replay(GAMES[0]);
}

#[test]
fn castling_on_both_sides() {
    replay(GAMES[1]);
}

#[test]
fn en_passant_exchange() {
    replay(GAMES[2]);
}
