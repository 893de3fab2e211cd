//! Position legality: the strict user-input gate and the cheap
//! predicates that prune search branches.
//!
//! The two layers differ on purpose. User input gets precise
//! diagnostics and is *strictened* (castling claims are reconciled with
//! the board). Inside the search nothing signals: a position either
//! survives the predicates or its branch silently vanishes.

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::attacks;
use crate::chess::core::{CastlingSide, PieceCounts, PieceKind, Player, Square, Ternary};
use crate::chess::matchers;
use crate::chess::position::Position;

/// Promotions can only mint as many extra pieces as pawns have left the
/// board, so extras plus surviving pawns stay within the pawn
/// complement.
fn counts_are_possible(counts: &PieceCounts) -> bool {
    let extras = 0.max(counts.queens - 1)
        + 0.max(counts.rooks - 2)
        + 0.max(counts.light_bishops - 1)
        + 0.max(counts.dark_bishops - 1)
        + 0.max(counts.knights - 2);
    extras + counts.pawns <= 8
}

/// The side that just moved must not have left its king in check.
#[must_use]
pub fn validate_checks(position: &Position) -> bool {
    !attacks::is_in_check(position, !position.turn())
}

fn validate_required_moves(position: &Position, player: Player) -> bool {
    let Some(completed) = position.completed_moves(player) else {
        return true;
    };
    let captured_opponents = 16 - position.pieces(!player).len() as i64;
    // `<=` rather than `<`: the first move cannot be a capture.
    if captured_opponents > 0 && i64::from(completed) <= captured_opponents {
        return false;
    }
    i64::from(matchers::required_moves(position.pieces(player))) <= i64::from(completed)
}

/// A logged full-move counter of 1 with White to move leaves no room
/// for any history: the position must be the starting array itself.
fn validate_initial(position: &Position) -> bool {
    position.turn() != Player::White
        || !position.full_move_log()
        || position.full_moves() > 1
        || attacks::can_be_starting(position)
}

/// The in-search pruning predicate: check legality, piece-count
/// possibility, the required-move lower bound against the completed
/// moves of each side, and the initial-position rule.
#[must_use]
pub fn validate(position: &Position) -> bool {
    validate_checks(position)
        && counts_are_possible(position.piece_counts(Player::White))
        && counts_are_possible(position.piece_counts(Player::Black))
        && validate_required_moves(position, Player::White)
        && validate_required_moves(position, Player::Black)
        && validate_initial(position)
}

fn validate_user_kings(position: &Position, player: Player) -> anyhow::Result<()> {
    let kings = position
        .pieces(player)
        .iter()
        .filter(|piece| piece.kind == PieceKind::King)
        .count();
    match kings {
        0 => bail!("{player} has no king"),
        1 => Ok(()),
        _ => bail!("{player} has more than one king"),
    }
}

fn validate_user_counts(position: &Position, player: Player) -> anyhow::Result<()> {
    let counts = position.piece_counts(player);
    let total = 1
        + counts.queens
        + counts.rooks
        + counts.light_bishops
        + counts.dark_bishops
        + counts.knights
        + counts.pawns;
    if total > 16 {
        bail!("{player} has too many pieces");
    }
    if counts.pawns > 8 {
        bail!("{player} has too many pawns");
    }
    if !counts_are_possible(counts) {
        bail!("{player}'s piece count is not possible in a legal game");
    }
    Ok(())
}

fn validate_user_pawns(position: &Position, player: Player) -> anyhow::Result<()> {
    for piece in position.pieces(player) {
        if piece.kind == PieceKind::Pawn && (piece.square.rank() == 0 || piece.square.rank() == 7) {
            bail!("{player} has a pawn on a boundary rank");
        }
    }
    Ok(())
}

fn validate_user_en_passant(position: &Position) -> anyhow::Result<()> {
    if position.en_passant() != Ternary::True {
        return Ok(());
    }
    let file = position.en_passant_file();
    let mover = !position.turn();
    let (rank, behind, origin) = match mover {
        Player::White => (3, 2, 1),
        Player::Black => (4, 5, 6),
    };
    if !position.is_piece_on(Square::new(file, rank), mover, PieceKind::Pawn)
        || !position.is_square_empty(Square::new(file, behind))
        || !position.is_square_empty(Square::new(file, origin))
    {
        bail!(
            "en passant at file '{}' is incorrectly defined as possible",
            (b'a' + file as u8) as char
        );
    }
    Ok(())
}

fn validate_user_half_moves(position: &Position) -> anyhow::Result<()> {
    if position.half_move_log()
        && position.en_passant() == Ternary::True
        && position.half_moves() > 0
    {
        bail!("the half-move clock cannot be positive when an en passant capture is possible");
    }
    Ok(())
}

fn validate_user_full_moves(position: &Position) -> anyhow::Result<()> {
    if !position.full_move_log() {
        return Ok(());
    }
    if position.full_moves() < 1 {
        bail!("the full-move number should be positive");
    }
    if position.half_move_log() {
        if let Some(ply) = position.ply_counter() {
            if u32::from(position.half_moves()) >= ply {
                bail!("the half-move clock is exceeding (twice) the full-move counter");
            }
        }
    }
    if position.full_moves() == 1
        && position.turn() == Player::White
        && !attacks::can_be_starting(position)
    {
        bail!("position is incorrectly defined as starting");
    }
    Ok(())
}

/// Vets a user-supplied position and reconciles its castling claims
/// with the board: a right declared True without the king/rook
/// geometry is an error, a right left Unknown without the geometry is
/// silently downgraded to False.
pub fn validate_and_stricten(position: &mut Position) -> anyhow::Result<()> {
    for player in Player::iter() {
        validate_user_kings(position, player)?;
        validate_user_counts(position, player)?;
        validate_user_pawns(position, player)?;
    }

    if let (Some(white_king), Some(black_king)) =
        (position.king(Player::White), position.king(Player::Black))
    {
        if white_king.is_adjacent(black_king) {
            bail!("kings are attacking each other");
        }
    }

    if !validate_checks(position) {
        bail!("the side that moved last is in check");
    }

    for player in Player::iter() {
        for side in CastlingSide::iter() {
            if !attacks::is_in_castling_position(position, player, side, None) {
                match position.castling(player, side) {
                    Ternary::True => bail!(
                        "{player}'s {side} castling is incorrectly defined as possible"
                    ),
                    _ => position.set_castling(player, side, Ternary::False),
                }
            }
        }
    }

    validate_user_en_passant(position)?;
    validate_user_half_moves(position)?;
    validate_user_full_moves(position)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_fen(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn stricten(fen: &str) -> anyhow::Result<Position> {
        let mut position = from_fen(fen);
        validate_and_stricten(&mut position)?;
        Ok(position)
    }

    #[test]
    fn accepts_the_starting_record() {
        assert!(stricten("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_ok());
    }

    #[test]
    fn rejects_king_count_problems() {
        assert!(stricten("8/8/8/8/8/8/8/4K3 w - -").is_err());
        assert!(stricten("4k2k/8/8/8/8/8/8/4K3 w - -").is_err());
    }

    #[test]
    fn rejects_impossible_piece_sets() {
        // Nine pawns.
        assert!(stricten("4k3/8/8/8/8/P7/PPPPPPPP/4K3 w - -").is_err());
        // Full pawn set plus a third knight: the extra knight has no
        // pawn soul to come from.
        assert!(stricten("4k3/8/8/8/8/NNN5/PPPPPPPP/4K3 w - -").is_err());
        // Without one pawn the same set is fine.
        assert!(stricten("4k3/8/8/8/8/NNN5/PPPPPPP1/4K3 w - -").is_ok());
    }

    #[test]
    fn rejects_boundary_pawns_and_adjacent_kings() {
        assert!(stricten("4k2P/8/8/8/8/8/8/4K3 w - -").is_err());
        assert!(stricten("8/8/8/8/3kK3/8/8/8 w - -").is_err());
    }

    #[test]
    fn rejects_check_on_the_side_that_just_moved() {
        // White to move while Black's king is already under attack.
        assert!(stricten("4k3/4R3/8/8/8/8/8/4K3 w - -").is_err());
        // The mirror situation is fine: Black to move, Black in check.
        assert!(stricten("4k3/4R3/8/8/8/8/8/4K3 b - -").is_ok());
    }

    #[test]
    fn strictens_castling_claims() {
        // Unknown rights with broken geometry quietly become False.
        let position = stricten("4k3/8/8/8/8/8/8/4K3 w ? ?").unwrap();
        assert_eq!(
            position.castling(Player::White, CastlingSide::Kingside),
            Ternary::False
        );
        assert_eq!(
            position.castling(Player::Black, CastlingSide::Queenside),
            Ternary::False
        );
        // A True right with broken geometry is an error.
        assert!(stricten("4k3/8/8/8/8/8/8/4K3 w K - 0 10").is_err());
        // Intact geometry keeps the claim.
        let position = stricten("4k3/8/8/8/8/8/8/4K2R w K - 0 10").unwrap();
        assert_eq!(
            position.castling(Player::White, CastlingSide::Kingside),
            Ternary::True
        );
    }

    #[test]
    fn rejects_incoherent_en_passant() {
        // No pawn stands on the implied double-push square.
        assert!(stricten("4k3/8/8/8/8/8/8/4K3 b - e3").is_err());
        // Positive half-move clock contradicts en passant.
        assert!(
            stricten("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 1 1").is_err()
        );
        assert!(
            stricten("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").is_ok()
        );
    }

    #[test]
    fn rejects_counter_inconsistencies() {
        // Full-move counter of zero.
        assert!(stricten("4k3/8/8/8/8/8/8/4K3 w - - 0 0").is_err());
        // Half-move clock at or past the ply counter.
        assert!(stricten("4k3/8/8/8/8/8/8/4K3 w - - 7 4").is_err());
        assert!(stricten("4k3/8/8/8/8/8/8/4K3 w - - 6 4").is_ok());
        // Move one with White to play must be the starting position.
        assert!(stricten("4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }

    #[test]
    fn search_validate_accepts_legal_lines() {
        assert!(validate(&Position::starting()));
        assert!(validate(&from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        )));
    }

    #[test]
    fn search_validate_prunes_by_required_moves() {
        // A developed knight and pawn after a single completed White
        // move cannot both be accounted for.
        assert!(!validate(&from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq ? ? 1"
        )));
        // Unlogged counters skip the bound.
        assert!(validate(&from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq ? ?"
        )));
    }

    #[test]
    fn search_validate_prunes_early_captures() {
        // A missing Black piece after White's first completed move: the
        // first move cannot capture.
        assert!(!validate(&from_fen(
            "rnbqkbn1/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQ ? ? 1"
        )));
    }

    #[test]
    fn search_validate_enforces_the_initial_rule() {
        assert!(!validate(&from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq ? ? 1"
        )));
    }
}
