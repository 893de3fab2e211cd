//! Attack, check and board-geometry queries shared by the move
//! processors and the validator.

use crate::chess::core::{CastlingSide, Piece, PieceKind, Player, Square};
use crate::chess::moves::Move;
use crate::chess::position::{Position, STARTING_PLACEMENT};
use crate::chess::advance;

/// Whether every square strictly between the endpoints of a
/// `span`-long straight walk from `from` is empty.
fn is_range_empty(position: &Position, from: Square, file_step: i8, rank_step: i8, span: i8) -> bool {
    for step in 1..span {
        match from.shift(file_step * step, rank_step * step) {
            Some(square) if position.is_square_empty(square) => {}
            _ => return false,
        }
    }
    true
}

fn attacks_as_rook(position: &Position, piece: &Piece, file_delta: i8, rank_delta: i8) -> bool {
    let along_file = file_delta == 0
        && is_range_empty(position, piece.square, 0, rank_delta.signum(), rank_delta.abs());
    let along_rank = rank_delta == 0
        && is_range_empty(position, piece.square, file_delta.signum(), 0, file_delta.abs());
    along_file || along_rank
}

fn attacks_as_bishop(position: &Position, piece: &Piece, file_delta: i8, rank_delta: i8) -> bool {
    file_delta.abs() == rank_delta.abs()
        && is_range_empty(
            position,
            piece.square,
            file_delta.signum(),
            rank_delta.signum(),
            file_delta.abs(),
        )
}

/// Geometric attack test for a single piece. Sliding attacks require
/// the intervening squares to be empty; occupancy of the target square
/// itself is irrelevant.
#[must_use]
pub fn is_attacking(position: &Position, piece: &Piece, square: Square) -> bool {
    let file_delta = square.file() - piece.square.file();
    let rank_delta = square.rank() - piece.square.rank();
    match piece.kind {
        PieceKind::King => file_delta.abs() <= 1 && rank_delta.abs() <= 1,
        PieceKind::Queen => {
            attacks_as_rook(position, piece, file_delta, rank_delta)
                || attacks_as_bishop(position, piece, file_delta, rank_delta)
        }
        PieceKind::Rook => attacks_as_rook(position, piece, file_delta, rank_delta),
        PieceKind::Bishop => attacks_as_bishop(position, piece, file_delta, rank_delta),
        PieceKind::Knight => {
            (file_delta.abs() == 1 && rank_delta.abs() == 2)
                || (file_delta.abs() == 2 && rank_delta.abs() == 1)
        }
        PieceKind::Pawn => {
            file_delta.abs() == 1 && rank_delta == piece.player.pawn_direction()
        }
    }
}

/// Whether any of the opposing side's pieces attacks `square`.
#[must_use]
pub fn is_under_attack(position: &Position, player: Player, square: Square) -> bool {
    position
        .pieces(!player)
        .iter()
        .any(|piece| is_attacking(position, piece, square))
}

/// Whether the given side's king is attacked.
#[must_use]
pub fn is_in_check(position: &Position, player: Player) -> bool {
    match position.king(player) {
        Some(king) => is_under_attack(position, player, king.square),
        None => false,
    }
}

/// Whether the side to move is checkmated: in check with no legal move.
#[must_use]
pub fn is_checkmated(position: &Position) -> bool {
    // A move-less position without check is stalemate, not mate.
    if !is_in_check(position, position.turn()) {
        return false;
    }
    advance::legal_moves(position, true).is_empty()
}

/// Whether the side's king and the given flank's rook stand on their
/// initial squares. With `breaking_move` supplied, additionally
/// requires that the move could have disrupted that right: a same-side
/// move off the king or rook home square, or an opposing capture into
/// the rook corner.
#[must_use]
pub fn is_in_castling_position(
    position: &Position,
    player: Player,
    side: CastlingSide,
    breaking_move: Option<&Move>,
) -> bool {
    let rank = player.backrank();
    let rook_file = side.rook_file();
    if !position.is_piece_on(Square::new(4, rank), player, PieceKind::King)
        || !position.is_piece_on(Square::new(rook_file, rank), player, PieceKind::Rook)
    {
        return false;
    }
    match breaking_move {
        None => true,
        Some(mv) => {
            (mv.player == player
                && mv.from.rank() == rank
                && (mv.from.file() == 4 || mv.from.file() == rook_file))
                || (mv.player != player && mv.to.file() == rook_file && mv.to.rank() == rank)
        }
    }
}

/// Whether the position is compatible with being the standard starting
/// array: White to move, counters at their initial values when logged,
/// no castling right known to be lost, and the canonical placement.
#[must_use]
pub fn can_be_starting(position: &Position) -> bool {
    use crate::chess::core::Ternary;
    use strum::IntoEnumIterator;

    position.turn() == Player::White
        && (!position.full_move_log() || position.full_moves() == 1)
        && (!position.half_move_log() || position.half_moves() == 0)
        && position.pieces(Player::White).len() == 16
        && position.pieces(Player::Black).len() == 16
        && Player::iter().all(|player| {
            CastlingSide::iter().all(|side| position.castling(player, side) != Ternary::False)
        })
        && position.to_fen_placement(false) == STARTING_PLACEMENT
}
