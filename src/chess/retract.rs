//! Retrograde move processing: enumerates the moves that could have
//! produced the current position and un-applies them.
//!
//! Where the forward direction narrows auxiliary state, the retrograde
//! direction widens it: castling rights go False→Unknown whenever the
//! retracted move could have been the disrupter, and en passant becomes
//! Unknown except for the one retraction that pins it down.

use crate::chess::attacks;
use crate::chess::core::{CastlingSide, Piece, PieceKind, Player, Square, Ternary};
use crate::chess::moves::{Move, MoveKind};
use crate::chess::position::Position;

/// Initial allocation for the retrograde buffer. Backward branching
/// dwarfs forward branching since every landing square multiplies by
/// the possible uncaptured piece kinds.
pub const RETRACT_BUFFER_HINT: usize = 2500;

/// Moves are recorded forward-oriented: `from` is the square the piece
/// is retracted to.
fn construct(piece: &Piece, kind: MoveKind, from: Square) -> Move {
    Move {
        piece: piece.kind,
        player: piece.player,
        from,
        to: piece.square,
        kind,
    }
}

/// Uncapturable piece kinds for a capture retracted on `to`: the four
/// officers always, a pawn only away from the boundary ranks.
fn enumerate_uncaptures(to: Square, mut emit: impl FnMut(PieceKind)) {
    emit(PieceKind::Queen);
    emit(PieceKind::Rook);
    emit(PieceKind::Bishop);
    emit(PieceKind::Knight);
    if to.rank() != 0 && to.rank() != 7 {
        emit(PieceKind::Pawn);
    }
}

/// A retraction to an empty square may or may not have been a capture;
/// the half-move gating decides which variants are admissible.
fn enumerate_potential_captures(
    piece: &Piece,
    from: Square,
    pawn_or_capture: Ternary,
    moves: &mut Vec<Move>,
) {
    if pawn_or_capture != Ternary::True {
        moves.push(construct(piece, MoveKind::Simple, from));
    }
    if pawn_or_capture != Ternary::False {
        enumerate_uncaptures(piece.square, |captured| {
            moves.push(construct(piece, MoveKind::Capture { captured }, from));
        });
    }
}

fn enumerate_king_moves(
    position: &Position,
    piece: &Piece,
    pawn_or_capture: Ternary,
    moves: &mut Vec<Move>,
) {
    for file_delta in -1..=1 {
        for rank_delta in -1..=1 {
            if file_delta == 0 && rank_delta == 0 {
                continue;
            }
            if let Some(square) = piece.square.shift(file_delta, rank_delta) {
                if position.is_square_empty(square) {
                    enumerate_potential_captures(piece, square, pawn_or_capture, moves);
                }
            }
        }
    }
    // Castling undo: the king on its post-castling square, the rook
    // beside it, the vacated squares empty and unattacked.
    if pawn_or_capture != Ternary::True && piece.square.rank() == piece.player.backrank() {
        if piece.square.file() == 6 {
            let (Some(initial), Some(rook), Some(corner)) = (
                piece.square.shift(-2, 0),
                piece.square.shift(-1, 0),
                piece.square.shift(1, 0),
            ) else {
                return;
            };
            if position.is_piece_on(rook, piece.player, PieceKind::Rook)
                && position.is_square_empty(initial)
                && position.is_square_empty(corner)
                && !attacks::is_under_attack(position, piece.player, rook)
                && !attacks::is_under_attack(position, piece.player, initial)
            {
                moves.push(construct(
                    piece,
                    MoveKind::Castle(CastlingSide::Kingside),
                    initial,
                ));
            }
        } else if piece.square.file() == 2 {
            let (Some(initial), Some(rook), Some(knight_home), Some(corner)) = (
                piece.square.shift(2, 0),
                piece.square.shift(1, 0),
                piece.square.shift(-1, 0),
                piece.square.shift(-2, 0),
            ) else {
                return;
            };
            if position.is_piece_on(rook, piece.player, PieceKind::Rook)
                && position.is_square_empty(initial)
                && position.is_square_empty(knight_home)
                && position.is_square_empty(corner)
                && !attacks::is_under_attack(position, piece.player, rook)
                && !attacks::is_under_attack(position, piece.player, initial)
            {
                moves.push(construct(
                    piece,
                    MoveKind::Castle(CastlingSide::Queenside),
                    initial,
                ));
            }
        }
    }
}

fn enumerate_linear_moves(
    position: &Position,
    piece: &Piece,
    file_direction: i8,
    rank_direction: i8,
    pawn_or_capture: Ternary,
    moves: &mut Vec<Move>,
) {
    let mut square = piece.square;
    while let Some(next) = square.shift(file_direction, rank_direction) {
        if !position.is_square_empty(next) {
            return;
        }
        enumerate_potential_captures(piece, next, pawn_or_capture, moves);
        square = next;
    }
}

fn enumerate_rook_like_moves(
    position: &Position,
    piece: &Piece,
    pawn_or_capture: Ternary,
    moves: &mut Vec<Move>,
) {
    for (file_direction, rank_direction) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        enumerate_linear_moves(position, piece, file_direction, rank_direction, pawn_or_capture, moves);
    }
}

fn enumerate_bishop_like_moves(
    position: &Position,
    piece: &Piece,
    pawn_or_capture: Ternary,
    moves: &mut Vec<Move>,
) {
    for (file_direction, rank_direction) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        enumerate_linear_moves(position, piece, file_direction, rank_direction, pawn_or_capture, moves);
    }
}

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

fn enumerate_knight_moves(
    position: &Position,
    piece: &Piece,
    pawn_or_capture: Ternary,
    moves: &mut Vec<Move>,
) {
    for (file_delta, rank_delta) in KNIGHT_DELTAS {
        if let Some(square) = piece.square.shift(file_delta, rank_delta) {
            if position.is_square_empty(square) {
                enumerate_potential_captures(piece, square, pawn_or_capture, moves);
            }
        }
    }
}

fn enumerate_pawn_moves(
    position: &Position,
    piece: &Piece,
    en_passant: Ternary,
    moves: &mut Vec<Move>,
) {
    if piece.square.rank() == piece.player.pawn_rank() {
        return;
    }
    // The rank a double-pushed pawn of this side lands on.
    let double_push_rank = match piece.player {
        Player::White => 3,
        Player::Black => 4,
    };
    let shift = -piece.player.pawn_direction();
    if en_passant == Ternary::True {
        // The recorded en passant pins the last move down entirely.
        if piece.square.file() == position.en_passant_file()
            && piece.square.rank() == double_push_rank
        {
            if let Some(from) = piece.square.shift(0, 2 * shift) {
                moves.push(construct(piece, MoveKind::Simple, from));
            }
        }
        return;
    }
    if en_passant != Ternary::False && piece.square.rank() == double_push_rank {
        // A retracted double push would make en passant available, so
        // it is admissible only while the state is unknown.
        let (Some(step), Some(from)) = (piece.square.shift(0, shift), piece.square.shift(0, 2 * shift))
        else {
            return;
        };
        if position.is_square_empty(step) && position.is_square_empty(from) {
            moves.push(construct(piece, MoveKind::Simple, from));
        }
    }
    if let Some(from) = piece.square.shift(0, shift) {
        if position.is_square_empty(from) {
            moves.push(construct(piece, MoveKind::Simple, from));
        }
    }
    for file_delta in [-1, 1] {
        let Some(from) = piece.square.shift(file_delta, shift) else {
            continue;
        };
        if !position.is_square_empty(from) {
            continue;
        }
        enumerate_uncaptures(piece.square, |captured| {
            moves.push(construct(piece, MoveKind::Capture { captured }, from));
        });
        // Un-capturing en passant: the pawn sits one rank beyond the
        // double-push rank, with room to restore the victim behind it
        // and the victim's transit square clear.
        if from.rank() == double_push_rank - shift {
            let (Some(victim), Some(transit)) = (
                piece.square.shift(0, shift),
                piece.square.shift(0, -shift),
            ) else {
                continue;
            };
            if position.is_square_empty(victim) && position.is_square_empty(transit) {
                moves.push(construct(piece, MoveKind::EnPassant, from));
            }
        }
    }
}

/// Any non-king piece on its last rank may have just promoted from the
/// square one rank back, quietly or with a capture.
fn enumerate_promotion_moves(position: &Position, piece: &Piece, moves: &mut Vec<Move>) {
    let last_rank = (!piece.player).backrank();
    if piece.square.rank() != last_rank || piece.kind == PieceKind::King {
        return;
    }
    let shift = -piece.player.pawn_direction();
    let promoted = piece.kind;
    if let Some(from) = piece.square.shift(0, shift) {
        if position.is_square_empty(from) {
            moves.push(Move {
                piece: PieceKind::Pawn,
                player: piece.player,
                from,
                to: piece.square,
                kind: MoveKind::Promotion { promoted },
            });
        }
    }
    for file_delta in [-1, 1] {
        let Some(from) = piece.square.shift(file_delta, shift) else {
            continue;
        };
        if position.is_square_empty(from) {
            enumerate_uncaptures(piece.square, |captured| {
                moves.push(Move {
                    piece: PieceKind::Pawn,
                    player: piece.player,
                    from,
                    to: piece.square,
                    kind: MoveKind::PromotionCapture { captured, promoted },
                });
            });
        }
    }
}

/// Enumerates every move the side that moved last could have just
/// played, under the half-move and en-passant gating policies.
#[must_use]
pub fn enumerate_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::new();
    // A logged first move with White to play has no history at all.
    if position.full_move_log() && position.full_moves() == 1 && position.turn() == Player::White {
        return moves;
    }
    moves.reserve(RETRACT_BUFFER_HINT);
    let pawn_or_capture = if position.half_move_log() {
        if position.half_moves() == 0 {
            Ternary::True
        } else {
            Ternary::False
        }
    } else {
        Ternary::Unknown
    };
    let en_passant = position.en_passant();
    for piece in position.pieces(!position.turn()) {
        match piece.kind {
            PieceKind::King => {
                if en_passant != Ternary::True {
                    enumerate_king_moves(position, piece, pawn_or_capture, &mut moves);
                }
            }
            PieceKind::Queen => {
                if en_passant != Ternary::True {
                    enumerate_rook_like_moves(position, piece, pawn_or_capture, &mut moves);
                    enumerate_bishop_like_moves(position, piece, pawn_or_capture, &mut moves);
                }
            }
            PieceKind::Rook => {
                if en_passant != Ternary::True {
                    enumerate_rook_like_moves(position, piece, pawn_or_capture, &mut moves);
                }
            }
            PieceKind::Bishop => {
                if en_passant != Ternary::True {
                    enumerate_bishop_like_moves(position, piece, pawn_or_capture, &mut moves);
                }
            }
            PieceKind::Knight => {
                if en_passant != Ternary::True {
                    enumerate_knight_moves(position, piece, pawn_or_capture, &mut moves);
                }
            }
            PieceKind::Pawn => {
                if pawn_or_capture != Ternary::False {
                    enumerate_pawn_moves(position, piece, en_passant, &mut moves);
                }
            }
        }
        if pawn_or_capture != Ternary::False && en_passant != Ternary::True {
            enumerate_promotion_moves(position, piece, &mut moves);
        }
    }
    moves
}

fn update_pieces(position: &mut Position, mv: &Move) {
    let opponent = !mv.player;
    match mv.kind {
        MoveKind::Simple => position.move_piece(mv.to, mv.from),
        MoveKind::Promotion { .. } => {
            position.remove_piece(mv.to);
            position.add_piece(mv.from, PieceKind::Pawn, mv.player);
        }
        MoveKind::Capture { captured } => {
            position.move_piece(mv.to, mv.from);
            position.add_piece(mv.to, captured, opponent);
        }
        MoveKind::PromotionCapture { captured, .. } => {
            position.remove_piece(mv.to);
            position.add_piece(mv.from, PieceKind::Pawn, mv.player);
            position.add_piece(mv.to, captured, opponent);
        }
        MoveKind::EnPassant => {
            position.move_piece(mv.to, mv.from);
            let victim_rank = match mv.player {
                Player::White => 4,
                Player::Black => 3,
            };
            position.add_piece(Square::new(mv.to.file(), victim_rank), PieceKind::Pawn, opponent);
        }
        MoveKind::Castle(side) => {
            let rank = mv.player.backrank();
            let (rook_at, rook_home) = match side {
                CastlingSide::Kingside => (Square::new(5, rank), Square::new(7, rank)),
                CastlingSide::Queenside => (Square::new(3, rank), Square::new(0, rank)),
            };
            position.move_piece(mv.to, mv.from);
            position.move_piece(rook_at, rook_home);
        }
    }
}

fn update_castling(position: &mut Position, mv: &Move) {
    let player = mv.player;
    let opponent = !player;
    let kingside = position.castling(player, CastlingSide::Kingside);
    let queenside = position.castling(player, CastlingSide::Queenside);
    match mv.kind {
        MoveKind::Simple | MoveKind::Capture { .. } => {
            // A right already False stays ruled out unless this very
            // move could have been the disrupter; then it widens.
            if kingside != Ternary::True {
                let breaking = (kingside == Ternary::False).then_some(mv);
                let state = if attacks::is_in_castling_position(
                    position,
                    player,
                    CastlingSide::Kingside,
                    breaking,
                ) {
                    Ternary::Unknown
                } else {
                    Ternary::False
                };
                position.set_castling(player, CastlingSide::Kingside, state);
            }
            if queenside != Ternary::True {
                let breaking = (queenside == Ternary::False).then_some(mv);
                let state = if attacks::is_in_castling_position(
                    position,
                    player,
                    CastlingSide::Queenside,
                    breaking,
                ) {
                    Ternary::Unknown
                } else {
                    Ternary::False
                };
                position.set_castling(player, CastlingSide::Queenside, state);
            }
        }
        MoveKind::Castle(CastlingSide::Kingside) => {
            position.set_castling(player, CastlingSide::Kingside, Ternary::True);
            let state = if attacks::is_in_castling_position(
                position,
                player,
                CastlingSide::Queenside,
                None,
            ) {
                Ternary::Unknown
            } else {
                Ternary::False
            };
            position.set_castling(player, CastlingSide::Queenside, state);
        }
        MoveKind::Castle(CastlingSide::Queenside) => {
            let state = if attacks::is_in_castling_position(
                position,
                player,
                CastlingSide::Kingside,
                None,
            ) {
                Ternary::Unknown
            } else {
                Ternary::False
            };
            position.set_castling(player, CastlingSide::Kingside, state);
            position.set_castling(player, CastlingSide::Queenside, Ternary::True);
        }
        _ => {}
    }
    // A retracted capture into a rook corner may have been what broke
    // the opponent's right there.
    if matches!(
        mv.kind,
        MoveKind::Capture { .. } | MoveKind::PromotionCapture { .. }
    ) {
        for side in [CastlingSide::Kingside, CastlingSide::Queenside] {
            if attacks::is_in_castling_position(position, opponent, side, Some(mv)) {
                position.set_castling(opponent, side, Ternary::Unknown);
            }
        }
    }
}

fn update_en_passant(position: &mut Position, mv: &Move) {
    if mv.kind == MoveKind::EnPassant {
        position.set_en_passant(Ternary::True, mv.to.file());
    } else {
        // Whatever the en passant state was before the retracted move,
        // it cannot be recovered.
        position.set_en_passant(Ternary::Unknown, 0);
    }
}

fn update_counters(position: &mut Position, mv: &Move) {
    position.set_turn(mv.player);
    if position.half_move_log() {
        if position.half_moves() == 0 {
            // Retracting past the reset; the previous value is lost.
            position.set_half_moves(false, 0);
        } else {
            position.decrement_half_moves();
        }
    }
    if position.full_move_log() && mv.player == Player::Black {
        position.decrement_full_moves();
    }
}

/// Un-applies the move: the inverse of
/// [`crate::chess::advance::advance`] up to the documented widening of
/// the auxiliary state.
pub fn retract(position: &mut Position, mv: &Move) {
    update_pieces(position, mv);
    update_castling(position, mv);
    update_en_passant(position, mv);
    update_counters(position, mv);
}
