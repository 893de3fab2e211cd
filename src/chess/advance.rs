//! Forward move processing: pseudo-legal enumeration, application, and
//! the legality filter on top of them.

use crate::chess::attacks;
use crate::chess::core::{CastlingSide, Piece, PieceKind, Player, Square, Ternary};
use crate::chess::moves::{Move, MoveKind, MoveList};
use crate::chess::position::Position;

fn construct(piece: &Piece, kind: MoveKind, to: Square) -> Move {
    Move {
        piece: piece.kind,
        player: piece.player,
        from: piece.square,
        to,
        kind,
    }
}

/// A quiet move or a capture, depending on what stands on `to`.
fn construct_landing(position: &Position, piece: &Piece, to: Square) -> Move {
    let kind = match position.piece_on(to) {
        Some(target) => MoveKind::Capture {
            captured: target.kind,
        },
        None => MoveKind::Simple,
    };
    construct(piece, kind, to)
}

fn enumerate_king_moves(position: &Position, piece: &Piece, moves: &mut MoveList) {
    for file_delta in -1..=1 {
        for rank_delta in -1..=1 {
            if file_delta == 0 && rank_delta == 0 {
                continue;
            }
            let Some(square) = piece.square.shift(file_delta, rank_delta) else {
                continue;
            };
            if position
                .piece_on(square)
                .map_or(true, |target| target.player != piece.player)
            {
                moves.push(construct_landing(position, piece, square));
            }
        }
    }
    // A non-False castling indicator implies the king and rook stand on
    // their initial squares. The landing square's safety is left to the
    // general legality filter.
    if position.castling(piece.player, CastlingSide::Kingside) != Ternary::False {
        let (one, two) = (piece.square.shift(1, 0), piece.square.shift(2, 0));
        if let (Some(one), Some(two)) = (one, two) {
            if position.is_square_empty(one)
                && position.is_square_empty(two)
                && !attacks::is_under_attack(position, piece.player, piece.square)
                && !attacks::is_under_attack(position, piece.player, one)
            {
                moves.push(construct(
                    piece,
                    MoveKind::Castle(CastlingSide::Kingside),
                    two,
                ));
            }
        }
    }
    if position.castling(piece.player, CastlingSide::Queenside) != Ternary::False {
        let (one, two, three) = (
            piece.square.shift(-1, 0),
            piece.square.shift(-2, 0),
            piece.square.shift(-3, 0),
        );
        if let (Some(one), Some(two), Some(three)) = (one, two, three) {
            if position.is_square_empty(one)
                && position.is_square_empty(two)
                && position.is_square_empty(three)
                && !attacks::is_under_attack(position, piece.player, piece.square)
                && !attacks::is_under_attack(position, piece.player, one)
            {
                moves.push(construct(
                    piece,
                    MoveKind::Castle(CastlingSide::Queenside),
                    two,
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
    moves: &mut MoveList,
) {
    let mut square = piece.square;
    while let Some(next) = square.shift(file_direction, rank_direction) {
        match position.piece_on(next) {
            Some(target) => {
                if target.player != piece.player {
                    moves.push(construct(
                        piece,
                        MoveKind::Capture {
                            captured: target.kind,
                        },
                        next,
                    ));
                }
                return;
            }
            None => moves.push(construct(piece, MoveKind::Simple, next)),
        }
        square = next;
    }
}

fn enumerate_rook_like_moves(position: &Position, piece: &Piece, moves: &mut MoveList) {
    for (file_direction, rank_direction) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        enumerate_linear_moves(position, piece, file_direction, rank_direction, moves);
    }
}

fn enumerate_bishop_like_moves(position: &Position, piece: &Piece, moves: &mut MoveList) {
    for (file_direction, rank_direction) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        enumerate_linear_moves(position, piece, file_direction, rank_direction, moves);
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

fn enumerate_knight_moves(position: &Position, piece: &Piece, moves: &mut MoveList) {
    for (file_delta, rank_delta) in KNIGHT_DELTAS {
        let Some(square) = piece.square.shift(file_delta, rank_delta) else {
            continue;
        };
        if position
            .piece_on(square)
            .map_or(true, |target| target.player != piece.player)
        {
            moves.push(construct_landing(position, piece, square));
        }
    }
}

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

fn enumerate_promotions(
    piece: &Piece,
    to: Square,
    captured: Option<PieceKind>,
    moves: &mut MoveList,
) {
    for promoted in PROMOTION_KINDS {
        let kind = match captured {
            Some(captured) => MoveKind::PromotionCapture { captured, promoted },
            None => MoveKind::Promotion { promoted },
        };
        moves.push(construct(piece, kind, to));
    }
}

fn enumerate_pawn_moves(position: &Position, piece: &Piece, moves: &mut MoveList) {
    let en_passant = position.en_passant();
    let en_passant_file = position.en_passant_file();
    let initial_rank = piece.player.pawn_rank();
    let en_passant_rank = match piece.player {
        Player::White => 4,
        Player::Black => 3,
    };
    let last_rank = (!piece.player).backrank();
    let direction = piece.player.pawn_direction();

    if let Some(square) = piece.square.shift(0, direction) {
        if position.is_square_empty(square) {
            if square.rank() == last_rank {
                enumerate_promotions(piece, square, None, moves);
            } else {
                moves.push(construct(piece, MoveKind::Simple, square));
                if piece.square.rank() == initial_rank {
                    if let Some(forward) = square.shift(0, direction) {
                        if position.is_square_empty(forward) {
                            moves.push(construct(piece, MoveKind::Simple, forward));
                        }
                    }
                }
            }
        }
    }

    for file_delta in [-1, 1] {
        let Some(square) = piece.square.shift(file_delta, direction) else {
            continue;
        };
        match position.piece_on(square) {
            Some(target) => {
                if target.player != piece.player {
                    if square.rank() == last_rank {
                        enumerate_promotions(piece, square, Some(target.kind), moves);
                    } else {
                        moves.push(construct(
                            piece,
                            MoveKind::Capture {
                                captured: target.kind,
                            },
                            square,
                        ));
                    }
                }
            }
            None if piece.square.rank() == en_passant_rank => {
                // With an unknown en-passant state the capture is
                // admissible whenever the board shows the double-push
                // configuration.
                let declared = en_passant == Ternary::True && en_passant_file == square.file();
                let plausible = en_passant == Ternary::Unknown
                    && square.shift(0, -direction).is_some_and(|victim| {
                        position.is_piece_on(victim, !piece.player, PieceKind::Pawn)
                    })
                    && square
                        .shift(0, direction)
                        .is_some_and(|behind| position.is_square_empty(behind));
                if declared || plausible {
                    moves.push(construct(piece, MoveKind::EnPassant, square));
                }
            }
            None => {}
        }
    }
}

/// Fills `moves` with all pseudo-legal moves for the side to move.
/// Own-king safety is not checked here; see [`legal_moves`].
#[must_use]
pub fn enumerate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    for piece in position.pieces(position.turn()) {
        match piece.kind {
            PieceKind::King => enumerate_king_moves(position, piece, &mut moves),
            PieceKind::Queen => {
                enumerate_rook_like_moves(position, piece, &mut moves);
                enumerate_bishop_like_moves(position, piece, &mut moves);
            }
            PieceKind::Rook => enumerate_rook_like_moves(position, piece, &mut moves),
            PieceKind::Bishop => enumerate_bishop_like_moves(position, piece, &mut moves),
            PieceKind::Knight => enumerate_knight_moves(position, piece, &mut moves),
            PieceKind::Pawn => enumerate_pawn_moves(position, piece, &mut moves),
        }
    }
    moves
}

fn update_pieces(position: &mut Position, mv: &Move) {
    match mv.kind {
        MoveKind::Simple => position.move_piece(mv.from, mv.to),
        MoveKind::Promotion { promoted } => {
            position.remove_piece(mv.from);
            position.add_piece(mv.to, promoted, mv.player);
        }
        MoveKind::Capture { .. } => {
            position.remove_piece(mv.to);
            position.move_piece(mv.from, mv.to);
        }
        MoveKind::PromotionCapture { promoted, .. } => {
            position.remove_piece(mv.to);
            position.remove_piece(mv.from);
            position.add_piece(mv.to, promoted, mv.player);
        }
        MoveKind::EnPassant => {
            let victim_rank = match mv.player {
                Player::White => 4,
                Player::Black => 3,
            };
            position.remove_piece(Square::new(mv.to.file(), victim_rank));
            position.move_piece(mv.from, mv.to);
        }
        MoveKind::Castle(side) => {
            let rank = mv.player.backrank();
            let (rook_from, rook_to) = match side {
                CastlingSide::Kingside => (Square::new(7, rank), Square::new(5, rank)),
                CastlingSide::Queenside => (Square::new(0, rank), Square::new(3, rank)),
            };
            position.move_piece(mv.from, mv.to);
            position.move_piece(rook_from, rook_to);
        }
    }
}

/// Castling rights are re-derived from board geometry after every move:
/// a right whose king or rook has left its initial square becomes
/// False, an intact one keeps its previous value.
fn update_castling(position: &mut Position) {
    use strum::IntoEnumIterator;

    for player in Player::iter() {
        for side in CastlingSide::iter() {
            if !attacks::is_in_castling_position(position, player, side, None) {
                position.set_castling(player, side, Ternary::False);
            }
        }
    }
}

fn update_en_passant(position: &mut Position, mv: &Move) {
    if mv.piece == PieceKind::Pawn && (mv.from.rank() - mv.to.rank()).abs() == 2 {
        position.set_en_passant(Ternary::True, mv.from.file());
    } else {
        position.set_en_passant(Ternary::False, 0);
    }
}

fn update_counters(position: &mut Position, mv: &Move) {
    position.set_turn(!mv.player);
    if position.half_move_log() {
        if mv.piece == PieceKind::Pawn || matches!(mv.kind, MoveKind::Capture { .. }) {
            position.set_half_moves(true, 0);
        } else {
            position.increment_half_moves();
        }
    }
    if position.full_move_log() && mv.player == Player::Black {
        position.increment_full_moves();
    }
}

/// Applies the move, maintaining the auxiliary state and counters.
pub fn advance(position: &mut Position, mv: &Move) {
    update_pieces(position, mv);
    update_castling(position);
    update_en_passant(position, mv);
    update_counters(position, mv);
}

/// Pseudo-legal moves filtered by own-king safety. With `return_first`
/// the enumeration stops at the first legal move (mate detection needs
/// nothing more).
#[must_use]
pub fn legal_moves(position: &Position, return_first: bool) -> MoveList {
    let mut moves = MoveList::new();
    for mv in enumerate_moves(position) {
        let mut next = position.clone();
        advance(&mut next, &mv);
        if !attacks::is_in_check(&next, position.turn()) {
            moves.push(mv);
            if return_first {
                return moves;
            }
        }
    }
    moves
}
