//! Move records. Each move shape carries exactly the payload its
//! application and retraction need; there are no sentinel fields.

use arrayvec::ArrayVec;

use crate::chess::core::{CastlingSide, PieceKind, Player, Square};

/// Capacity of the forward move list. Pseudo-legal forward mobility of
/// any position passing the piece-count checks stays well below this.
pub const MOVE_LIST_CAPACITY: usize = 400;

/// Forward move buffer. Retrograde enumeration, whose branching is
/// unbounded in comparison, uses a capacity-hinted `Vec` instead.
pub type MoveList = ArrayVec<Move, MOVE_LIST_CAPACITY>;

/// What a move does, beyond relocating the moving piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// A quiet relocation.
    Simple,
    /// A pawn reaching its last rank.
    Promotion {
        #[allow(missing_docs)]
        promoted: PieceKind,
    },
    /// A capture on the target square.
    Capture {
        #[allow(missing_docs)]
        captured: PieceKind,
    },
    /// A pawn capturing into its last rank.
    PromotionCapture {
        #[allow(missing_docs)]
        captured: PieceKind,
        #[allow(missing_docs)]
        promoted: PieceKind,
    },
    /// An en-passant capture; the victim is implied (a pawn one rank
    /// behind the target square).
    EnPassant,
    /// Castling; `from`/`to` are the king's squares, the rook hop is
    /// implied.
    Castle(CastlingSide),
}

/// A single (forward-oriented) move. Retractions are recorded as the
/// forward move they undo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    #[allow(missing_docs)]
    pub piece: PieceKind,
    #[allow(missing_docs)]
    pub player: Player,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
    #[allow(missing_docs)]
    pub kind: MoveKind,
}

impl Move {
    /// The captured piece kind, for the capture-bearing shapes.
    #[must_use]
    pub fn captured(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Capture { captured } | MoveKind::PromotionCapture { captured, .. } => {
                Some(captured)
            }
            MoveKind::EnPassant => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// The promotion target, for the promotion-bearing shapes.
    #[must_use]
    pub fn promoted(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion { promoted } | MoveKind::PromotionCapture { promoted, .. } => {
                Some(promoted)
            }
            _ => None,
        }
    }

    /// Whether the move removes an opposing piece from the board.
    #[must_use]
    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture { .. } | MoveKind::PromotionCapture { .. } | MoveKind::EnPassant
        )
    }

    /// Renders the move in long algebraic notation:
    /// `<letter><from>[x<captured letter>|-]<to>[=<promoted>][e.p.]`,
    /// with `0-0`/`0-0-0` for castling and a `+`/`#` suffix.
    #[must_use]
    pub fn to_long_algebraic(&self, check: bool, mate: bool) -> String {
        let mut result = match self.kind {
            MoveKind::Castle(CastlingSide::Kingside) => "0-0".to_string(),
            MoveKind::Castle(CastlingSide::Queenside) => "0-0-0".to_string(),
            _ => {
                let mut text = String::new();
                text.push(self.piece.letter());
                text.push_str(&self.from.to_string());
                match self.captured() {
                    Some(captured) => {
                        text.push('x');
                        text.push(captured.letter());
                    }
                    None => text.push('-'),
                }
                text.push_str(&self.to.to_string());
                if let Some(promoted) = self.promoted() {
                    text.push('=');
                    text.push(promoted.letter());
                }
                if self.kind == MoveKind::EnPassant {
                    text.push_str("e.p.");
                }
                text
            }
        };
        if mate {
            result.push('#');
        } else if check {
            result.push('+');
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn simple(from: Square, to: Square) -> Move {
        Move {
            piece: PieceKind::Pawn,
            player: Player::White,
            from,
            to,
            kind: MoveKind::Simple,
        }
    }

    #[test]
    fn long_algebraic_simple() {
        let push = simple(Square::new(4, 1), Square::new(4, 3));
        assert_eq!(push.to_long_algebraic(false, false), "Pe2-e4");
        assert_eq!(push.to_long_algebraic(true, false), "Pe2-e4+");
        assert_eq!(push.to_long_algebraic(true, true), "Pe2-e4#");
    }

    #[test]
    fn long_algebraic_capture_and_promotion() {
        let capture = Move {
            piece: PieceKind::Knight,
            player: Player::Black,
            from: Square::new(5, 5),
            to: Square::new(4, 3),
            kind: MoveKind::Capture {
                captured: PieceKind::Pawn,
            },
        };
        assert_eq!(capture.to_long_algebraic(false, false), "Nf6xPe4");

        let promotion = Move {
            piece: PieceKind::Pawn,
            player: Player::White,
            from: Square::new(6, 6),
            to: Square::new(7, 7),
            kind: MoveKind::PromotionCapture {
                captured: PieceKind::Rook,
                promoted: PieceKind::Queen,
            },
        };
        assert_eq!(promotion.to_long_algebraic(false, false), "Pg7xRh8=Q");
    }

    #[test]
    fn long_algebraic_en_passant_and_castling() {
        let en_passant = Move {
            piece: PieceKind::Pawn,
            player: Player::White,
            from: Square::new(4, 4),
            to: Square::new(3, 5),
            kind: MoveKind::EnPassant,
        };
        assert_eq!(en_passant.to_long_algebraic(false, false), "Pe5xPd6e.p.");

        let castle = Move {
            piece: PieceKind::King,
            player: Player::Black,
            from: Square::new(4, 7),
            to: Square::new(2, 7),
            kind: MoveKind::Castle(CastlingSide::Queenside),
        };
        assert_eq!(castle.to_long_algebraic(false, false), "0-0-0");
    }
}
