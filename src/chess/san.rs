//! Short-algebraic move interpretation against a concrete position.
//! Used by the game-replay test harness rather than the search itself.

use anyhow::{anyhow, bail};

use crate::chess::advance;
use crate::chess::core::{CastlingSide, PieceKind, Square};
use crate::chess::moves::{Move, MoveKind};
use crate::chess::position::Position;

fn parse_castling(notation: &str) -> Option<CastlingSide> {
    match notation {
        "0-0" | "O-O" => Some(CastlingSide::Kingside),
        "0-0-0" | "O-O-O" => Some(CastlingSide::Queenside),
        _ => None,
    }
}

struct Token {
    castling: Option<CastlingSide>,
    piece: PieceKind,
    promoted: Option<PieceKind>,
    capture: bool,
    target_file: i8,
    target_rank: i8,
    from_file: Option<i8>,
    from_rank: Option<i8>,
}

fn parse_token(notation: &str) -> anyhow::Result<(Token, bool, bool)> {
    let mut left: Vec<char> = notation.chars().collect();
    let mut check = false;
    let mut mate = false;
    match left.last() {
        Some('+') => {
            left.pop();
            check = true;
        }
        Some('#') => {
            left.pop();
            mate = true;
        }
        _ => {}
    }
    let stripped: String = left.iter().collect();

    if let Some(side) = parse_castling(&stripped) {
        return Ok((
            Token {
                castling: Some(side),
                piece: PieceKind::King,
                promoted: None,
                capture: false,
                target_file: -1,
                target_rank: -1,
                from_file: None,
                from_rank: None,
            },
            check,
            mate,
        ));
    }

    let mut promoted = None;
    if left.len() >= 2 && left[left.len() - 2] == '=' {
        let letter = left.pop().unwrap_or_default();
        left.pop();
        promoted = Some(
            PieceKind::from_letter(letter)
                .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?,
        );
    }

    if left.len() < 2 {
        bail!("unexpectedly short notation: {notation}");
    }

    let target_rank = Square::rank_from_char(left.pop().unwrap_or_default())
        .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?;
    let target_file = Square::file_from_char(left.pop().unwrap_or_default())
        .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?;

    let capture = left.last() == Some(&'x');
    if capture {
        left.pop();
    }

    let (piece, from_file, from_rank) = match left.len() {
        0 => (PieceKind::Pawn, None, None),
        1 if Square::is_file_char(left[0]) => {
            (PieceKind::Pawn, Some(Square::file_from_char(left[0])?), None)
        }
        1 => (
            PieceKind::from_letter(left[0])
                .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?,
            None,
            None,
        ),
        2 => {
            let piece = PieceKind::from_letter(left[0])
                .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?;
            if Square::is_file_char(left[1]) {
                (piece, Some(Square::file_from_char(left[1])?), None)
            } else if Square::is_rank_char(left[1]) {
                (piece, None, Some(Square::rank_from_char(left[1])?))
            } else {
                bail!("unrecognized disambiguation in '{notation}': '{}'", left[1]);
            }
        }
        3 => {
            let piece = PieceKind::from_letter(left[0])
                .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?;
            (
                piece,
                Some(
                    Square::file_from_char(left[1])
                        .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?,
                ),
                Some(
                    Square::rank_from_char(left[2])
                        .map_err(|err| anyhow!("cannot interpret '{notation}': {err}"))?,
                ),
            )
        }
        _ => bail!("cannot parse prefix of '{notation}'"),
    };

    Ok((
        Token {
            castling: None,
            piece,
            promoted,
            capture,
            target_file,
            target_rank,
            from_file,
            from_rank,
        },
        check,
        mate,
    ))
}

fn matches(token: &Token, mv: &Move) -> bool {
    if let Some(side) = token.castling {
        return mv.kind == MoveKind::Castle(side);
    }
    if matches!(mv.kind, MoveKind::Castle(_))
        || mv.piece != token.piece
        || mv.to.file() != token.target_file
        || mv.to.rank() != token.target_rank
        || token.from_file.is_some_and(|file| mv.from.file() != file)
        || token.from_rank.is_some_and(|rank| mv.from.rank() != rank)
    {
        return false;
    }
    if token.piece == PieceKind::Pawn {
        return match token.promoted {
            Some(promoted) => {
                let shape_matches = if token.capture {
                    matches!(mv.kind, MoveKind::PromotionCapture { .. })
                } else {
                    matches!(mv.kind, MoveKind::Promotion { .. })
                };
                shape_matches && mv.promoted() == Some(promoted)
            }
            None => {
                if mv.promoted().is_some() {
                    false
                } else if token.capture {
                    matches!(mv.kind, MoveKind::Capture { .. } | MoveKind::EnPassant)
                } else {
                    mv.kind == MoveKind::Simple
                }
            }
        };
    }
    // A non-pawn token matches exactly when its capture flag agrees
    // with the move shape.
    token.capture == matches!(mv.kind, MoveKind::Capture { .. })
}

/// Resolves a short-algebraic token against the position's legal moves.
/// Returns the move with the parsed check/mate markers.
pub fn interpret(notation: &str, position: &Position) -> anyhow::Result<(Move, bool, bool)> {
    let (token, check, mate) = parse_token(notation)?;
    let legal = advance::legal_moves(position, false);
    let mut found: Option<Move> = None;
    for mv in legal {
        if !matches(&token, &mv) {
            continue;
        }
        if let Some(previous) = found {
            bail!(
                "ambiguous move '{notation}': could be either {} or {}",
                mv.to_long_algebraic(check, mate),
                previous.to_long_algebraic(check, mate)
            );
        }
        found = Some(mv);
    }
    found
        .map(|mv| (mv, check, mate))
        .ok_or_else(|| anyhow!("cannot match '{notation}' against the available moves"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Player;

    fn from_fen(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn interprets_simple_and_capture_tokens() {
        let position = Position::starting();
        let (mv, check, mate) = interpret("e4", &position).unwrap();
        assert_eq!(mv.from, Square::new(4, 1));
        assert_eq!(mv.to, Square::new(4, 3));
        assert!(!check && !mate);

        let position = from_fen("rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 2");
        let (mv, _, _) = interpret("dxe5", &position).unwrap();
        assert_eq!(mv.kind, MoveKind::Capture { captured: PieceKind::Pawn });
        assert_eq!(mv.from, Square::new(3, 3));
    }

    #[test]
    fn captureless_tokens_do_not_match_captures() {
        let position = from_fen("4k3/8/8/3p4/8/8/8/R3K3 w - - 0 40");
        // Ra3 is quiet; Rxa3 does not exist, and the quiet token must
        // not resolve to a capture elsewhere.
        let (mv, _, _) = interpret("Ra3", &position).unwrap();
        assert_eq!(mv.kind, MoveKind::Simple);
        assert!(interpret("Rxa3", &position).is_err());
    }

    #[test]
    fn disambiguation_by_file_and_rank() {
        let position = from_fen("4k3/8/8/8/8/4K3/8/R5R1 w - - 0 40");
        let (mv, _, _) = interpret("Rad1", &position).unwrap();
        assert_eq!(mv.from, Square::new(0, 0));
        let (mv, _, _) = interpret("Rgd1", &position).unwrap();
        assert_eq!(mv.from, Square::new(6, 0));
        assert!(interpret("Rd1", &position).is_err());
    }

    #[test]
    fn promotion_and_castling_tokens() {
        let position = from_fen("3r4/4P3/8/8/8/8/8/k3K3 w - - 0 40");
        let (mv, _, _) = interpret("e8=Q", &position).unwrap();
        assert_eq!(mv.kind, MoveKind::Promotion { promoted: PieceKind::Queen });
        let (mv, _, _) = interpret("exd8=N+", &position).unwrap();
        assert_eq!(
            mv.kind,
            MoveKind::PromotionCapture {
                captured: PieceKind::Rook,
                promoted: PieceKind::Knight
            }
        );

        let position = from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 40");
        let (mv, _, _) = interpret("0-0", &position).unwrap();
        assert_eq!(mv.kind, MoveKind::Castle(CastlingSide::Kingside));
        assert_eq!(mv.player, Player::White);
    }

    #[test]
    fn en_passant_resolves_from_a_pawn_capture_token() {
        let position = from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 40");
        let (mv, _, _) = interpret("exd6", &position).unwrap();
        assert_eq!(mv.kind, MoveKind::EnPassant);
    }

    #[test]
    fn unmatchable_tokens_error() {
        let position = Position::starting();
        assert!(interpret("e5", &position).is_err());
        assert!(interpret("Qd4", &position).is_err());
        assert!(interpret("xx", &position).is_err());
        assert!(interpret("e", &position).is_err());
    }
}
