//! Command-line entry point: reads one extended-FEN record from
//! standard input, runs the configured search, renders every emitted
//! sequence to standard output and, when asked, progress to standard
//! error.

use std::io::{self, BufRead};

use anyhow::{bail, Context};
use clap::Parser;
use itertools::Itertools;

use crate::chess::advance;
use crate::chess::attacks;
use crate::chess::core::Player;
use crate::chess::moves::Move;
use crate::chess::position::Position;
use crate::chess::validate;
use crate::search::backtrack::Backtracker;
use crate::search::meet::MeeterInTheMiddle;
use crate::search::progress::{ProgressFrame, ProgressReporter};

/// Retrograde chess analyzer: enumerates the move sequences that could
/// have led to the given position from the starting array.
#[derive(Parser, Debug)]
#[command(name = "chass")]
struct Args {
    /// Depth to which all retrograde continuations are enumerated.
    #[arg(short = 'd', value_name = "DEPTH")]
    full_examination_depth: Option<u32>,

    /// Extra depth to which a single witness line is continued, proving
    /// that the enumerated sequences extend to a possible game start.
    #[arg(short = 'e', value_name = "DEPTH")]
    proof_extra_depth: Option<u32>,

    /// Report progress to the standard error stream.
    #[arg(short = 'r')]
    show_progress: bool,
}

/// Renders one discovered sequence: the deep position's placement, the
/// replayed moves in `<fullmove>. <white> <black>` lines (Black-only
/// continuations as `<fullmove>. -`), the intermediate placement at the
/// examined-depth boundary, and the `-----` terminator.
fn render_sequence(position: &Position, moves: &[Move], full_examination_depth: usize) -> String {
    let mut out = position.to_fen_placement(false);
    let total_depth = moves.len();
    if total_depth > 0 {
        // With unlogged counters, number the moves so that the input
        // position's move reads as 0.
        let mut current_move = if position.full_move_log() {
            i32::from(position.full_moves())
        } else {
            -(total_depth as i32 + i32::from(moves[0].player == Player::Black)) / 2
        };
        let mut current = position.clone();
        let mut line_break = true;
        for depth in (0..total_depth).rev() {
            let mv = &moves[depth];
            if line_break {
                out.push_str(&format!("\n{current_move}."));
                if mv.player == Player::Black {
                    out.push_str(" -");
                }
            }
            advance::advance(&mut current, mv);
            let check = attacks::is_in_check(&current, current.turn());
            let mate = depth == 0 && check && attacks::is_checkmated(&current);
            out.push(' ');
            out.push_str(&mv.to_long_algebraic(check, mate));
            line_break = false;
            if depth == full_examination_depth && depth > 0 {
                out.push('\n');
                out.push_str(&current.to_fen_placement(false));
                line_break = true;
            }
            if mv.player == Player::Black {
                current_move += 1;
                line_break = true;
            }
        }
    }
    out.push_str("\n-----\n");
    out
}

fn print_progress(frames: &[ProgressFrame]) {
    if frames.is_empty() {
        eprintln!("Done.");
    } else if frames.len() == 1 && frames[0].1 == 0 {
        // The "starting" signal, by reporter convention.
        eprintln!("Starting...");
    } else {
        // Frames carry completed steps; show the current step instead.
        eprintln!(
            "{}",
            frames
                .iter()
                .map(|(step, total)| format!("{}/{}", step + 1, total))
                .join(" ")
        );
    }
}

fn read_position() -> anyhow::Result<Position> {
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("could not read the position record")?;
    let mut position = Position::from_fen(input.trim_end_matches(['\n', '\r']))
        .context("FEN parsing failed")?;
    validate::validate_and_stricten(&mut position).context("the position is not valid")?;
    Ok(position)
}

/// Runs the tool: any returned error is an argument or input problem
/// and maps to exit code 1.
pub fn run() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            err.print().context("could not print help")?;
            return Ok(());
        }
        Err(err) => bail!("{err}"),
    };
    if args.full_examination_depth.is_none() && args.proof_extra_depth.is_none() {
        bail!("at least one depth parameter must be specified");
    }
    let full_examination_depth = args.full_examination_depth.unwrap_or(0) as usize;
    let proof_extra_depth = args.proof_extra_depth.unwrap_or(0) as usize;

    let position = read_position()?;

    let mut reporter = ProgressReporter::new(if args.show_progress {
        Some(Box::new(|frames: &[ProgressFrame]| print_progress(frames)))
    } else {
        None
    });
    let emit = |deep: &Position, moves: &[Move], depth: usize| {
        print!("{}", render_sequence(deep, moves, depth));
    };

    // The bidirectional driver applies exactly when the whole history
    // back to move one is requested without a proof tail: `-e 0`,
    // `-d` past a single ply, and a logged ply counter one beyond it.
    if proof_extra_depth == 0
        && full_examination_depth > 1
        && position.full_move_log()
        && position.ply_counter() == Some(full_examination_depth as u32 + 1)
    {
        MeeterInTheMiddle::new(emit, &mut reporter).search(&position, full_examination_depth);
    } else {
        Backtracker::new(emit, &mut reporter).search(
            &position,
            full_examination_depth,
            full_examination_depth + proof_extra_depth,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{PieceKind, Square};
    use crate::chess::moves::MoveKind;

    #[test]
    fn renders_a_bare_position() {
        let rendered = render_sequence(&Position::starting(), &[], 0);
        assert_eq!(
            rendered,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR\n-----\n"
        );
    }

    #[test]
    fn renders_a_single_white_move() {
        let push = Move {
            piece: PieceKind::Pawn,
            player: Player::White,
            from: Square::new(4, 1),
            to: Square::new(4, 3),
            kind: MoveKind::Simple,
        };
        let rendered = render_sequence(&Position::starting(), &[push], 1);
        assert_eq!(
            rendered,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR\n1. Pe2-e4\n-----\n"
        );
    }

    #[test]
    fn numbers_unlogged_sequences_relative_to_the_input() {
        // Two plies behind an unlogged mid-game position: the replay
        // starts at move -1 so that the input position's move is 0.
        let deep = Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 b ? ?").unwrap();
        let black = Move {
            piece: PieceKind::King,
            player: Player::Black,
            from: Square::new(4, 7),
            to: Square::new(3, 7),
            kind: MoveKind::Simple,
        };
        let white = Move {
            piece: PieceKind::Rook,
            player: Player::White,
            from: Square::new(4, 1),
            to: Square::new(0, 1),
            kind: MoveKind::Simple,
        };
        // Stored latest-first: White's reply is moves[0].
        let rendered = render_sequence(&deep, &[white, black], 2);
        assert_eq!(
            rendered,
            "4k3/8/8/8/8/8/4R3/4K3\n-1. - Ke8-d8\n0. Re2-a2\n-----\n"
        );
    }
}
