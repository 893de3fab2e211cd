//! End-to-end runs of the `chass` binary.

use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "chass";

const STARTING_RECORD: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn chass() -> Command {
    Command::cargo_bin(BINARY_NAME).expect("binary should be built")
}

#[test]
fn depth_zero_echoes_the_starting_position() {
    chass()
        .args(["-d", "0"])
        .write_stdin(format!("{STARTING_RECORD}\n"))
        .assert()
        .success()
        .stdout("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR\n-----\n");
}

#[test]
fn single_retraction_is_reported_in_long_algebraic() {
    chass()
        .args(["-d", "1"])
        .write_stdin("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1\n")
        .assert()
        .success()
        .stdout("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR\n1. Pe2-e4\n-----\n");
}

#[test]
fn bidirectional_search_reconstructs_the_opening() {
    chass()
        .args(["-d", "2"])
        .write_stdin("rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR w KQkq d6 0 2\n")
        .assert()
        .success()
        .stdout(contains("1. Pd2-d4 Pd7-d5").and(contains("-----")));
}

#[test]
fn progress_is_reported_on_request() {
    chass()
        .args(["-d", "0", "-r"])
        .write_stdin(format!("{STARTING_RECORD}\n"))
        .assert()
        .success()
        .stderr(contains("Starting...").and(contains("Done.")));
}

#[test]
fn missing_depth_arguments_fail() {
    chass()
        .write_stdin(format!("{STARTING_RECORD}\n"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("depth"));
}

#[test]
fn malformed_records_fail() {
    chass()
        .args(["-d", "1"])
        .write_stdin("rnbqkbnr/pppppppp/8/8\n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("FEN parsing failed"));
}

#[test]
fn illegal_positions_fail() {
    chass()
        .args(["-d", "1"])
        .write_stdin("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w KQkq - 0 1\n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("not valid"));
}

#[test]
fn negative_depths_are_rejected() {
    chass()
        .args(["-d", "-3"])
        .write_stdin(format!("{STARTING_RECORD}\n"))
        .assert()
        .failure()
        .code(1);
}
