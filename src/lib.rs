//! Retrograde chess analyzer: given a position and a depth budget,
//! enumerates the sequences of past moves that could have led to it
//! from the standard starting array, optionally proving uniqueness
//! with extra witness depth.
//!
//! The crate splits into:
//!
//! - [`chess`]: the domain core. A [`chess::position::Position`] keeps
//!   piece lists in bijection with an 8×8 square index and carries
//!   three-valued auxiliary state (castling rights, en passant and the
//!   move counters may each be *unknown*). The forward processor
//!   ([`chess::advance`]) and the retrograde processor
//!   ([`chess::retract`]) are mutually inverse under the documented
//!   widening rules, and [`chess::validate`] prunes positions that
//!   cannot have evolved from any legal start.
//! - [`search`]: the drivers. The depth-first
//!   [`search::backtrack::Backtracker`] retracts exhaustively, the
//!   bidirectional [`search::meet::MeeterInTheMiddle`] grows frontiers
//!   from both ends and joins them on placement.
//! - [`cli`]: the `chass` binary surface.

#![warn(missing_docs, variant_size_differences)]
#![warn(
    absolute_paths_not_starting_with_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity
)]

pub mod chess;
pub mod search;

mod interface;
pub use interface::cli;
