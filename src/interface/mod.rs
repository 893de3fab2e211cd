//! The user-facing surface: argument parsing, record input and result
//! rendering.

pub mod cli;
