//! Search drivers over the retrograde move space.
//!
//! Both drivers emit every discovered sequence through an output
//! callback and report progress through a wall-clock-throttled
//! reporter; there is no other externally observable effect. Execution
//! is single-threaded and runs to completion.

pub mod backtrack;
pub mod chain;
pub mod meet;
pub mod progress;

use crate::chess::moves::Move;
use crate::chess::position::Position;

/// Output callback: receives the deep position a sequence starts from,
/// the moves leading back to the searched position (latest first), and
/// the full-examination depth the run was configured with.
pub trait EmitSequence: FnMut(&Position, &[Move], usize) {}

impl<F: FnMut(&Position, &[Move], usize)> EmitSequence for F {}
