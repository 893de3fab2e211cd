//! The chess domain core: board state with three-valued auxiliary
//! information, the mutually inverse forward and retrograde move
//! processors, and the legality machinery the search prunes with.

pub mod advance;
pub mod attacks;
pub mod core;
pub mod matchers;
pub mod moves;
pub mod position;
pub mod retract;
pub mod san;
pub mod validate;
