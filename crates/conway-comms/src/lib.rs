//! Co-authorship analysis: who needs to talk to whom.
//!
//! Folds a parsed change log into per-entity author efforts, counts how many
//! entities every pair of authors shares, and normalizes those counts against
//! each author's total revision volume. The resulting communication strength
//! approximates the coordination a codebase demands of its contributors
//! (Conway's law).

pub mod communication;
pub mod effort;
pub mod pairs;
