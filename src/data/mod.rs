//! Data structures for fold-change analysis.

mod comparison;
mod table;

pub use comparison::{Comparison, LOG2FC_PREFIX};
pub use table::{normalize_id_header, AbundanceTable};
