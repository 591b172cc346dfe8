//! Zero handling before log ratios.

pub mod pseudocount;

pub use pseudocount::{add_pseudocount, check_pseudocount, NAMED_PSEUDOCOUNT, PAIRWISE_PSEUDOCOUNT};
