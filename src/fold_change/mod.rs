//! Fold-change computation between sample pairs.

mod log2fc;

pub use log2fc::{add_log2fc_columns, format_log2fc, log2_fold_change, Log2fcOptions};
