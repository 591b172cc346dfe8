//! Pseudocount handling for zero abundances.

use crate::error::{Log2fcError, Result};
use rayon::prelude::*;

/// Pseudocount for gene-family/KO hit tables.
pub const PAIRWISE_PSEUDOCOUNT: f64 = 1e-9;

/// Pseudocount for CPM-normalized gene-family and pathway tables.
pub const NAMED_PSEUDOCOUNT: f64 = 1e-6;

/// Check that a pseudocount is usable in a log ratio.
pub fn check_pseudocount(pseudocount: f64) -> Result<f64> {
    if !pseudocount.is_finite() || pseudocount <= 0.0 {
        return Err(Log2fcError::InvalidParameter(format!(
            "Pseudocount must be positive and finite, got {}",
            pseudocount
        )));
    }
    Ok(pseudocount)
}

/// Add a pseudocount to every value.
///
/// Applied to both sides of a ratio, so a zero abundance gives a finite
/// log instead of a division by zero. Missing values (`NaN`) stay missing.
///
/// # Arguments
/// * `values` - Abundances of one sample
/// * `pseudocount` - Value to add (typically 1e-6 or 1e-9 for these tables)
pub fn add_pseudocount(values: &[f64], pseudocount: f64) -> Result<Vec<f64>> {
    let pseudocount = check_pseudocount(pseudocount)?;
    Ok(values.par_iter().map(|v| v + pseudocount).collect())
}
