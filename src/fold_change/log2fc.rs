//! Log2 fold change between two abundance samples.
//!
//! For each row the fold change is `log2((a + eps) / (b + eps))`, where the
//! pseudocount `eps` keeps zero abundances finite. Each comparison adds one
//! `log2FC_<label>` column; sample columns are read but never modified.

use crate::columns::{resolve_comparison, MissingColumnPolicy, SampleColumnConvention};
use crate::data::{AbundanceTable, Comparison};
use crate::error::{Log2fcError, Result};
use crate::zero::{add_pseudocount, check_pseudocount, NAMED_PSEUDOCOUNT};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Settings shared by every comparison on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log2fcOptions {
    /// Added to numerator and denominator before dividing.
    pub pseudocount: f64,
    /// Failure policy for unresolved sample codes.
    pub missing_columns: MissingColumnPolicy,
    /// How sample columns are named.
    pub convention: SampleColumnConvention,
}

impl Default for Log2fcOptions {
    fn default() -> Self {
        Self {
            pseudocount: NAMED_PSEUDOCOUNT,
            missing_columns: MissingColumnPolicy::Immediate,
            convention: SampleColumnConvention::default(),
        }
    }
}

impl Log2fcOptions {
    /// Options with the default convention and immediate failure.
    pub fn with_pseudocount(pseudocount: f64) -> Self {
        Self {
            pseudocount,
            ..Self::default()
        }
    }
}

/// Row-wise `log2((a + eps) / (b + eps))`.
///
/// Missing inputs give `NaN`; a negative ratio (negative abundances) also
/// gives `NaN`.
pub fn log2_fold_change(numerator: &[f64], denominator: &[f64], pseudocount: f64) -> Result<Vec<f64>> {
    if numerator.len() != denominator.len() {
        return Err(Log2fcError::DimensionMismatch {
            expected: numerator.len(),
            actual: denominator.len(),
        });
    }

    let a = add_pseudocount(numerator, pseudocount)?;
    let b = add_pseudocount(denominator, pseudocount)?;

    Ok(a.par_iter()
        .zip(b.par_iter())
        .map(|(a, b)| (a / b).log2())
        .collect())
}

/// Text form of a derived value.
///
/// Missing values become empty cells, infinities `inf`/`-inf`; finite values
/// use the shortest representation that reads back to the same `f64`.
pub fn format_log2fc(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:?}", value)
    }
}

/// Append one `log2FC_<label>` column per comparison, in order.
///
/// A column that already carries the derived name is overwritten in place.
/// Returns the derived column names.
pub fn add_log2fc_columns(
    table: &mut AbundanceTable,
    comparisons: &[Comparison],
    options: &Log2fcOptions,
) -> Result<Vec<String>> {
    let pseudocount = check_pseudocount(options.pseudocount)?;
    let mut derived: Vec<String> = Vec::with_capacity(comparisons.len());

    for comparison in comparisons {
        comparison.validate()?;

        let (col_a, col_b) = resolve_comparison(
            table.column_names(),
            comparison,
            &options.convention,
            options.missing_columns,
        )
        .map(|(a, b)| (a.to_string(), b.to_string()))?;
        debug!("{}: '{}' / '{}'", comparison, col_a, col_b);

        let a = table.numeric_column(&col_a)?;
        let b = table.numeric_column(&col_b)?;
        let values = log2_fold_change(&a, &b, pseudocount)?;

        let name = comparison.column_name();
        table.set_column(&name, values.into_iter().map(format_log2fc).collect())?;
        if !derived.contains(&name) {
            derived.push(name);
        }
    }

    Ok(derived)
}
