//! Sample column lookup by naming convention.

use crate::data::Comparison;
use crate::error::{Log2fcError, Result};
use serde::{Deserialize, Serialize};

/// Naming convention for per-sample abundance columns.
///
/// A sample's column is `<code><stem><suffix>`, with exact names tried in
/// `preferred_suffixes` order before falling back to a prefix match on
/// `<code><stem>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleColumnConvention {
    /// Text between the sample code and any unit suffix.
    pub stem: String,
    /// Exact suffixes tried in order, e.g. `-RPKs` for gene-family tables.
    pub preferred_suffixes: Vec<String>,
}

impl Default for SampleColumnConvention {
    fn default() -> Self {
        Self {
            stem: "_combined_Abundance".to_string(),
            preferred_suffixes: vec!["-RPKs".to_string(), String::new()],
        }
    }
}

impl SampleColumnConvention {
    /// Prefix every column of this sample starts with.
    pub fn prefix(&self, code: &str) -> String {
        format!("{}{}", code, self.stem)
    }

    /// Exact column names for this sample, in preference order.
    pub fn canonical_names(&self, code: &str) -> Vec<String> {
        let prefix = self.prefix(code);
        self.preferred_suffixes
            .iter()
            .map(|suffix| format!("{}{}", prefix, suffix))
            .collect()
    }

    /// Whether a column looks like a sample abundance column at all.
    pub fn is_sample_column(&self, column: &str) -> bool {
        column.contains(&self.stem)
    }
}

/// What to report when a sample code has no column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumnPolicy {
    /// Fail on the first unresolved code.
    #[default]
    Immediate,
    /// Resolve both codes of the comparison, then fail listing the
    /// sample columns that do exist.
    ListCandidates,
}

/// Find the column for a sample code.
///
/// Exact canonical names win; otherwise the first column (in table order)
/// starting with `<code><stem>` is returned.
pub fn find_sample_column<'a>(
    columns: &'a [String],
    code: &str,
    convention: &SampleColumnConvention,
) -> Option<&'a str> {
    for candidate in convention.canonical_names(code) {
        if let Some(found) = columns.iter().find(|c| **c == candidate) {
            return Some(found.as_str());
        }
    }

    let prefix = convention.prefix(code);
    columns
        .iter()
        .find(|c| c.starts_with(&prefix))
        .map(String::as_str)
}

/// Find the column for a sample code or fail naming the code.
pub fn resolve_sample_column<'a>(
    columns: &'a [String],
    code: &str,
    convention: &SampleColumnConvention,
) -> Result<&'a str> {
    find_sample_column(columns, code, convention)
        .ok_or_else(|| Log2fcError::MissingSampleColumn(code.to_string()))
}

/// Columns that look like sample abundance columns, in table order.
pub fn candidate_columns<'a>(
    columns: &'a [String],
    convention: &SampleColumnConvention,
) -> Vec<&'a str> {
    columns
        .iter()
        .filter(|c| convention.is_sample_column(c))
        .map(String::as_str)
        .collect()
}

/// Resolve the numerator and denominator columns of a comparison.
pub fn resolve_comparison<'a>(
    columns: &'a [String],
    comparison: &Comparison,
    convention: &SampleColumnConvention,
    policy: MissingColumnPolicy,
) -> Result<(&'a str, &'a str)> {
    match policy {
        MissingColumnPolicy::Immediate => {
            let numerator = resolve_sample_column(columns, &comparison.numerator, convention)?;
            let denominator = resolve_sample_column(columns, &comparison.denominator, convention)?;
            Ok((numerator, denominator))
        }
        MissingColumnPolicy::ListCandidates => {
            let numerator = find_sample_column(columns, &comparison.numerator, convention);
            let denominator = find_sample_column(columns, &comparison.denominator, convention);
            match (numerator, denominator) {
                (Some(a), Some(b)) => Ok((a, b)),
                _ => {
                    let mut missing = Vec::new();
                    if numerator.is_none() {
                        missing.push(comparison.numerator.as_str());
                    }
                    if denominator.is_none() {
                        missing.push(comparison.denominator.as_str());
                    }
                    Err(Log2fcError::MissingSampleColumns {
                        samples: missing.join(" and "),
                        candidates: candidate_columns(columns, convention).join(", "),
                    })
                }
            }
        }
    }
}
