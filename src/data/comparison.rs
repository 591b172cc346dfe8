//! Sample-pair comparisons.

use crate::error::{Log2fcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of every derived fold-change column.
pub const LOG2FC_PREFIX: &str = "log2FC_";

/// A numerator/denominator pair of sample codes.
///
/// The label defaults to `<numerator>_vs_<denominator>` and can be
/// overridden with an explicit name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Optional label used in place of `<numerator>_vs_<denominator>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sample code of the numerator (A).
    pub numerator: String,
    /// Sample code of the denominator (B).
    pub denominator: String,
}

impl Comparison {
    /// Unnamed comparison `numerator` vs `denominator`.
    pub fn new(numerator: &str, denominator: &str) -> Self {
        Self {
            name: None,
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    /// Comparison with an explicit label.
    pub fn named(name: &str, numerator: &str, denominator: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    /// Label used in the derived column name.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}_vs_{}", self.numerator, self.denominator),
        }
    }

    /// Name of the derived column, `log2FC_<label>`.
    pub fn column_name(&self) -> String {
        format!("{}{}", LOG2FC_PREFIX, self.label())
    }

    /// Reject empty sample codes or labels.
    pub fn validate(&self) -> Result<()> {
        if self.numerator.trim().is_empty() || self.denominator.trim().is_empty() {
            return Err(Log2fcError::InvalidParameter(format!(
                "Comparison '{}' has an empty sample code",
                self
            )));
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(Log2fcError::InvalidParameter(
                "Comparison name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.numerator, self.denominator)?;
        if let Some(name) = &self.name {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

/// Parses `A:B` or `A:B:NAME`.
impl FromStr for Comparison {
    type Err = Log2fcError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let comparison = match parts.as_slice() {
            [a, b] => Comparison::new(a, b),
            [a, b, name] => Comparison::named(name, a, b),
            _ => {
                return Err(Log2fcError::InvalidParameter(format!(
                    "Comparison '{}' must look like A:B or A:B:NAME",
                    s
                )))
            }
        };
        comparison.validate()?;
        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label() {
        let cmp = Comparison::new("AA", "B1");
        assert_eq!(cmp.label(), "AA_vs_B1");
        assert_eq!(cmp.column_name(), "log2FC_AA_vs_B1");
    }

    #[test]
    fn test_named_label() {
        let cmp = Comparison::named("E1_vs_AA", "E1", "AA");
        assert_eq!(cmp.column_name(), "log2FC_E1_vs_AA");

        let renamed = Comparison::named("lsf_vs_sdx", "E1", "AA");
        assert_eq!(renamed.column_name(), "log2FC_lsf_vs_sdx");
    }

    #[test]
    fn test_parse() {
        let cmp: Comparison = "AA:B1".parse().unwrap();
        assert_eq!(cmp, Comparison::new("AA", "B1"));

        let cmp: Comparison = "C1:D1:C1_vs_D1".parse().unwrap();
        assert_eq!(cmp, Comparison::named("C1_vs_D1", "C1", "D1"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("AA".parse::<Comparison>().is_err());
        assert!("AA:B1:x:y".parse::<Comparison>().is_err());
        assert!("AA:".parse::<Comparison>().is_err());
        assert!("AA:B1: ".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_yaml_without_name() {
        let cmp: Comparison = serde_yaml::from_str("numerator: AA\ndenominator: D1\n").unwrap();
        assert_eq!(cmp.name, None);
        assert_eq!(cmp.label(), "AA_vs_D1");
    }
}
