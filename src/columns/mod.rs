//! Locating sample abundance columns.

mod resolve;

pub use resolve::{
    candidate_columns, find_sample_column, resolve_comparison, resolve_sample_column,
    MissingColumnPolicy, SampleColumnConvention,
};
