//! Analysis module for derived views of a series
//!
//! This module provides pure functions over sample runs:
//! - Inclusive date-range filtering
//! - Count / total / average / min / max aggregation

pub mod range;
pub mod stats;

pub use range::filter;
pub use stats::{aggregate, StatsAccumulator};
