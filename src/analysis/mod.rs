//! Score fusion and result aggregation
//!
//! Turns per-family comparisons into the final verdict:
//! - Family and overall scoring
//! - Level classification
//! - Result types
//! - Parallel batch comparison and ranking

pub mod batch;
pub mod result;
pub mod scoring;
