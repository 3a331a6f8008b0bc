//! Static, hand-authored tables shared across the pipeline.

pub mod statistic_metadata;
