//! Core engine — normalize, aggregate, rank and recommend.

pub mod aggregator;
pub mod normalizer;
pub mod recommend;

pub use aggregator::Analyzer;
