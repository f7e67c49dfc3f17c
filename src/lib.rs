//! FARECAST — multi-strategy airfare analysis and savings engine.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod airports;
pub mod config;
pub mod engine;
pub mod estimators;
pub mod links;
pub mod report;
pub mod types;
