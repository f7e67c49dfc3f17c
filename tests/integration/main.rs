//! Integration tests for the full analysis pipeline.

mod mock_estimator;
mod pipeline;
