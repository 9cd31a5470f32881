//! AI provider adapters.
//!
//! The production completion provider lives outside this service; this
//! module only carries the scripted analyzer used by tests and local runs.

mod mock_analyzer;

pub use mock_analyzer::MockAnalyzer;
