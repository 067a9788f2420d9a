// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod assets;
pub mod cli;
pub mod config;
pub mod domain_utils;
pub mod input;
pub mod orchestrator;
pub mod renderer;
pub mod result_sink;
pub mod selector;

pub use orchestrator::RunSummary;
pub use result_sink::{ResultRow, ResultSink};
pub use selector::Selection;
