// Rubric: interview answer scoring
//
// This is the library root. The scoring pipeline is text -> features ->
// scoring; everything else is configuration and CLI glue around it.

pub mod config;
pub mod embedding;
pub mod error;
pub mod features;
pub mod output;
pub mod questions;
pub mod scoring;
pub mod status;
pub mod text;
