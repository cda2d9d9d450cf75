//! Artifact scanning: text strategies and aggregation, URL heuristics, engine routing.

pub mod engine;
pub mod keywords;
pub mod orchestrator;
pub mod strategies;
pub mod text;
pub mod url;

#[cfg(test)]
mod test_properties;
