//! Core types: errors, configuration, request/response schema.

pub mod config;
pub mod errors;
pub mod schema;
