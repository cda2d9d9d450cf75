//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use social_eng_detector::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SedError};
pub use crate::core::schema::{ArtifactType, RiskLevel, ScanRequest, ScanResult};

// Scanner
pub use crate::scanner::engine::{AnalysisEngine, Engine, TextAnalysisEngine};
pub use crate::scanner::orchestrator::AnalysisOrchestrator;
pub use crate::scanner::strategies::{
    AuthorityImpersonation, MaliciousLink, Strategy, StrategyVerdict, UrgencyDetection,
};
pub use crate::scanner::text::{SocialEngineeringScanner, TextRiskLevel, TextScanReport};
pub use crate::scanner::url::UrlHeuristicEngine;

// Logger
pub use crate::logger::jsonl::{JsonlConfig, JsonlWriter, LogEntry};
