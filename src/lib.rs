#![forbid(unsafe_code)]

//! Social Engineering Detector (sed): heuristic risk scoring for artifacts
//! that may carry phishing or manipulation attempts.
//!
//! Two engines sit behind one orchestrator:
//! 1. **URL heuristics**: length, credential-harvesting keywords, raw IP hosts
//! 2. **Text strategies**: urgency, authority impersonation and embedded links,
//!    combined additively and normalized to the shared 0-100 result
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use social_eng_detector::prelude::*;
//!
//! let orchestrator = AnalysisOrchestrator::default();
//! let request = ScanRequest::new(ArtifactType::Url, "http://192.168.1.1/login")?;
//! let result = orchestrator.analyze_artifact(&request)?;
//! assert_eq!(result.risk_level, RiskLevel::Malicious);
//! # Ok::<(), SedError>(())
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use social_eng_detector::core::config::Config;
//! use social_eng_detector::scanner::text::SocialEngineeringScanner;
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod scanner;
