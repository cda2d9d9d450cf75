//! Analysis engines: one per artifact type, selected by the orchestrator.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::core::schema::{ArtifactType, RiskLevel, ScanRequest, ScanResult};
use crate::scanner::text::{SocialEngineeringScanner, TextRiskLevel, TextScanReport};
use crate::scanner::url::UrlHeuristicEngine;

/// Capability shared by every engine. Implementations are stateless between
/// calls and may be shared across threads.
pub trait AnalysisEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// The single artifact type this engine handles.
    fn artifact_type(&self) -> ArtifactType;

    fn supports(&self, artifact_type: ArtifactType) -> bool {
        self.artifact_type() == artifact_type
    }

    /// Score the request content. Callers route only supported requests.
    fn scan(&self, request: &ScanRequest) -> ScanResult;
}

impl AnalysisEngine for UrlHeuristicEngine {
    fn name(&self) -> &'static str {
        "url_heuristic"
    }

    fn artifact_type(&self) -> ArtifactType {
        ArtifactType::Url
    }

    fn scan(&self, request: &ScanRequest) -> ScanResult {
        self.score_url(request.content())
    }
}

/// Adapts the text aggregator's `[0, 1]` verdict to the shared result shape.
#[derive(Debug, Default)]
pub struct TextAnalysisEngine {
    scanner: SocialEngineeringScanner,
}

impl TextAnalysisEngine {
    #[must_use]
    pub fn new(scanner: SocialEngineeringScanner) -> Self {
        Self { scanner }
    }
}

impl AnalysisEngine for TextAnalysisEngine {
    fn name(&self) -> &'static str {
        "text_social_engineering"
    }

    fn artifact_type(&self) -> ArtifactType {
        ArtifactType::Text
    }

    fn scan(&self, request: &ScanRequest) -> ScanResult {
        normalize_text_report(self.scanner.scan_text(request.content()))
    }
}

/// `risk_score = round(score * 100)`; LOW maps to SAFE, MEDIUM and HIGH to
/// SUSPICIOUS, CRITICAL to MALICIOUS. Findings are kept as-is.
#[must_use]
pub fn normalize_text_report(report: TextScanReport) -> ScanResult {
    let score = (report.risk_score.clamp(0.0, 1.0) * 100.0).round() as u32;
    ScanResult::new(score, text_level_to_risk(report.risk_level), report.findings)
}

#[must_use]
pub const fn text_level_to_risk(level: TextRiskLevel) -> RiskLevel {
    match level {
        TextRiskLevel::Low => RiskLevel::Safe,
        TextRiskLevel::Medium | TextRiskLevel::High => RiskLevel::Suspicious,
        TextRiskLevel::Critical => RiskLevel::Malicious,
    }
}

/// The closed set of engines the orchestrator can hold.
#[derive(Debug)]
pub enum Engine {
    Url(UrlHeuristicEngine),
    Text(TextAnalysisEngine),
}

impl AnalysisEngine for Engine {
    fn name(&self) -> &'static str {
        match self {
            Self::Url(engine) => engine.name(),
            Self::Text(engine) => engine.name(),
        }
    }

    fn artifact_type(&self) -> ArtifactType {
        match self {
            Self::Url(engine) => engine.artifact_type(),
            Self::Text(engine) => engine.artifact_type(),
        }
    }

    fn scan(&self, request: &ScanRequest) -> ScanResult {
        match self {
            Self::Url(engine) => engine.scan(request),
            Self::Text(engine) => engine.scan(request),
        }
    }
}
