//! Text aggregator: runs every strategy over one text and sums their scores.

#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::TextConfig;
use crate::core::errors::Result;
use crate::scanner::strategies::{Strategy, default_strategies, strategies_from_config};

/// Four-level label for an aggregated text score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextRiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl TextRiskLevel {
    /// `> 0.7` critical, `> 0.4` high, `> 0.1` medium, otherwise low. Lower
    /// bounds are exclusive: exactly `0.7` is high.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::Critical
        } else if score > 0.4 {
            Self::High
        } else if score > 0.1 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for TextRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-strategy contribution kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyContribution {
    pub strategy: String,
    pub score: f64,
}

/// Aggregated verdict for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextScanReport {
    /// Sum of positive strategy scores, capped at `1.0`.
    pub risk_score: f64,
    pub risk_level: TextRiskLevel,
    /// Findings of contributing strategies, strategy order first.
    pub findings: Vec<String>,
    /// Strategies that scored above zero, in evaluation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributions: Vec<StrategyContribution>,
}

impl TextScanReport {
    /// `{0.0, LOW, []}`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            risk_score: 0.0,
            risk_level: TextRiskLevel::Low,
            findings: Vec::new(),
            contributions: Vec::new(),
        }
    }
}

/// Runs an ordered list of strategies and combines their verdicts additively.
#[derive(Debug)]
pub struct SocialEngineeringScanner {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for SocialEngineeringScanner {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl SocialEngineeringScanner {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Built-in strategies extended with configured keywords.
    pub fn from_config(text: &TextConfig) -> Result<Self> {
        Ok(Self::new(strategies_from_config(text)?))
    }

    /// Strategy names in evaluation order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    /// Scan `text`. Missing or empty input short-circuits to
    /// [`TextScanReport::empty`] without consulting any strategy.
    pub fn scan_text<'a>(&self, text: impl Into<Option<&'a str>>) -> TextScanReport {
        let Some(text) = text.into().filter(|t| !t.is_empty()) else {
            return TextScanReport::empty();
        };

        let mut total = 0.0;
        let mut findings = Vec::new();
        let mut contributions = Vec::new();
        for strategy in &self.strategies {
            let verdict = strategy.analyze(text);
            // Zero-score verdicts may still carry findings; they are dropped.
            if verdict.score > 0.0 {
                total += verdict.score;
                findings.extend(verdict.findings);
                contributions.push(StrategyContribution {
                    strategy: strategy.name().to_string(),
                    score: verdict.score,
                });
            }
        }

        let risk_score = f64::min(total, 1.0);
        TextScanReport {
            risk_score,
            risk_level: TextRiskLevel::from_score(risk_score),
            findings,
            contributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::strategies::{AuthorityImpersonation, StrategyVerdict};

    #[derive(Debug)]
    struct Fixed(f64, &'static str);

    impl Strategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn analyze(&self, _text: &str) -> StrategyVerdict {
            StrategyVerdict {
                score: self.0,
                findings: vec![self.1.to_string()],
            }
        }
    }

    #[test]
    fn combined_scan_is_critical() {
        let scanner = SocialEngineeringScanner::default();
        let report = scanner.scan_text("Urgente: El CEO requiere su pago en http://scam.com");
        assert_eq!(report.risk_level, TextRiskLevel::Critical);
        assert!(report.risk_score > 0.8);
        assert!(report.findings.len() >= 3, "{:?}", report.findings);
        assert_eq!(report.findings[0], "Detected urgency keyword: 'urgente'");
        assert_eq!(report.contributions.len(), 3);
    }

    #[test]
    fn empty_and_missing_input_are_low() {
        let scanner = SocialEngineeringScanner::default();
        for report in [scanner.scan_text(""), scanner.scan_text(None)] {
            assert_eq!(report, TextScanReport::empty());
            assert_eq!(report.risk_level, TextRiskLevel::Low);
        }
    }

    #[test]
    fn zero_score_findings_are_dropped() {
        let scanner = SocialEngineeringScanner::new(vec![Box::new(AuthorityImpersonation::default())]);
        let report = scanner.scan_text("Adjunto la factura");
        assert!(report.findings.is_empty());
        assert!(report.risk_score.abs() < f64::EPSILON);
        assert_eq!(report.risk_level, TextRiskLevel::Low);
    }

    #[test]
    fn scores_add_across_strategies_and_cap() {
        let scanner =
            SocialEngineeringScanner::new(vec![Box::new(Fixed(0.3, "a")), Box::new(Fixed(0.3, "b"))]);
        let report = scanner.scan_text("x");
        assert!((report.risk_score - 0.6).abs() < 1e-9);
        assert_eq!(report.risk_level, TextRiskLevel::High);
        assert_eq!(report.findings, ["a", "b"]);

        let capped =
            SocialEngineeringScanner::new(vec![Box::new(Fixed(0.9, "a")), Box::new(Fixed(0.9, "b"))]);
        assert!((capped.scan_text("x").risk_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_thresholds_have_exclusive_lower_bounds() {
        assert_eq!(TextRiskLevel::from_score(0.0), TextRiskLevel::Low);
        assert_eq!(TextRiskLevel::from_score(0.1), TextRiskLevel::Low);
        assert_eq!(TextRiskLevel::from_score(0.11), TextRiskLevel::Medium);
        assert_eq!(TextRiskLevel::from_score(0.4), TextRiskLevel::Medium);
        assert_eq!(TextRiskLevel::from_score(0.41), TextRiskLevel::High);
        assert_eq!(TextRiskLevel::from_score(0.7), TextRiskLevel::High);
        assert_eq!(TextRiskLevel::from_score(0.71), TextRiskLevel::Critical);
        assert_eq!(TextRiskLevel::from_score(1.0), TextRiskLevel::Critical);
    }

    #[test]
    fn strategy_order_is_preserved() {
        let scanner = SocialEngineeringScanner::default();
        assert_eq!(
            scanner.strategy_names().collect::<Vec<_>>(),
            ["urgency", "authority", "malicious_link"]
        );
    }

    #[test]
    fn report_serializes_uppercase_level() {
        let report = SocialEngineeringScanner::default().scan_text("Soy el CEO");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["risk_level"], "MEDIUM");
        assert_eq!(json["findings"][0], "Detected authority role claim: 'ceo'");
    }
}
