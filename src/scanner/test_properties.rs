//! Property-based tests for scoring invariants.
//!
//! Arbitrary URLs and messages must always yield bounded scores, levels that
//! agree with those scores, and identical verdicts on repeated scans.

use proptest::prelude::*;

use super::engine::{AnalysisEngine, Engine, TextAnalysisEngine};
use super::orchestrator::AnalysisOrchestrator;
use super::strategies::{
    AuthorityImpersonation, MaliciousLink, Strategy as TextStrategy, URGENCY_KEYWORDS,
    UrgencyDetection, default_strategies,
};
use super::text::{SocialEngineeringScanner, TextRiskLevel};
use super::url::UrlHeuristicEngine;
use crate::core::schema::{ArtifactType, RiskLevel, ScanRequest};

const AUTHORITY_WORDS: &[&str] = &["ceo", "banco", "rrhh", "pago", "contraseña"];

// ──────────────────── strategies ────────────────────

fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("http://"), Just("https://")],
        prop_oneof![
            "[a-z]{1,12}\\.(com|org|net)".prop_map(String::from),
            (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
                .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}")),
        ],
        "(/[a-zA-Z0-9._-]{0,30}){0,4}",
    )
        .prop_map(|(scheme, host, path)| format!("{scheme}{host}{path}"))
}

fn arb_word() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-záéíóñ]{1,10}".prop_map(String::from),
        1 => proptest::sample::select(URGENCY_KEYWORDS).prop_map(String::from),
        1 => proptest::sample::select(AUTHORITY_WORDS).prop_map(String::from),
        1 => Just("http://evil.com".to_string()),
        1 => Just("http://a.com@b.com".to_string()),
    ]
}

fn arb_message() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_word(), 0..24).prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn url_scores_are_bounded_and_consistent(url in arb_url()) {
        let result = UrlHeuristicEngine::default().score_url(&url);
        prop_assert!(result.risk_score <= 100);
        prop_assert_eq!(result.risk_level, RiskLevel::from_score(result.risk_score));
        prop_assert_eq!(result.risk_score == 0, result.findings.is_empty());
        prop_assert!(result.findings.len() <= 3);
    }

    #[test]
    fn url_scores_are_sums_of_rule_weights(url in arb_url()) {
        let score = UrlHeuristicEngine::default().score_url(&url).risk_score;
        prop_assert!([0, 20, 30, 50, 70, 80, 100].contains(&score), "score {}", score);
    }

    #[test]
    fn strategy_scores_stay_in_unit_interval(text in arb_message()) {
        for strategy in default_strategies() {
            let verdict = strategy.analyze(&text);
            prop_assert!((0.0..=1.0).contains(&verdict.score), "{}", strategy.name());
        }
    }

    #[test]
    fn aggregate_is_capped_and_level_matches(text in arb_message()) {
        let report = SocialEngineeringScanner::default().scan_text(text.as_str());
        prop_assert!((0.0..=1.0).contains(&report.risk_score));
        prop_assert_eq!(report.risk_level, TextRiskLevel::from_score(report.risk_score));
        let contributed: f64 = report.contributions.iter().map(|c| c.score).sum();
        prop_assert!((report.risk_score - contributed.min(1.0)).abs() < 1e-9);
    }

    #[test]
    fn scans_are_idempotent(text in arb_message()) {
        let scanner = SocialEngineeringScanner::default();
        prop_assert_eq!(scanner.scan_text(text.as_str()), scanner.scan_text(text.as_str()));
    }

    #[test]
    fn adding_urgency_never_lowers_the_score(text in arb_message(), index in 0..URGENCY_KEYWORDS.len()) {
        let strategy = UrgencyDetection::default();
        let before = strategy.analyze(&text).score;
        let after = strategy.analyze(&format!("{text} {}", URGENCY_KEYWORDS[index])).score;
        prop_assert!(after >= before);
    }

    #[test]
    fn authority_scores_take_three_values(text in arb_message()) {
        let score = AuthorityImpersonation::default().analyze(&text).score;
        prop_assert!(
            [0.0, 0.4, 0.9].iter().any(|v| (score - v).abs() < 1e-9),
            "score {}",
            score
        );
    }

    #[test]
    fn text_without_scheme_has_no_link_findings(text in "[a-z .@]{0,80}") {
        let verdict = MaliciousLink.analyze(&text);
        prop_assert!(verdict.findings.is_empty());
    }

    #[test]
    fn text_engine_levels_follow_normalization(text in arb_message()) {
        prop_assume!(!text.trim().is_empty());
        let request = ScanRequest::new(ArtifactType::Text, text.as_str()).unwrap();
        let report = SocialEngineeringScanner::default().scan_text(text.as_str());
        let result = TextAnalysisEngine::default().scan(&request);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = (report.risk_score * 100.0).round() as u8;
        prop_assert_eq!(result.risk_score, expected);
        let expected_level = match report.risk_level {
            TextRiskLevel::Low => RiskLevel::Safe,
            TextRiskLevel::Medium | TextRiskLevel::High => RiskLevel::Suspicious,
            TextRiskLevel::Critical => RiskLevel::Malicious,
        };
        prop_assert_eq!(result.risk_level, expected_level);
    }

    #[test]
    fn orchestrator_rejects_every_image_and_audio(content in "[a-z]{1,20}") {
        let orchestrator = AnalysisOrchestrator::default();
        for kind in [ArtifactType::Image, ArtifactType::Audio] {
            let request = ScanRequest::new(kind, content.as_str()).unwrap();
            prop_assert!(orchestrator.analyze_artifact(&request).is_err());
        }
        let engine = Engine::Url(UrlHeuristicEngine::default());
        prop_assert!(!engine.supports(ArtifactType::Image));
    }
}
