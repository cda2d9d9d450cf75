//! URL heuristic engine: length, credential-harvesting keywords, raw IP hosts.

#![allow(missing_docs)]

use std::sync::LazyLock;

use regex::Regex;

use crate::core::config::UrlConfig;
use crate::core::schema::ScanResult;

const LENGTH_PENALTY: u32 = 20;
const KEYWORD_PENALTY: u32 = 30;
const IP_HOST_PENALTY: u32 = 50;

static IP_HOST_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:http://|https://)?\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").ok()
});

/// Additive rule-based scorer for URL artifacts.
#[derive(Debug, Clone)]
pub struct UrlHeuristicEngine {
    max_length: usize,
    suspicious_keywords: Vec<String>,
}

impl Default for UrlHeuristicEngine {
    fn default() -> Self {
        Self::from_config(&UrlConfig::default())
    }
}

impl UrlHeuristicEngine {
    #[must_use]
    pub fn from_config(config: &UrlConfig) -> Self {
        Self {
            max_length: config.max_length,
            suspicious_keywords: config
                .suspicious_keywords
                .iter()
                .map(|kw| kw.to_lowercase())
                .collect(),
        }
    }

    /// Score one URL. Every rule is evaluated; contributions add up and the
    /// total is clamped to `0..=100`.
    #[must_use]
    pub fn score_url(&self, url: &str) -> ScanResult {
        let mut risk_score = 0;
        let mut findings = Vec::new();

        if url.chars().count() > self.max_length {
            risk_score += LENGTH_PENALTY;
            findings.push(format!(
                "URL length exceeds {} characters",
                self.max_length
            ));
        }

        let lowered = url.to_lowercase();
        let found: Vec<&str> = self
            .suspicious_keywords
            .iter()
            .map(String::as_str)
            .filter(|kw| lowered.contains(kw))
            .collect();
        if !found.is_empty() {
            risk_score += KEYWORD_PENALTY;
            findings.push(format!("Suspicious keywords found: {}", found.join(", ")));
        }

        if uses_ip_host(url) {
            risk_score += IP_HOST_PENALTY;
            findings.push("URL uses an IP address instead of a domain name".to_string());
        }

        ScanResult::from_score(risk_score, findings)
    }
}

/// Whether the URL starts (after an optional http/https scheme) with a
/// dotted-quad IPv4 host.
#[must_use]
pub fn uses_ip_host(url: &str) -> bool {
    IP_HOST_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(url))
}
