//! Text detection strategies: urgency, authority impersonation, malicious links.
//!
//! Each strategy is a pure function of its input: `analyze` returns the score
//! together with the findings that explain it, and nothing is cached between
//! calls. A single instance can therefore be shared across threads.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::config::TextConfig;
use crate::core::errors::Result;
use crate::scanner::keywords::KeywordSet;

/// Fear/urgency vocabulary, in report order.
pub const URGENCY_KEYWORDS: &[&str] = &[
    "urgente",
    "inmediato",
    "acción requerida",
    "bloqueo",
    "suspendida",
    "cancelación",
    "ahora",
    "ya",
    "límite",
    "advertencia",
];

/// Roles an impersonator typically claims, in precedence order.
pub const AUTHORITY_ROLES: &[&str] = &[
    "ceo",
    "director",
    "gerente",
    "rrhh",
    "recursos humanos",
    "departamento de ti",
    "seguridad",
    "banco",
    "soporte técnico",
    "administrador",
];

/// Requests for money, credentials or access, in precedence order.
pub const DEMAND_KEYWORDS: &[&str] = &[
    "envía",
    "transfiere",
    "contraseña",
    "acceso",
    "pago",
    "factura",
];

const URGENCY_BASE: f64 = 0.5;
const URGENCY_PER_MATCH: f64 = 0.1;
const ROLE_WEIGHT: f64 = 0.4;
const DEMAND_WEIGHT: f64 = 0.5;
const LINK_AT_SIGN_WEIGHT: f64 = 0.8;
const LINK_OBFUSCATED_WEIGHT: f64 = 0.4;
const LINK_PLAIN_WEIGHT: f64 = 0.1;
/// More dots than this anywhere in the text marks embedded URLs as complex.
const OBFUSCATION_DOT_THRESHOLD: usize = 3;

static URL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\\(\\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .ok()
});

/// Score and explanation produced by one strategy for one text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrategyVerdict {
    /// Threat probability in `[0, 1]`.
    pub score: f64,
    /// Reasons behind the score, in detection order.
    pub findings: Vec<String>,
}

impl StrategyVerdict {
    /// Zero score, no findings.
    #[must_use]
    pub fn clear() -> Self {
        Self::default()
    }

    fn new(score: f64, findings: Vec<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            findings,
        }
    }
}

/// One independent heuristic rule set over free-form text.
pub trait Strategy: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Score `text`. Empty text always yields [`StrategyVerdict::clear`].
    fn analyze(&self, text: &str) -> StrategyVerdict;
}

// ──────────────────────── urgency ────────────────────────

/// Flags fear- or urgency-inducing vocabulary.
#[derive(Debug, Clone)]
pub struct UrgencyDetection {
    keywords: KeywordSet,
}

impl Default for UrgencyDetection {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::builtin(URGENCY_KEYWORDS),
        }
    }
}

impl UrgencyDetection {
    /// Built-in vocabulary followed by `extra` keywords.
    pub fn with_custom<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            keywords: KeywordSet::builtin(URGENCY_KEYWORDS).with_custom(extra)?,
        })
    }
}

impl Strategy for UrgencyDetection {
    fn name(&self) -> &'static str {
        "urgency"
    }

    fn analyze(&self, text: &str) -> StrategyVerdict {
        if text.is_empty() {
            return StrategyVerdict::clear();
        }
        let lowered = text.to_lowercase();
        let findings: Vec<String> = self
            .keywords
            .matching(&lowered)
            .map(|keyword| format!("Detected urgency keyword: '{keyword}'"))
            .collect();

        if findings.is_empty() {
            return StrategyVerdict::clear();
        }
        let score = (findings.len() as f64).mul_add(URGENCY_PER_MATCH, URGENCY_BASE);
        StrategyVerdict::new(score.min(1.0), findings)
    }
}

// ──────────────────────── authority ────────────────────────

/// Flags claims of authority, escalated when paired with a demand.
#[derive(Debug, Clone)]
pub struct AuthorityImpersonation {
    roles: KeywordSet,
    demands: KeywordSet,
}

impl Default for AuthorityImpersonation {
    fn default() -> Self {
        Self {
            roles: KeywordSet::builtin(AUTHORITY_ROLES),
            demands: KeywordSet::builtin(DEMAND_KEYWORDS),
        }
    }
}

impl AuthorityImpersonation {
    /// Built-in roles and demands followed by the extra ones.
    pub fn with_custom<R, D, S>(extra_roles: R, extra_demands: D) -> Result<Self>
    where
        R: IntoIterator<Item = S>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            roles: KeywordSet::builtin(AUTHORITY_ROLES).with_custom(extra_roles)?,
            demands: KeywordSet::builtin(DEMAND_KEYWORDS).with_custom(extra_demands)?,
        })
    }
}

impl Strategy for AuthorityImpersonation {
    fn name(&self) -> &'static str {
        "authority"
    }

    fn analyze(&self, text: &str) -> StrategyVerdict {
        if text.is_empty() {
            return StrategyVerdict::clear();
        }
        let lowered = text.to_lowercase();
        let role = self.roles.first_match(&lowered);
        let demand = self.demands.first_match(&lowered);

        let mut findings = Vec::with_capacity(2);
        if let Some(role) = role {
            findings.push(format!("Detected authority role claim: '{role}'"));
        }
        if let Some(demand) = demand {
            findings.push(format!("Detected demand language: '{demand}'"));
        }

        // A demand on its own is not impersonation.
        let score = match (role, demand) {
            (None, _) => 0.0,
            (Some(_), None) => ROLE_WEIGHT,
            (Some(_), Some(_)) => ROLE_WEIGHT + DEMAND_WEIGHT,
        };
        StrategyVerdict::new(score.min(1.0), findings)
    }
}

// ──────────────────────── links ────────────────────────

/// Extracts embedded http(s) URLs and grades their structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaliciousLink;

impl MaliciousLink {
    /// Every http(s) URL in `text`, in order of appearance.
    #[must_use]
    pub fn extract_urls(text: &str) -> Vec<&str> {
        URL_PATTERN
            .as_ref()
            .map(|re| re.find_iter(text).map(|m| m.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Strategy for MaliciousLink {
    fn name(&self) -> &'static str {
        "malicious_link"
    }

    fn analyze(&self, text: &str) -> StrategyVerdict {
        if text.is_empty() {
            return StrategyVerdict::clear();
        }
        let urls = Self::extract_urls(text);
        if urls.is_empty() {
            return StrategyVerdict::clear();
        }

        let dense_text = memchr::memchr_iter(b'.', text.as_bytes()).count()
            > OBFUSCATION_DOT_THRESHOLD;

        let mut score = 0.0;
        let mut findings = Vec::with_capacity(urls.len() * 2);
        for url in urls {
            findings.push(format!("Found URL: {url}"));
            if url.contains('@') {
                findings.push(format!("Suspicious URL structure (contains '@'): {url}"));
                score += LINK_AT_SIGN_WEIGHT;
            } else if dense_text && !url.contains("domain") {
                findings.push(format!("Potential complex/obfuscated URL: {url}"));
                score += LINK_OBFUSCATED_WEIGHT;
            } else {
                findings.push(format!(
                    "URL present, checking reputation (simulated): {url}"
                ));
                score += LINK_PLAIN_WEIGHT;
            }
        }
        StrategyVerdict::new(f64::min(score, 1.0), findings)
    }
}

// ──────────────────────── assembly ────────────────────────

/// The built-in strategies in evaluation order.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(UrgencyDetection::default()),
        Box::new(AuthorityImpersonation::default()),
        Box::new(MaliciousLink),
    ]
}

/// The built-in strategies extended with the configured extra keywords.
pub fn strategies_from_config(text: &TextConfig) -> Result<Vec<Box<dyn Strategy>>> {
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(UrgencyDetection::with_custom(&text.extra_urgency_keywords)?),
        Box::new(AuthorityImpersonation::with_custom(
            &text.extra_authority_roles,
            &text.extra_demand_keywords,
        )?),
        Box::new(MaliciousLink),
    ];
    Ok(strategies)
}
