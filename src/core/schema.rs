//! Request/response value types shared by every engine and front end.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SedError};

/// Kind of artifact submitted for scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArtifactType {
    Url,
    Text,
    Image,
    Audio,
}

impl ArtifactType {
    /// Every artifact type in declaration order.
    pub const ALL: [Self; 4] = [Self::Url, Self::Text, Self::Image, Self::Audio];

    /// Wire tag (`URL`, `TEXT`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = SedError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SedError::UnknownArtifactType {
                value: s.to_string(),
            })
    }
}

/// Validated scan request. Content is guaranteed to contain at least one
/// non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScanRequest")]
pub struct ScanRequest {
    artifact_type: ArtifactType,
    content: String,
}

#[derive(Deserialize)]
struct RawScanRequest {
    artifact_type: ArtifactType,
    content: String,
}

impl TryFrom<RawScanRequest> for ScanRequest {
    type Error = SedError;

    fn try_from(raw: RawScanRequest) -> Result<Self> {
        Self::new(raw.artifact_type, raw.content)
    }
}

impl ScanRequest {
    pub fn new(artifact_type: ArtifactType, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(SedError::InvalidRequest {
                details: "content cannot be empty or whitespace-only".to_string(),
            });
        }
        Ok(Self {
            artifact_type,
            content,
        })
    }

    #[must_use]
    pub fn artifact_type(&self) -> ArtifactType {
        self.artifact_type
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Three-level verdict returned at the orchestrator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Malicious,
}

impl RiskLevel {
    /// Classify an integer risk score: `0` safe, `1..=59` suspicious,
    /// `60..=100` malicious.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Safe,
            1..=59 => Self::Suspicious,
            _ => Self::Malicious,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Suspicious => "SUSPICIOUS",
            Self::Malicious => "MALICIOUS",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound of [`ScanResult::risk_score`].
pub const MAX_RISK_SCORE: u8 = 100;

/// Final verdict for one artifact.
///
/// URL verdicts derive the level from the score through
/// [`RiskLevel::from_score`]. Text verdicts carry the text aggregator's level
/// mapped LOW to SAFE, MEDIUM and HIGH to SUSPICIOUS, CRITICAL to MALICIOUS,
/// so a text result can be `SAFE` with a nonzero score (e.g. 10) and
/// `SUSPICIOUS` at 60.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub findings: Vec<String>,
}

impl ScanResult {
    /// Build a result with an explicit level. The score is clamped to
    /// `0..=100`.
    #[must_use]
    pub fn new(risk_score: u32, risk_level: RiskLevel, findings: Vec<String>) -> Self {
        Self {
            risk_score: clamp_score(risk_score),
            risk_level,
            findings,
        }
    }

    /// Build a result whose level is derived from the clamped score.
    #[must_use]
    pub fn from_score(risk_score: u32, findings: Vec<String>) -> Self {
        let risk_score = clamp_score(risk_score);
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            findings,
        }
    }
}

fn clamp_score(score: u32) -> u8 {
    u8::try_from(score.min(u32::from(MAX_RISK_SCORE))).unwrap_or(MAX_RISK_SCORE)
}
