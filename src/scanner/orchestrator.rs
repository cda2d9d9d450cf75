//! Routes a scan request to the engine registered for its artifact type.

use crate::core::config::Config;
use crate::core::errors::{Result, SedError};
use crate::core::schema::{ArtifactType, ScanRequest, ScanResult};
use crate::scanner::engine::{AnalysisEngine, Engine, TextAnalysisEngine};
use crate::scanner::text::SocialEngineeringScanner;
use crate::scanner::url::UrlHeuristicEngine;

/// Ordered engine registry. The first engine that supports a request's
/// artifact type handles it.
///
/// The registry is immutable after construction, so one orchestrator can serve
/// concurrent callers behind a shared reference.
#[derive(Debug)]
pub struct AnalysisOrchestrator {
    engines: Vec<Engine>,
}

impl Default for AnalysisOrchestrator {
    /// URL engine first, then the text engine, both with built-in settings.
    fn default() -> Self {
        Self::new(vec![
            Engine::Url(UrlHeuristicEngine::default()),
            Engine::Text(TextAnalysisEngine::default()),
        ])
    }
}

impl AnalysisOrchestrator {
    /// Registry over `engines`, consulted in the given order.
    #[must_use]
    pub fn new(engines: Vec<Engine>) -> Self {
        Self { engines }
    }

    /// Build the registry from configuration, honoring the engine toggles.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut engines = Vec::with_capacity(2);
        if config.engines.url_enabled {
            engines.push(Engine::Url(UrlHeuristicEngine::from_config(&config.url)));
        }
        if config.engines.text_enabled {
            let scanner = SocialEngineeringScanner::from_config(&config.text)?;
            engines.push(Engine::Text(TextAnalysisEngine::new(scanner)));
        }
        Ok(Self::new(engines))
    }

    /// Registered engines in selection order.
    #[must_use]
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// The engine that would handle `artifact_type`, if any.
    #[must_use]
    pub fn engine_for(&self, artifact_type: ArtifactType) -> Option<&Engine> {
        self.engines.iter().find(|engine| engine.supports(artifact_type))
    }

    /// Artifact types some registered engine accepts, in [`ArtifactType::ALL`] order.
    #[must_use]
    pub fn supported_types(&self) -> Vec<ArtifactType> {
        ArtifactType::ALL
            .into_iter()
            .filter(|kind| self.engine_for(*kind).is_some())
            .collect()
    }

    /// Scan one artifact.
    ///
    /// # Errors
    ///
    /// [`SedError::UnsupportedArtifact`] when no registered engine handles the
    /// request's artifact type.
    pub fn analyze_artifact(&self, request: &ScanRequest) -> Result<ScanResult> {
        let artifact_type = request.artifact_type();
        let engine = self
            .engine_for(artifact_type)
            .ok_or(SedError::UnsupportedArtifact { artifact_type })?;
        Ok(engine.scan(request))
    }
}
