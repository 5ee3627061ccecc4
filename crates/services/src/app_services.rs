use std::sync::Arc;

use latin_core::model::Curriculum;
use storage::repository::{DEFAULT_PROGRESS_KEY, Storage};

use crate::Clock;
use crate::analysis::{AnalysisService, GenerationClient, GenerationConfig, TextGenerator};
use crate::error::AppServicesError;
use crate::progress_service::ProgressTracker;

/// Settings shared by the assembled services.
#[derive(Clone)]
pub struct ServicesConfig {
    pub progress_key: String,
    pub curriculum: Arc<Curriculum>,
    pub generation: Option<GenerationConfig>,
    pub quiz_seed: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            progress_key: DEFAULT_PROGRESS_KEY.to_string(),
            curriculum: Arc::new(Curriculum::builtin()),
            generation: None,
            quiz_seed: 0,
        }
    }
}

impl ServicesConfig {
    /// Defaults plus generation settings from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            generation: GenerationConfig::from_env(),
            ..Self::default()
        }
    }
}

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    tracker: Arc<ProgressTracker>,
    analysis: Arc<AnalysisService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: ServicesConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(&storage, clock, config))
    }

    #[must_use]
    pub fn in_memory(clock: Clock, config: ServicesConfig) -> Self {
        Self::assemble(&Storage::in_memory(), clock, config)
    }

    fn assemble(storage: &Storage, clock: Clock, config: ServicesConfig) -> Self {
        let tracker = Arc::new(ProgressTracker::new(
            clock,
            config.progress_key,
            Arc::clone(&config.curriculum),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.events),
        ));
        let generator = config
            .generation
            .map(|c| Arc::new(GenerationClient::new(c)) as Arc<dyn TextGenerator>);
        if generator.is_none() {
            tracing::info!("no text generator configured, analysis runs offline");
        }
        let analysis = Arc::new(AnalysisService::new(
            generator,
            config.curriculum,
            config.quiz_seed,
        ));
        Self { tracker, analysis }
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.tracker)
    }

    #[must_use]
    pub fn analysis(&self) -> Arc<AnalysisService> {
        Arc::clone(&self.analysis)
    }
}
