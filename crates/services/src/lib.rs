#![forbid(unsafe_code)]

pub mod analysis;
pub mod app_services;
pub mod error;
pub mod progress_service;

pub use latin_core::Clock;

pub use analysis::{AnalysisService, GenerationClient, GenerationConfig, TextGenerator};
pub use app_services::{AppServices, ServicesConfig};
pub use error::{AppServicesError, GenerationError, ProgressServiceError};
pub use progress_service::{ChallengeAttempt, ExerciseOutcome, ProgressTracker};
