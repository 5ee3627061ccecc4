use std::sync::Arc;

use latin_core::model::{
    ChallengeGrade, Curriculum, Flashcard, FlashcardId, LessonId, ProgressEvent, QuizQuestion,
    ReadingId, ReviewRating, UserProgress, grade_quiz,
};
use latin_core::recommend::{self, LessonMapEntry, Recommendation};
use latin_core::status::{LessonStatus, Stage};
use storage::repository::{ProgressEventRepository, ProgressRepository, StorageError};

use crate::Clock;
use crate::error::ProgressServiceError;

/// Attempts at a read-modify-write before a revision conflict is surfaced.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Result of grading one exercise session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseOutcome {
    pub score: u32,
    pub total: u32,
    pub progress: UserProgress,
}

/// Result of a challenge attempt. `progress` is unchanged when the attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeAttempt {
    pub grade: ChallengeGrade,
    pub progress: UserProgress,
}

impl ChallengeAttempt {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.grade.passed()
    }
}

/// Progression tracker over one persisted learner record.
///
/// Every mutation reloads the full record, applies one event, and writes the
/// record and its event-log entry in one storage write. Transitions that
/// leave the record unchanged write nothing.
#[derive(Clone)]
pub struct ProgressTracker {
    clock: Clock,
    key: String,
    curriculum: Arc<Curriculum>,
    records: Arc<dyn ProgressRepository>,
    events: Arc<dyn ProgressEventRepository>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(
        clock: Clock,
        key: impl Into<String>,
        curriculum: Arc<Curriculum>,
        records: Arc<dyn ProgressRepository>,
        events: Arc<dyn ProgressEventRepository>,
    ) -> Self {
        Self {
            clock,
            key: key.into(),
            curriculum,
            records,
            events,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Load the learner record. A missing record is a fresh start.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be read or decoded.
    pub async fn get_progress(&self) -> Result<UserProgress, ProgressServiceError> {
        Ok(self.load().await?.0)
    }

    //
    // ─── TRANSITIONS ──────────────────────────────────────────────────────────
    //

    /// Mark a lesson's grammar as read.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn complete_lesson(
        &self,
        lesson: LessonId,
    ) -> Result<UserProgress, ProgressServiceError> {
        self.record(ProgressEvent::LessonCompleted { lesson }).await
    }

    /// Apply one flashcard review.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn update_vocab_mastery(
        &self,
        word: FlashcardId,
        success: bool,
    ) -> Result<UserProgress, ProgressServiceError> {
        self.record(ProgressEvent::VocabReviewed { word, success }).await
    }

    /// Apply a self-rated review; `Hard` counts as a miss.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn review_flashcard(
        &self,
        word: FlashcardId,
        rating: ReviewRating,
    ) -> Result<UserProgress, ProgressServiceError> {
        self.update_vocab_mastery(word, rating.is_success()).await
    }

    /// Count one exercise session scored `score` points.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn increment_exercise_count(
        &self,
        lesson: LessonId,
        score: u32,
    ) -> Result<UserProgress, ProgressServiceError> {
        self.record(ProgressEvent::ExerciseSession { lesson, score }).await
    }

    /// Grade an exercise session and count it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn record_exercise_session<S: AsRef<str> + Sync>(
        &self,
        lesson: LessonId,
        questions: &[QuizQuestion],
        answers: &[S],
    ) -> Result<ExerciseOutcome, ProgressServiceError> {
        let score = grade_quiz(questions, answers);
        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        let progress = self.increment_exercise_count(lesson, score).await?;
        Ok(ExerciseOutcome {
            score,
            total,
            progress,
        })
    }

    /// Mark a reading as completed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn complete_reading(
        &self,
        reading: ReadingId,
    ) -> Result<UserProgress, ProgressServiceError> {
        self.record(ProgressEvent::ReadingCompleted { reading }).await
    }

    /// Record a passed challenge, advancing the current lesson when it was the
    /// current one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn pass_challenge(
        &self,
        lesson: LessonId,
    ) -> Result<UserProgress, ProgressServiceError> {
        self.record(ProgressEvent::ChallengePassed { lesson }).await
    }

    /// Grade a challenge attempt and record the pass at 80% or better.
    ///
    /// # Errors
    ///
    /// Returns `UnknownChallenge` when the lesson has no challenge, `StageLocked`
    /// while the reading stage is incomplete, or `Storage` if persistence fails.
    pub async fn attempt_challenge<S: AsRef<str> + Sync>(
        &self,
        lesson: LessonId,
        answers: &[S],
    ) -> Result<ChallengeAttempt, ProgressServiceError> {
        let challenge = self
            .curriculum
            .challenge_for(lesson)
            .ok_or(ProgressServiceError::UnknownChallenge(lesson))?;

        let progress = self.get_progress().await?;
        let status = LessonStatus::evaluate(&progress, &self.curriculum, lesson);
        if !status.challenge.unlocked {
            return Err(ProgressServiceError::StageLocked {
                lesson,
                stage: Stage::Challenge,
            });
        }

        let grade = challenge.grade(answers);
        tracing::info!(
            %lesson,
            correct = grade.correct,
            total = grade.total,
            passed = grade.passed(),
            "challenge graded"
        );
        if !grade.passed() {
            return Ok(ChallengeAttempt { grade, progress });
        }

        let progress = self.pass_challenge(lesson).await?;
        Ok(ChallengeAttempt { grade, progress })
    }

    /// Rebuild the record from the event log and store it.
    ///
    /// The replay only replaces the stored record when it holds everything the
    /// record holds; a log that lost history never shrinks progress.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteEventLog` when the replay falls short of the stored
    /// record, or `Storage` if the log cannot be read or the record cannot be
    /// written.
    pub async fn rebuild_from_events(&self) -> Result<UserProgress, ProgressServiceError> {
        let log = self.events.list_events(&self.key).await?;
        let progress = UserProgress::replay(
            log.iter().map(|record| &record.event),
            self.curriculum.max_lesson(),
        );

        let (stored, revision) = self.load().await?;
        if !progress.includes(&stored) {
            tracing::warn!(
                key = %self.key,
                events = log.len(),
                stored_xp = stored.xp(),
                replayed_xp = progress.xp(),
                "event log does not cover the stored record, keeping it"
            );
            return Err(ProgressServiceError::IncompleteEventLog {
                stored_xp: stored.xp(),
                replayed_xp: progress.xp(),
            });
        }
        if progress == stored {
            return Ok(progress);
        }

        self.records
            .save_progress(&self.key, &progress, revision, self.clock.now())
            .await?;
        tracing::info!(key = %self.key, events = log.len(), "progress rebuilt from event log");
        Ok(progress)
    }

    //
    // ─── DERIVED VIEWS ────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be read.
    pub async fn lesson_status(
        &self,
        lesson: LessonId,
    ) -> Result<LessonStatus, ProgressServiceError> {
        let progress = self.get_progress().await?;
        Ok(LessonStatus::evaluate(&progress, &self.curriculum, lesson))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be read.
    pub async fn recommendations(&self) -> Result<Vec<Recommendation>, ProgressServiceError> {
        let progress = self.get_progress().await?;
        Ok(recommend::recommend(&progress, &self.curriculum))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be read.
    pub async fn lesson_map(&self) -> Result<Vec<LessonMapEntry>, ProgressServiceError> {
        let progress = self.get_progress().await?;
        Ok(recommend::lesson_map(&progress, &self.curriculum))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be read.
    pub async fn study_deck(&self) -> Result<Vec<Flashcard>, ProgressServiceError> {
        let progress = self.get_progress().await?;
        Ok(recommend::study_deck(&progress, &self.curriculum)
            .into_iter()
            .cloned()
            .collect())
    }

    //
    // ─── PERSISTENCE ──────────────────────────────────────────────────────────
    //

    async fn load(&self) -> Result<(UserProgress, u64), StorageError> {
        Ok(self
            .records
            .load_progress(&self.key)
            .await?
            .map_or_else(|| (UserProgress::default(), 0), |s| (s.progress, s.revision)))
    }

    async fn record(&self, event: ProgressEvent) -> Result<UserProgress, ProgressServiceError> {
        let max_lesson = self.curriculum.max_lesson();
        let mut attempt = 1;
        loop {
            let (mut progress, revision) = self.load().await?;
            if !progress.apply(&event, max_lesson) {
                return Ok(progress);
            }

            let now = self.clock.now();
            match self
                .records
                .save_progress_with_event(&self.key, &progress, revision, &event, now)
                .await
            {
                Ok(_) => {
                    tracing::debug!(key = %self.key, kind = event.kind(), "progress updated");
                    return Ok(progress);
                }
                Err(StorageError::Conflict) if attempt < MAX_WRITE_ATTEMPTS => {
                    tracing::warn!(
                        key = %self.key,
                        attempt,
                        "progress changed underneath, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
