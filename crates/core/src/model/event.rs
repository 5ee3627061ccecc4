use serde::{Deserialize, Serialize};

use crate::model::ids::{FlashcardId, LessonId, ReadingId};

/// One learner action that changed the progress record.
///
/// The event log is append-only; replaying it with
/// [`UserProgress::replay`](crate::model::UserProgress::replay) rebuilds the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    LessonCompleted { lesson: LessonId },
    VocabReviewed { word: FlashcardId, success: bool },
    ExerciseSession { lesson: LessonId, score: u32 },
    ReadingCompleted { reading: ReadingId },
    ChallengePassed { lesson: LessonId },
}

impl ProgressEvent {
    /// Stable name, used as the `kind` column in storage.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::LessonCompleted { .. } => "lesson_completed",
            ProgressEvent::VocabReviewed { .. } => "vocab_reviewed",
            ProgressEvent::ExerciseSession { .. } => "exercise_session",
            ProgressEvent::ReadingCompleted { .. } => "reading_completed",
            ProgressEvent::ChallengePassed { .. } => "challenge_passed",
        }
    }
}
