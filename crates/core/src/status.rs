//! Five-stage unlock pipeline for a lesson.
//!
//! grammar -> vocab -> exercises -> reading -> challenge. Each stage unlocks
//! on the previous stage's completion predicate; nothing is cached.

use serde::Serialize;

use crate::model::{Curriculum, LessonId, UserProgress};

/// Average lesson mastery needed to complete the vocab stage.
pub const VOCAB_MASTERY_THRESHOLD: f64 = 0.5;
/// Exercise sessions needed to complete the exercises stage.
pub const REQUIRED_EXERCISE_SESSIONS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Grammar,
    Vocab,
    Exercises,
    Reading,
    Challenge,
}

impl Stage {
    /// Stages in unlock order.
    pub const ALL: [Stage; 5] = [
        Stage::Grammar,
        Stage::Vocab,
        Stage::Exercises,
        Stage::Reading,
        Stage::Challenge,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageStatus {
    pub unlocked: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VocabStatus {
    pub unlocked: bool,
    pub completed: bool,
    pub mastery: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseStatus {
    pub unlocked: bool,
    pub completed: bool,
    pub count: u32,
}

/// Derived view of one lesson's stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonStatus {
    pub lesson: LessonId,
    pub grammar: StageStatus,
    pub vocab: VocabStatus,
    pub exercises: ExerciseStatus,
    pub reading: StageStatus,
    pub challenge: StageStatus,
}

/// Mean mastery over the lesson's flashcards; 0 when it has none.
#[must_use]
pub fn lesson_mastery(progress: &UserProgress, curriculum: &Curriculum, lesson: LessonId) -> f64 {
    let (sum, count) = curriculum
        .flashcards_for(lesson)
        .fold((0.0, 0u32), |(sum, count), card| {
            (sum + progress.mastery(&card.id), count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    sum / f64::from(count)
}

impl LessonStatus {
    #[must_use]
    pub fn evaluate(progress: &UserProgress, curriculum: &Curriculum, lesson: LessonId) -> Self {
        let grammar_done = progress.is_lesson_completed(lesson);

        let mastery = lesson_mastery(progress, curriculum, lesson);
        let vocab_done = mastery >= VOCAB_MASTERY_THRESHOLD;

        let count = progress.exercise_count(lesson);
        let exercises_done = count >= REQUIRED_EXERCISE_SESSIONS;

        let mut readings = curriculum.readings_for(lesson).peekable();
        let reading_done = readings.peek().is_some()
            && readings.all(|r| progress.is_reading_completed(&r.id));

        let challenge_done = progress.is_challenge_passed(lesson);

        Self {
            lesson,
            grammar: StageStatus {
                unlocked: true,
                completed: grammar_done,
            },
            vocab: VocabStatus {
                unlocked: grammar_done,
                completed: vocab_done,
                mastery,
            },
            exercises: ExerciseStatus {
                unlocked: vocab_done,
                completed: exercises_done,
                count,
            },
            reading: StageStatus {
                unlocked: exercises_done,
                completed: reading_done,
            },
            challenge: StageStatus {
                unlocked: reading_done,
                completed: challenge_done,
            },
        }
    }

    /// Unlock/completion flags of a single stage.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Grammar => self.grammar,
            Stage::Vocab => StageStatus {
                unlocked: self.vocab.unlocked,
                completed: self.vocab.completed,
            },
            Stage::Exercises => StageStatus {
                unlocked: self.exercises.unlocked,
                completed: self.exercises.completed,
            },
            Stage::Reading => self.reading,
            Stage::Challenge => self.challenge,
        }
    }

    /// First stage, in unlock order, that is not completed.
    #[must_use]
    pub fn first_incomplete(&self) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|stage| !self.stage(*stage).completed)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_incomplete().is_none()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
