use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::event::ProgressEvent;
use crate::model::ids::{FlashcardId, LessonId, ReadingId};

/// XP granted the first time a lesson's grammar is marked read.
pub const LESSON_XP: u64 = 100;
/// XP granted the first time a reading is completed.
pub const READING_XP: u64 = 50;
/// XP granted the first time a lesson challenge is passed.
pub const CHALLENGE_XP: u64 = 500;
/// XP per point scored in an exercise session.
pub const EXERCISE_XP_PER_POINT: u64 = 10;

/// Mastery gained on a successful flashcard review.
pub const MASTERY_GAIN: f64 = 0.25;
/// Mastery lost on a failed flashcard review.
pub const MASTERY_LOSS: f64 = 0.1;

/// The learner's whole progress record.
///
/// Persisted wholesale as camelCase JSON
/// (`currentLesson`, `vocabMastery`, ...). Sets and maps only grow, except
/// per-entry mastery which moves within `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    current_lesson: LessonId,
    xp: u64,
    lessons_completed: BTreeSet<LessonId>,
    vocab_mastery: BTreeMap<FlashcardId, f64>,
    exercises_completed: BTreeMap<LessonId, u32>,
    readings_completed: BTreeSet<ReadingId>,
    challenges_passed: BTreeSet<LessonId>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            current_lesson: LessonId::new(1),
            xp: 0,
            lessons_completed: BTreeSet::new(),
            vocab_mastery: BTreeMap::new(),
            exercises_completed: BTreeMap::new(),
            readings_completed: BTreeSet::new(),
            challenges_passed: BTreeSet::new(),
        }
    }
}

impl UserProgress {
    // Accessors
    #[must_use]
    pub fn current_lesson(&self) -> LessonId {
        self.current_lesson
    }

    #[must_use]
    pub fn xp(&self) -> u64 {
        self.xp
    }

    #[must_use]
    pub fn lessons_completed(&self) -> &BTreeSet<LessonId> {
        &self.lessons_completed
    }

    #[must_use]
    pub fn vocab_mastery(&self) -> &BTreeMap<FlashcardId, f64> {
        &self.vocab_mastery
    }

    #[must_use]
    pub fn exercises_completed(&self) -> &BTreeMap<LessonId, u32> {
        &self.exercises_completed
    }

    #[must_use]
    pub fn readings_completed(&self) -> &BTreeSet<ReadingId> {
        &self.readings_completed
    }

    #[must_use]
    pub fn challenges_passed(&self) -> &BTreeSet<LessonId> {
        &self.challenges_passed
    }

    #[must_use]
    pub fn is_lesson_completed(&self, lesson: LessonId) -> bool {
        self.lessons_completed.contains(&lesson)
    }

    /// Mastery of a flashcard; unseen cards are at 0.
    #[must_use]
    pub fn mastery(&self, word: &FlashcardId) -> f64 {
        self.vocab_mastery.get(word).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn exercise_count(&self, lesson: LessonId) -> u32 {
        self.exercises_completed.get(&lesson).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_reading_completed(&self, reading: &ReadingId) -> bool {
        self.readings_completed.contains(reading)
    }

    #[must_use]
    pub fn is_challenge_passed(&self, lesson: LessonId) -> bool {
        self.challenges_passed.contains(&lesson)
    }

    //
    // ─── TRANSITIONS ──────────────────────────────────────────────────────────
    //

    /// Mark a lesson's grammar as read. Returns `false` if it already was.
    pub fn complete_lesson(&mut self, lesson: LessonId) -> bool {
        if !self.lessons_completed.insert(lesson) {
            return false;
        }
        self.xp = self.xp.saturating_add(LESSON_XP);
        true
    }

    /// Apply one review to a flashcard and return the new mastery.
    pub fn update_vocab_mastery(&mut self, word: &FlashcardId, success: bool) -> f64 {
        let current = self.mastery(word);
        let next = if success {
            (current + MASTERY_GAIN).min(1.0)
        } else {
            (current - MASTERY_LOSS).max(0.0)
        };
        self.vocab_mastery.insert(word.clone(), next);
        next
    }

    /// Count one exercise session. Sessions are not deduplicated.
    pub fn increment_exercise_count(&mut self, lesson: LessonId, score: u32) -> u32 {
        let count = self.exercises_completed.entry(lesson).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        self.xp = self
            .xp
            .saturating_add(u64::from(score).saturating_mul(EXERCISE_XP_PER_POINT));
        count
    }

    /// Mark a reading as completed. Returns `false` if it already was.
    pub fn complete_reading(&mut self, reading: &ReadingId) -> bool {
        if !self.readings_completed.insert(reading.clone()) {
            return false;
        }
        self.xp = self.xp.saturating_add(READING_XP);
        true
    }

    /// Record a passed challenge. Returns `false` if it was already passed.
    ///
    /// Progression advances by one only when the newly passed lesson is the
    /// current lesson and lies below `max_lesson`. Passing any other lesson
    /// records the pass without moving `current_lesson`.
    pub fn pass_challenge(&mut self, lesson: LessonId, max_lesson: Option<LessonId>) -> bool {
        if !self.challenges_passed.insert(lesson) {
            return false;
        }
        self.xp = self.xp.saturating_add(CHALLENGE_XP);
        if self.current_lesson == lesson && max_lesson.is_some_and(|max| lesson < max) {
            self.current_lesson = lesson.next();
        }
        true
    }

    //
    // ─── EVENTS ───────────────────────────────────────────────────────────────
    //

    /// Apply an event. Returns whether the record changed.
    pub fn apply(&mut self, event: &ProgressEvent, max_lesson: Option<LessonId>) -> bool {
        match event {
            ProgressEvent::LessonCompleted { lesson } => self.complete_lesson(*lesson),
            ProgressEvent::VocabReviewed { word, success } => {
                self.update_vocab_mastery(word, *success);
                true
            }
            ProgressEvent::ExerciseSession { lesson, score } => {
                self.increment_exercise_count(*lesson, *score);
                true
            }
            ProgressEvent::ReadingCompleted { reading } => self.complete_reading(reading),
            ProgressEvent::ChallengePassed { lesson } => self.pass_challenge(*lesson, max_lesson),
        }
    }

    /// Rebuild a record by folding events into a fresh default record.
    #[must_use]
    pub fn replay<'a>(
        events: impl IntoIterator<Item = &'a ProgressEvent>,
        max_lesson: Option<LessonId>,
    ) -> Self {
        let mut progress = Self::default();
        for event in events {
            progress.apply(event, max_lesson);
        }
        progress
    }

    /// Whether this record holds everything `other` holds.
    ///
    /// Compares only what never shrinks: xp, the current lesson, the completion
    /// sets, exercise counts, and which cards have been reviewed. Mastery values
    /// are ignored since they may go down.
    #[must_use]
    pub fn includes(&self, other: &UserProgress) -> bool {
        self.xp >= other.xp
            && self.current_lesson >= other.current_lesson
            && self.lessons_completed.is_superset(&other.lessons_completed)
            && self.readings_completed.is_superset(&other.readings_completed)
            && self.challenges_passed.is_superset(&other.challenges_passed)
            && other
                .vocab_mastery
                .keys()
                .all(|word| self.vocab_mastery.contains_key(word))
            && other
                .exercises_completed
                .iter()
                .all(|(lesson, count)| self.exercise_count(*lesson) >= *count)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
