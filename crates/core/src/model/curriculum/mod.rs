use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{FlashcardId, LessonId, ReadingId};

mod builtin;

/// Fraction of correct answers required to pass a lesson challenge.
pub const CHALLENGE_PASS_RATIO: f64 = 0.8;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("curriculum must contain at least one lesson")]
    NoLessons,

    #[error("duplicate lesson id {0}")]
    DuplicateLesson(LessonId),

    #[error("duplicate flashcard id {0}")]
    DuplicateFlashcard(FlashcardId),

    #[error("duplicate reading id {0}")]
    DuplicateReading(ReadingId),

    #[error("lesson {0} has more than one challenge")]
    DuplicateChallenge(LessonId),

    #[error("challenge for lesson {lesson} has a malformed question at index {index}")]
    InvalidQuestion { lesson: LessonId, index: usize },
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Grammar unit of the course. `content` is markdown theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub topic: String,
    pub description: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: FlashcardId,
    pub lesson_id: LessonId,
    pub latin: String,
    #[serde(alias = "spanish")]
    pub translation: String,
    pub part_of_speech: String,
    pub difficulty: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingQuestion {
    pub question: String,
    pub answer: String,
}

/// Graded Latin text attached to a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: ReadingId,
    pub lesson_id: LessonId,
    pub title: String,
    pub content: String,
    pub translation: String,
    #[serde(default)]
    pub questions: Vec<ReadingQuestion>,
}

/// Multiple-choice question used by challenges, exercises and generated quizzes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// A question is usable when it has text, options, and its answer is one of them.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && !self.options.is_empty()
            && self.options.iter().any(|o| o == &self.correct_answer)
    }
}

/// Final gated quiz of a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub lesson_id: LessonId,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
}

impl Challenge {
    /// Grade a full set of answers, positionally matched to the questions.
    #[must_use]
    pub fn grade<S: AsRef<str>>(&self, answers: &[S]) -> ChallengeGrade {
        ChallengeGrade {
            correct: grade_quiz(&self.questions, answers),
            total: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
        }
    }
}

/// Result of grading a challenge attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChallengeGrade {
    pub correct: u32,
    pub total: u32,
}

impl ChallengeGrade {
    #[must_use]
    pub fn score(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total)
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.total > 0 && self.score() >= CHALLENGE_PASS_RATIO
    }
}

/// Count answers that match the question's correct answer. Missing answers count as wrong.
#[must_use]
pub fn grade_quiz<S: AsRef<str>>(questions: &[QuizQuestion], answers: &[S]) -> u32 {
    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.correct_answer == a.as_ref())
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Unvalidated catalog, as loaded from a JSON file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumDraft {
    pub lessons: Vec<Lesson>,
    #[serde(default, alias = "vocabulary")]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

impl CurriculumDraft {
    /// Check identifier uniqueness and challenge questions.
    ///
    /// `lessonId` references are not checked; a dangling reference simply
    /// yields a stage with zero items.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` on empty lessons, duplicate ids, or malformed questions.
    pub fn validate(self) -> Result<Curriculum, CurriculumError> {
        if self.lessons.is_empty() {
            return Err(CurriculumError::NoLessons);
        }

        let mut seen = HashSet::new();
        for lesson in &self.lessons {
            if !seen.insert(lesson.id) {
                return Err(CurriculumError::DuplicateLesson(lesson.id));
            }
        }

        let mut seen = HashSet::new();
        for card in &self.flashcards {
            if !seen.insert(&card.id) {
                return Err(CurriculumError::DuplicateFlashcard(card.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for reading in &self.readings {
            if !seen.insert(&reading.id) {
                return Err(CurriculumError::DuplicateReading(reading.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for challenge in &self.challenges {
            if !seen.insert(challenge.lesson_id) {
                return Err(CurriculumError::DuplicateChallenge(challenge.lesson_id));
            }
            if let Some(index) = challenge.questions.iter().position(|q| !q.is_well_formed()) {
                return Err(CurriculumError::InvalidQuestion {
                    lesson: challenge.lesson_id,
                    index,
                });
            }
        }

        let mut lessons = self.lessons;
        lessons.sort_by_key(|l| l.id);

        Ok(Curriculum {
            lessons,
            flashcards: self.flashcards,
            readings: self.readings,
            challenges: self.challenges,
        })
    }
}

/// Read-only reference data: lessons, vocabulary, readings, challenges.
#[derive(Debug, Clone, PartialEq)]
pub struct Curriculum {
    lessons: Vec<Lesson>,
    flashcards: Vec<Flashcard>,
    readings: Vec<Reading>,
    challenges: Vec<Challenge>,
}

impl Curriculum {
    /// The bundled 40-lesson course.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::course()
    }

    /// Lessons ordered by id.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    #[must_use]
    pub fn flashcard(&self, id: &FlashcardId) -> Option<&Flashcard> {
        self.flashcards.iter().find(|c| &c.id == id)
    }

    pub fn flashcards_for(&self, lesson: LessonId) -> impl Iterator<Item = &Flashcard> {
        self.flashcards.iter().filter(move |c| c.lesson_id == lesson)
    }

    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn readings_for(&self, lesson: LessonId) -> impl Iterator<Item = &Reading> {
        self.readings.iter().filter(move |r| r.lesson_id == lesson)
    }

    #[must_use]
    pub fn challenge_for(&self, lesson: LessonId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.lesson_id == lesson)
    }

    /// Highest lesson id; progression never advances past it.
    #[must_use]
    pub fn max_lesson(&self) -> Option<LessonId> {
        self.lessons.last().map(|l| l.id)
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::builtin()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: "Q?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_answer: correct.into(),
            explanation: String::new(),
        }
    }

    fn lesson(id: u32) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            title: format!("Lesson {id}"),
            topic: String::new(),
            description: String::new(),
            content: String::new(),
        }
    }

    #[test]
    fn builtin_course_has_forty_lessons() {
        let course = Curriculum::builtin();
        assert_eq!(course.lessons().len(), 40);
        assert_eq!(course.max_lesson(), Some(LessonId::new(40)));
        assert_eq!(course.flashcards_for(LessonId::new(1)).count(), 3);
        assert_eq!(course.readings_for(LessonId::new(7)).count(), 1);
        assert!(course.challenge_for(LessonId::new(40)).is_some());
    }

    #[test]
    fn builtin_course_validates() {
        let course = Curriculum::builtin();
        let draft = CurriculumDraft {
            lessons: course.lessons().to_vec(),
            flashcards: course.flashcards().to_vec(),
            readings: course.readings().to_vec(),
            challenges: (1..=40)
                .filter_map(|n| course.challenge_for(LessonId::new(n)).cloned())
                .collect(),
        };
        assert_eq!(draft.validate().unwrap(), course);
    }

    #[test]
    fn draft_rejects_duplicate_lessons() {
        let draft = CurriculumDraft {
            lessons: vec![lesson(1), lesson(1)],
            ..CurriculumDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            CurriculumError::DuplicateLesson(LessonId::new(1))
        );
    }

    #[test]
    fn draft_rejects_empty_lessons() {
        let err = CurriculumDraft::default().validate().unwrap_err();
        assert_eq!(err, CurriculumError::NoLessons);
    }

    #[test]
    fn draft_rejects_answer_outside_options() {
        let draft = CurriculumDraft {
            lessons: vec![lesson(1)],
            challenges: vec![Challenge {
                lesson_id: LessonId::new(1),
                title: "C".into(),
                description: String::new(),
                questions: vec![question("a"), question("z")],
            }],
            ..CurriculumDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            CurriculumError::InvalidQuestion {
                lesson: LessonId::new(1),
                index: 1
            }
        );
    }

    #[test]
    fn draft_sorts_lessons_and_allows_dangling_lesson_refs() {
        let draft = CurriculumDraft {
            lessons: vec![lesson(2), lesson(1)],
            flashcards: vec![Flashcard {
                id: FlashcardId::new("x-1"),
                lesson_id: LessonId::new(99),
                latin: "aqua".into(),
                translation: "water".into(),
                part_of_speech: "Noun".into(),
                difficulty: 1,
            }],
            ..CurriculumDraft::default()
        };
        let course = draft.validate().unwrap();
        assert_eq!(course.lessons()[0].id, LessonId::new(1));
        assert_eq!(course.max_lesson(), Some(LessonId::new(2)));
        assert_eq!(course.flashcards_for(LessonId::new(1)).count(), 0);
    }

    #[test]
    fn draft_accepts_legacy_field_names() {
        let json = r#"{
            "lessons": [{"id": 1, "title": "T", "topic": "t", "description": "d", "content": "c"}],
            "vocabulary": [{"id": "l1-1", "lessonId": 1, "latin": "puella", "spanish": "niña",
                            "partOfSpeech": "Sustantivo", "difficulty": 1}]
        }"#;
        let draft: CurriculumDraft = serde_json::from_str(json).unwrap();
        let course = draft.validate().unwrap();
        assert_eq!(course.flashcards()[0].translation, "niña");
    }

    #[test]
    fn grading_counts_positional_matches() {
        let questions = vec![question("a"), question("b"), question("c")];
        assert_eq!(grade_quiz(&questions, &["a", "b", "a"]), 2);
        assert_eq!(grade_quiz(&questions, &["a"]), 1);
        assert_eq!(grade_quiz::<&str>(&questions, &[]), 0);
    }

    #[test]
    fn challenge_pass_threshold_is_eighty_percent() {
        let challenge = Challenge {
            lesson_id: LessonId::new(1),
            title: "C".into(),
            description: String::new(),
            questions: vec![
                question("a"),
                question("a"),
                question("a"),
                question("a"),
                question("a"),
            ],
        };
        assert!(challenge.grade(&["a", "a", "a", "a", "b"]).passed());
        assert!(!challenge.grade(&["a", "a", "a", "b", "b"]).passed());

        let three = Challenge {
            questions: vec![question("a"), question("a"), question("a")],
            ..challenge
        };
        // 2/3 is below the bar.
        assert!(!three.grade(&["a", "a", "b"]).passed());
        assert!(three.grade(&["a", "a", "a"]).passed());
    }

    #[test]
    fn empty_challenge_never_passes() {
        let grade = ChallengeGrade {
            correct: 0,
            total: 0,
        };
        assert!(!grade.passed());
        assert_eq!(grade.score(), 0.0);
    }
}
