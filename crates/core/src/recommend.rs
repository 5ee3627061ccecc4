//! Next-action resolver and dashboard helpers.

use serde::Serialize;

use crate::model::{Curriculum, Flashcard, LessonId, UserProgress};
use crate::status::{LessonStatus, REQUIRED_EXERCISE_SESSIONS, Stage};

/// Screen a recommendation sends the learner to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    Dashboard,
    Lesson,
    Analyzer,
    Srs,
    Tutor,
    Exercises,
    Reading,
    Challenge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: &'static str,
    pub kind: Stage,
    pub message: String,
    pub priority: Priority,
    pub view: AppView,
    pub lesson: Option<LessonId>,
}

/// Point at the first incomplete stage of the current lesson.
///
/// Returns at most one item; empty once all five stages are done. Never looks
/// past the current lesson.
#[must_use]
pub fn recommend(progress: &UserProgress, curriculum: &Curriculum) -> Vec<Recommendation> {
    let lesson = progress.current_lesson();
    let status = LessonStatus::evaluate(progress, curriculum, lesson);

    let Some(stage) = status.first_incomplete() else {
        return Vec::new();
    };

    let rec = match stage {
        Stage::Grammar => Recommendation {
            id: "step-1-grammar",
            kind: stage,
            message: format!("Step 1: read the grammar for Lesson {lesson}"),
            priority: Priority::High,
            view: AppView::Lesson,
            lesson: Some(lesson),
        },
        Stage::Vocab => Recommendation {
            id: "step-2-vocab",
            kind: stage,
            message: format!(
                "Step 2: master 50% of the vocabulary ({}% now)",
                percent(status.vocab.mastery)
            ),
            priority: Priority::High,
            view: AppView::Srs,
            lesson: None,
        },
        Stage::Exercises => Recommendation {
            id: "step-3-ex",
            kind: stage,
            message: format!(
                "Step 3: complete {REQUIRED_EXERCISE_SESSIONS} exercise sessions ({}/{})",
                status.exercises.count, REQUIRED_EXERCISE_SESSIONS
            ),
            priority: Priority::High,
            view: AppView::Exercises,
            lesson: None,
        },
        Stage::Reading => Recommendation {
            id: "step-4-read",
            kind: stage,
            message: "Step 4: finish the lesson reading".to_string(),
            priority: Priority::High,
            view: AppView::Reading,
            lesson: None,
        },
        Stage::Challenge => Recommendation {
            id: "step-5-boss",
            kind: stage,
            message: "Final challenge! Pass the exam to reach the next lesson".to_string(),
            priority: Priority::High,
            view: AppView::Challenge,
            lesson: Some(lesson),
        },
    };

    vec![rec]
}

fn percent(mastery: f64) -> u32 {
    // mastery is within [0, 1]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (mastery * 100.0).round() as u32;
    pct
}

/// Position of a lesson relative to the learner's current lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonState {
    Completed,
    Current,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonMapEntry {
    pub lesson: LessonId,
    pub title: String,
    pub state: LessonState,
}

/// Course map for the dashboard.
#[must_use]
pub fn lesson_map(progress: &UserProgress, curriculum: &Curriculum) -> Vec<LessonMapEntry> {
    let current = progress.current_lesson();
    curriculum
        .lessons()
        .iter()
        .map(|lesson| LessonMapEntry {
            lesson: lesson.id,
            title: lesson.title.clone(),
            state: match lesson.id.cmp(&current) {
                std::cmp::Ordering::Less => LessonState::Completed,
                std::cmp::Ordering::Equal => LessonState::Current,
                std::cmp::Ordering::Greater => LessonState::Locked,
            },
        })
        .collect()
}

/// Flashcards of the current lesson, the deck the SRS trainer studies.
#[must_use]
pub fn study_deck<'a>(progress: &UserProgress, curriculum: &'a Curriculum) -> Vec<&'a Flashcard> {
    curriculum
        .flashcards_for(progress.current_lesson())
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
