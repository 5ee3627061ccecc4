pub mod analysis;
pub mod curriculum;
mod event;
mod ids;
mod progress;

pub use analysis::{
    ChatRole, ChatTurn, DependencyTreeError, Difficulty, MorphToken, ReviewRating,
    validate_dependency_tree,
};
pub use curriculum::{
    CHALLENGE_PASS_RATIO, Challenge, ChallengeGrade, Curriculum, CurriculumDraft,
    CurriculumError, Flashcard, Lesson, QuizQuestion, Reading, ReadingQuestion, grade_quiz,
};
pub use event::ProgressEvent;
pub use ids::{FlashcardId, LessonId, ParseIdError, ReadingId};
pub use progress::{
    CHALLENGE_XP, EXERCISE_XP_PER_POINT, LESSON_XP, MASTERY_GAIN, MASTERY_LOSS, READING_XP,
    UserProgress,
};
