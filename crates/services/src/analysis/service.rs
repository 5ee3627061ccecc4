use std::sync::{Arc, Mutex, PoisonError};

use latin_core::model::{
    ChatTurn, Curriculum, Difficulty, MorphToken, QuizQuestion, validate_dependency_tree,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use super::offline::{analyze_offline, quiz_offline, tutor_offline};
use super::TextGenerator;
use crate::error::GenerationError;

const TUTOR_SYSTEM_PROMPT: &str =
    "You are Marcus, a patient Latin teacher. Answer briefly and explain grammar with examples.";

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenPayload {
    Wrapped { tokens: Vec<MorphToken> },
    Bare(Vec<MorphToken>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuizPayload {
    Wrapped { questions: Vec<QuizQuestion> },
    Bare(Vec<QuizQuestion>),
}

/// Analyzer, quiz generator and tutor with an offline fallback.
pub struct AnalysisService {
    generator: Option<Arc<dyn TextGenerator>>,
    curriculum: Arc<Curriculum>,
    rng: Mutex<StdRng>,
}

impl AnalysisService {
    /// `seed` fixes the offline quiz sequence.
    #[must_use]
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        curriculum: Arc<Curriculum>,
        seed: u64,
    ) -> Self {
        Self {
            generator,
            curriculum,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Offline-only service.
    #[must_use]
    pub fn offline(curriculum: Arc<Curriculum>, seed: u64) -> Self {
        Self::new(None, curriculum, seed)
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    /// Per-token morphology and dependencies of `text`. Blank text yields nothing.
    pub async fn analyze_text(&self, text: &str) -> Vec<MorphToken> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let Some(generator) = &self.generator else {
            return analyze_offline(text, &self.curriculum);
        };

        let prompt = format!(
            "Analyze the Latin text morphologically and syntactically for a learner: \"{text}\". \
             Reply with JSON {{\"tokens\": [...]}} where each token has id (1-based), word, lemma, \
             pos, morphology, dependency, headId (0 for the root), explanation and translation."
        );
        match self.remote_tokens(generator.as_ref(), &prompt).await {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::warn!(error = %err, "analysis failed, using offline analyzer");
                analyze_offline(text, &self.curriculum)
            }
        }
    }

    /// A short multiple-choice quiz on `topic`.
    pub async fn generate_quiz(&self, difficulty: Difficulty, topic: &str) -> Vec<QuizQuestion> {
        let Some(generator) = &self.generator else {
            return self.offline_quiz(difficulty);
        };

        let prompt = format!(
            "Generate 3 Latin multiple-choice questions about {topic} ({difficulty}). \
             Reply with JSON {{\"questions\": [...]}} where each question has question, options, \
             correctAnswer (one of the options) and explanation."
        );
        match self.remote_quiz(generator.as_ref(), &prompt).await {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(error = %err, "quiz generation failed, using offline quiz");
                self.offline_quiz(difficulty)
            }
        }
    }

    /// The tutor's answer to `message` given the prior conversation.
    pub async fn tutor_reply(&self, history: &[ChatTurn], message: &str) -> String {
        let Some(generator) = &self.generator else {
            return tutor_offline(message, &self.curriculum);
        };

        match generator.chat(TUTOR_SYSTEM_PROMPT, history, message).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                tracing::warn!("tutor returned an empty reply, using offline tutor");
                tutor_offline(message, &self.curriculum)
            }
            Err(err) => {
                tracing::warn!(error = %err, "tutor failed, using offline tutor");
                tutor_offline(message, &self.curriculum)
            }
        }
    }

    async fn remote_tokens(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<Vec<MorphToken>, GenerationError> {
        let raw = generator.generate_json(prompt).await?;
        let tokens = match serde_json::from_str::<TokenPayload>(&raw)
            .map_err(|e| GenerationError::InvalidPayload(e.to_string()))?
        {
            TokenPayload::Wrapped { tokens } | TokenPayload::Bare(tokens) => tokens,
        };
        if tokens.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        validate_dependency_tree(&tokens)
            .map_err(|e| GenerationError::InvalidPayload(e.to_string()))?;
        Ok(tokens)
    }

    async fn remote_quiz(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        let raw = generator.generate_json(prompt).await?;
        let questions = match serde_json::from_str::<QuizPayload>(&raw)
            .map_err(|e| GenerationError::InvalidPayload(e.to_string()))?
        {
            QuizPayload::Wrapped { questions } | QuizPayload::Bare(questions) => questions,
        };
        if questions.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        if let Some(bad) = questions.iter().position(|q| !q.is_well_formed()) {
            return Err(GenerationError::InvalidPayload(format!(
                "question {bad} has no matching answer"
            )));
        }
        Ok(questions)
    }

    fn offline_quiz(&self, difficulty: Difficulty) -> Vec<QuizQuestion> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        quiz_offline(&mut *rng, &self.curriculum, difficulty)
    }
}
