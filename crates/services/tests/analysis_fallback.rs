use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use latin_core::model::{ChatTurn, Curriculum, Difficulty};
use services::{AnalysisService, GenerationError, TextGenerator};

/// Generator that replays a canned answer and counts calls.
struct Canned {
    json: Option<&'static str>,
    chat: Option<&'static str>,
    calls: AtomicUsize,
}

impl Canned {
    fn new(json: Option<&'static str>, chat: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            json,
            chat,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextGenerator for Canned {
    async fn generate_json(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.json
            .map(str::to_string)
            .ok_or(GenerationError::Disabled)
    }

    async fn chat(
        &self,
        _system: &str,
        _history: &[ChatTurn],
        _message: &str,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.chat.map(str::to_string).ok_or(GenerationError::EmptyResponse)
    }
}

fn service(generator: Arc<Canned>) -> AnalysisService {
    let generator: Arc<dyn TextGenerator> = generator;
    AnalysisService::new(Some(generator), Arc::new(Curriculum::builtin()), 42)
}

const TREE: &str = r#"{"tokens":[
    {"id":1,"word":"Puella","lemma":"puella","pos":"Noun","morphology":"Nom Sg","dependency":"Subject","headId":2,"explanation":"","translation":"girl"},
    {"id":2,"word":"cantat","lemma":"canto","pos":"Verb","morphology":"3 Sg Pres","dependency":"Root","headId":0,"explanation":"","translation":"sings"}
]}"#;

const CYCLE: &str = r#"[
    {"id":1,"word":"Puella","lemma":"puella","pos":"Noun","morphology":"","dependency":"","headId":2,"explanation":"","translation":""},
    {"id":2,"word":"cantat","lemma":"canto","pos":"Verb","morphology":"","dependency":"","headId":1,"explanation":"","translation":""}
]"#;

#[tokio::test]
async fn valid_remote_analysis_is_returned() {
    let generator = Canned::new(Some(TREE), None);
    let tokens = service(Arc::clone(&generator))
        .analyze_text("Puella cantat.")
        .await;
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].head_id, 2);
    assert_eq!(tokens[1].lemma, "canto");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn broken_tree_falls_back_to_offline_analysis() {
    let tokens = service(Canned::new(Some(CYCLE), None))
        .analyze_text("Puella cantat.")
        .await;
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.head_id == 0));
    assert!(tokens[0].explanation.starts_with("Offline mode"));
}

#[tokio::test]
async fn unavailable_generator_falls_back_everywhere() {
    let analysis = service(Canned::new(None, None));

    let tokens = analysis.analyze_text("Puella").await;
    assert_eq!(tokens[0].translation, "girl");

    let quiz = analysis.generate_quiz(Difficulty::Beginner, "nouns").await;
    assert_eq!(quiz.len(), 3);
    assert!(quiz.iter().all(|q| q.is_well_formed()));

    let reply = analysis.tutor_reply(&[], "salve magister").await;
    assert_eq!(reply, "Salve, discipule. (Offline mode)");
}

#[tokio::test]
async fn blank_text_skips_the_generator() {
    let generator = Canned::new(Some(TREE), None);
    let tokens = service(Arc::clone(&generator)).analyze_text("   ").await;
    assert!(tokens.is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quiz_with_unmatched_answer_is_rejected() {
    let bad = r#"{"questions":[{"question":"Q","options":["a","b"],"correctAnswer":"c","explanation":""}]}"#;
    let quiz = service(Canned::new(Some(bad), None))
        .generate_quiz(Difficulty::Advanced, "verbs")
        .await;
    assert_eq!(quiz.len(), 3);
    assert!(quiz.iter().all(|q| q.question != "Q"));

    let good = r#"[{"question":"Q","options":["a","b"],"correctAnswer":"b","explanation":"because"}]"#;
    let quiz = service(Canned::new(Some(good), None))
        .generate_quiz(Difficulty::Advanced, "verbs")
        .await;
    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz[0].correct_answer, "b");
}

#[tokio::test]
async fn tutor_uses_remote_reply_when_present() {
    let analysis = service(Canned::new(None, Some("Bene! Amo means I love.")));
    let history = vec![ChatTurn::user("salve"), ChatTurn::model("Salve!")];
    assert_eq!(
        analysis.tutor_reply(&history, "what is amo?").await,
        "Bene! Amo means I love."
    );

    let blank = service(Canned::new(None, Some("   ")));
    assert_eq!(
        blank.tutor_reply(&[], "thanks").await,
        "You're welcome. Keep studying!"
    );
}

#[tokio::test]
async fn offline_quiz_is_reproducible_per_seed() {
    let course = Arc::new(Curriculum::builtin());
    let a = AnalysisService::offline(Arc::clone(&course), 9);
    let b = AnalysisService::offline(course, 9);
    for _ in 0..3 {
        assert_eq!(
            a.generate_quiz(Difficulty::Intermediate, "any").await,
            b.generate_quiz(Difficulty::Intermediate, "any").await
        );
    }
    assert!(!a.is_online());
}
