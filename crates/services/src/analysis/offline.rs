//! Local approximations used when no generator is available.

use latin_core::model::{Curriculum, Difficulty, Flashcard, MorphToken, QuizQuestion};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

const OFFLINE_QUIZ_LEN: usize = 3;
const PARTS_OF_SPEECH: [&str; 4] = ["Verb", "Noun", "Adjective", "Adverb"];

/// Suffix-based morphology for each word of `text`.
///
/// Every token is a root (`head_id = 0`): no dependency structure is guessed.
#[must_use]
pub fn analyze_offline(text: &str, curriculum: &Curriculum) -> Vec<MorphToken> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ';' | '?' | '!'))
        .collect();

    cleaned
        .split_whitespace()
        .zip(1u32..)
        .map(|(word, id)| analyze_word(id, word, curriculum))
        .collect()
}

fn analyze_word(id: u32, word: &str, curriculum: &Curriculum) -> MorphToken {
    let lower = word.to_lowercase();
    let known = curriculum.flashcards().iter().find(|card| {
        let stem = stem(&card.latin);
        !stem.is_empty() && lower.starts_with(stem)
    });

    let (pos, morphology, dependency) = if lower.ends_with('a') {
        ("Noun", "Nom Sg Fem / Abl Sg Fem", "Subject / Adverbial")
    } else if ["am", "um", "em"].iter().any(|s| lower.ends_with(s)) {
        ("Noun", "Acc Sg", "Direct object")
    } else if lower.ends_with("ae") || lower.ends_with('i') {
        ("Noun", "Gen Sg / Nom Pl", "Possession / Plural subject")
    } else if lower.ends_with('o') || lower.ends_with("is") {
        ("Unknown", "Dat/Abl", "Indirect object")
    } else if lower.ends_with('t') || lower.ends_with("mus") {
        ("Verb", "Present indicative", "Predicate head")
    } else {
        ("Unknown", "N/A", "N/A")
    };

    MorphToken {
        id,
        word: word.to_string(),
        lemma: known.map_or_else(|| word.to_string(), |card| card.latin.clone()),
        pos: known.map_or_else(|| pos.to_string(), |card| card.part_of_speech.clone()),
        morphology: morphology.to_string(),
        dependency: dependency.to_string(),
        head_id: 0,
        explanation: "Offline mode: analysis based on word endings.".to_string(),
        translation: known.map_or_else(
            || "No translation available".to_string(),
            |card| card.translation.clone(),
        ),
    }
}

/// Dictionary form minus its final character.
fn stem(latin: &str) -> &str {
    latin
        .char_indices()
        .last()
        .map_or("", |(idx, _)| &latin[..idx])
}

/// Three vocabulary questions drawn from the catalog.
///
/// Beginner quizzes only use difficulty-1 cards when the catalog has any.
pub fn quiz_offline<R: Rng + ?Sized>(
    rng: &mut R,
    curriculum: &Curriculum,
    difficulty: Difficulty,
) -> Vec<QuizQuestion> {
    let all: Vec<&Flashcard> = curriculum.flashcards().iter().collect();
    let easy: Vec<&Flashcard> = all.iter().copied().filter(|c| c.difficulty <= 1).collect();
    let pool = if difficulty == Difficulty::Beginner && !easy.is_empty() {
        easy
    } else {
        all
    };

    let mut questions = Vec::with_capacity(OFFLINE_QUIZ_LEN);
    for _ in 0..OFFLINE_QUIZ_LEN {
        let Some(target) = pool.choose(rng).copied() else {
            break;
        };
        let question = if rng.random_bool(0.5) {
            translation_question(rng, target, &pool)
        } else {
            part_of_speech_question(rng, target)
        };
        questions.push(question);
    }
    questions
}

fn translation_question<R: Rng + ?Sized>(
    rng: &mut R,
    target: &Flashcard,
    pool: &[&Flashcard],
) -> QuizQuestion {
    let correct = target.translation.clone();
    let mut distractors: Vec<&str> = Vec::new();
    for card in pool {
        let t = card.translation.as_str();
        if card.id != target.id && t != correct && !distractors.contains(&t) {
            distractors.push(t);
        }
    }
    distractors.shuffle(rng);
    distractors.truncate(3);

    let mut options = vec![correct.clone()];
    options.extend(distractors.into_iter().map(str::to_string));
    options.shuffle(rng);

    QuizQuestion {
        question: format!("What does \"{}\" mean?", target.latin),
        options,
        explanation: format!(
            "\"{}\" is a {} meaning \"{correct}\".",
            target.latin, target.part_of_speech
        ),
        correct_answer: correct,
    }
}

fn part_of_speech_question<R: Rng + ?Sized>(rng: &mut R, target: &Flashcard) -> QuizQuestion {
    let correct = target.part_of_speech.clone();
    let mut options = vec![correct.clone()];
    options.extend(
        PARTS_OF_SPEECH
            .iter()
            .filter(|p| !correct.contains(*p))
            .take(3)
            .map(|p| (*p).to_string()),
    );
    options.shuffle(rng);

    QuizQuestion {
        question: format!("Which part of speech is \"{}\"?", target.latin),
        options,
        explanation: format!("It is classified as {correct}."),
        correct_answer: correct,
    }
}

/// Canned tutor: vocabulary lookup by whole word, plus greetings.
#[must_use]
pub fn tutor_offline(message: &str, curriculum: &Curriculum) -> String {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let cards = curriculum.flashcards();
    let hit = cards
        .iter()
        .find(|card| contains_phrase(&words, &card.latin))
        .or_else(|| {
            cards
                .iter()
                .find(|card| contains_phrase(&words, &card.translation))
        });
    if let Some(card) = hit {
        return format!(
            "From your book: \"{}\" means \"{}\" ({}).",
            card.latin, card.translation, card.part_of_speech
        );
    }

    if words
        .iter()
        .any(|w| matches!(*w, "salve" | "hello" | "hi" | "hola"))
    {
        return "Salve, discipule. (Offline mode)".to_string();
    }
    if words
        .iter()
        .any(|w| matches!(*w, "thanks" | "thank" | "gratias" | "gracias"))
    {
        return "You're welcome. Keep studying!".to_string();
    }

    "Offline mode: I can only translate words that are already in your vocabulary. \
     Try writing a Latin word."
        .to_string()
}

fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let phrase = phrase.to_lowercase();
    let needle: Vec<&str> = phrase
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    !needle.is_empty() && words.windows(needle.len()).any(|w| w == needle.as_slice())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use latin_core::model::validate_dependency_tree;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn analyzer_applies_suffix_rules_and_vocab() {
        let course = Curriculum::builtin();
        let tokens = analyze_offline("Puella rosam amat.", &course);
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(tokens.iter().all(|t| t.head_id == 0));

        assert_eq!(tokens[0].lemma, "puella");
        assert_eq!(tokens[0].translation, "girl");
        assert_eq!(tokens[0].pos, "Noun (1st)");
        assert_eq!(tokens[1].morphology, "Acc Sg");
        assert_eq!(tokens[1].translation, "No translation available");
        assert_eq!(tokens[2].pos, "Verb");
        assert_eq!(tokens[2].dependency, "Predicate head");

        assert!(validate_dependency_tree(&tokens).is_ok());
    }

    #[test]
    fn analyzer_ignores_punctuation_and_blank_text() {
        let course = Curriculum::builtin();
        assert!(analyze_offline("  ?! ", &course).is_empty());
        let tokens = analyze_offline("Servi, domino!", &course);
        assert_eq!(tokens[0].word, "Servi");
        assert_eq!(tokens[0].morphology, "Gen Sg / Nom Pl");
        assert_eq!(tokens[1].morphology, "Dat/Abl");
    }

    #[test]
    fn quiz_is_deterministic_per_seed_and_well_formed() {
        let course = Curriculum::builtin();
        let a = quiz_offline(
            &mut StdRng::seed_from_u64(7),
            &course,
            Difficulty::Intermediate,
        );
        let b = quiz_offline(
            &mut StdRng::seed_from_u64(7),
            &course,
            Difficulty::Intermediate,
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        for q in &a {
            assert!(q.is_well_formed(), "{q:?}");
            let mut options = q.options.clone();
            options.sort();
            options.dedup();
            assert_eq!(options.len(), q.options.len());
        }
    }

    #[test]
    fn beginner_quiz_uses_easy_cards_only() {
        let course = Curriculum::builtin();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            for q in quiz_offline(&mut rng, &course, Difficulty::Beginner) {
                let card = course
                    .flashcards()
                    .iter()
                    .find(|c| q.question.contains(&format!("\"{}\"", c.latin)))
                    .unwrap();
                assert_eq!(card.difficulty, 1);
            }
        }
    }

    #[test]
    fn tutor_matches_whole_words_only() {
        let course = Curriculum::builtin();
        assert_eq!(
            tutor_offline("What does puella mean?", &course),
            "From your book: \"puella\" means \"girl\" (Noun (1st))."
        );
        // "this" must not match the translation "is".
        assert_eq!(
            tutor_offline("Salve! Explain this", &course),
            "Salve, discipule. (Offline mode)"
        );
        assert_eq!(
            tutor_offline("thanks", &course),
            "You're welcome. Keep studying!"
        );
        assert!(tutor_offline("xyz", &course).starts_with("Offline mode"));
    }
}
