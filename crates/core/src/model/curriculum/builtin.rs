//! Bundled course content.
//!
//! Lessons 1-5 carry hand-written vocabulary and readings; the rest of the
//! course uses generated placeholders so every stage is reachable.

use super::{Challenge, Curriculum, Flashcard, Lesson, QuizQuestion, Reading, ReadingQuestion};
use crate::model::ids::{FlashcardId, LessonId, ReadingId};

const LAST_LESSON: u32 = 40;

// (id, title, topic, description, content)
const LESSONS: &[(u32, &str, &str, &str, &str)] = &[
    (
        1,
        "First Declension",
        "Feminine nouns (-a)",
        "Learn how cases work and meet the first declension.",
        "# The First Declension\n\n\
         Latin uses **cases** to mark the function of a word in the sentence.\n\
         The first declension has **-a** in the nominative singular and **-ae** in the genitive singular.\n\n\
         | Case | Singular | Plural | Function |\n\
         |------|----------|--------|----------|\n\
         | Nominative | puell-a | puell-ae | Subject |\n\
         | Genitive | puell-ae | puell-arum | Possession (of) |\n\
         | Dative | puell-ae | puell-is | Indirect object (to/for) |\n\
         | Accusative | puell-am | puell-as | Direct object |\n\
         | Ablative | puell-a | puell-is | Circumstance (with/by) |\n",
    ),
    (
        2,
        "The Verb 'Esse' and the First Conjugation",
        "Verbs in -are",
        "Basic actions and the verb to be.",
        "# First Conjugation Verbs\n\n\
         Infinitive in **-are** (e.g. *amare*).\n\n\
         | Person | Latin | English |\n\
         |---|---|---|\n\
         | 1st sg | am-o | I love |\n\
         | 2nd sg | am-as | you love |\n\
         | 3rd sg | am-at | he/she loves |\n\
         | 1st pl | am-amus | we love |\n\
         | 2nd pl | am-atis | you love |\n\
         | 3rd pl | am-ant | they love |\n\n\
         ## Sum (to be)\n\
         Irregular but essential: *sum, es, est, sumus, estis, sunt*.\n",
    ),
    (
        3,
        "Second Declension (Masculine)",
        "Masculine nouns (-us/-er)",
        "Masters, slaves and fields.",
        "# The Second Declension\n\n\
         Mostly masculine, ending in **-us** or **-er**.\n\n\
         | Case | Singular | Plural |\n\
         |------|----------|--------|\n\
         | Nom | domin-us | domin-i |\n\
         | Gen | domin-i | domin-orum |\n\
         | Dat | domin-o | domin-is |\n\
         | Acc | domin-um | domin-os |\n\
         | Abl | domin-o | domin-is |\n",
    ),
    (
        4,
        "Second Declension (Neuter)",
        "Neuter nouns (-um)",
        "Objects, wars and gifts.",
        "# The Neuter Gender\n\n\
         Golden rule: **nominative and accusative are always identical**. Plurals end in **-a**.\n\n\
         | Case | Singular | Plural |\n\
         |------|----------|--------|\n\
         | Nom | bell-um | bell-a |\n\
         | Acc | bell-um | bell-a |\n\
         | Gen | bell-i | bell-orum |\n",
    ),
    (
        5,
        "First and Second Class Adjectives",
        "Agreement (-us, -a, -um)",
        "Describing the world: good, bad, big, small.",
        "# 2-1-2 Adjectives\n\n\
         Adjectives agree in **gender, number and case** with their noun.\n\n\
         * *Puer bonus* (good boy)\n\
         * *Puella bona* (good girl)\n\
         * *Donum bonum* (good gift)\n",
    ),
    (6, "Second Conjugation", "Verbs in -ēre (moneo)", "Verbs with a long thematic e.", "# Second Conjugation\n\nInfinitive in **-ēre**: *moneo, mones, monet*."),
    (7, "Third Declension (Consonant Stems)", "Rex, miles, corpus", "The largest and most varied declension.", "# Third Declension\n\nGenitive in **-is**: *rex, regis*."),
    (8, "Third Conjugation", "Verbs in -ere (rego)", "The short conjugation.", "# Third Conjugation\n\nInfinitive in **-ĕre**: *rego, regis, regit*."),
    (9, "Third Declension (i-Stems)", "Civis, mare, urbs", "Special rules for some nouns.", "# i-Stems\n\nGenitive plural in **-ium**; neuter nominative plural in **-ia**."),
    (10, "Fourth Conjugation", "Verbs in -ire (audio)", "Verbs with a thematic i.", "# Fourth Conjugation\n\nInfinitive in **-ire**: *audio, audis, audit*."),
    (11, "The Imperfect", "-bam, -bas, -bat", "Ongoing actions in the past.", "# Imperfect Indicative\n\nFormed with the infix **-ba-**: *amabam, videbam*."),
    (12, "The Future (1st/2nd)", "-bo, -bis, -bit", "Future for the first two conjugations.", "# Future, type 1\n\n**-bo, -bis, -bit**: *amabo*."),
    (13, "The Future (3rd/4th)", "-am, -es, -et", "Future for the last two conjugations.", "# Future, type 2\n\n**-am, -es, -et**: *regam, reges*."),
    (14, "The Perfect Active", "-i, -isti, -it", "Completed actions.", "# Perfect\n\nEndings **-i, -isti, -it, -imus, -istis, -erunt**."),
    (15, "Personal Pronouns", "Ego, tu, nos, vos", "I, you, we and their cases.", "# Pronouns\n\n*ego, mei, mihi, me, me*."),
    (16, "Third Declension Adjectives", "Omnis, ingens, felix", "Adjectives following the third declension.", "# Third Declension Adjectives\n\nThey follow the i-stem pattern."),
    (17, "Demonstratives I", "Hic, haec, hoc", "This, this, this.", "# Hic, haec, hoc\n\nPoint to what is near the speaker."),
    (18, "Demonstratives II", "Ille, illa, illud", "That, that, that.", "# Ille, illa, illud\n\nPoint to what is far away."),
    (19, "Fourth Declension", "Nouns in -us (manus)", "The u declension.", "# Fourth Declension\n\nGenitive in **-us**: *manus, exercitus*."),
    (20, "Fifth Declension", "Nouns in -es (res)", "The e declension.", "# Fifth Declension\n\nGenitive in **-ei**: *res, dies*."),
    (21, "Passive Voice (Present)", "-r, -ris, -tur", "To be loved, to be seen.", "# Passive Voice\n\nThe subject receives the action: *amor, amaris*."),
    (22, "Passive Voice (Perfect)", "Participle + sum", "I was loved.", "# Perfect Passive\n\nPerfect participle + *sum*: *amatus sum*."),
    (23, "Ablative Absolute", "Syntax", "The most famous Latin construction.", "# Ablative Absolute\n\nNoun + participle in the ablative: *urbe capta, hostes fugerunt*."),
    (24, "Participles", "Present, perfect, future", "Verbs acting as adjectives.", "# Participles\n\n*amans, amatus, amaturus*."),
    (25, "Infinitives", "Forms and uses", "To love, to have loved, to be about to love.", "# Infinitives\n\nActive and passive forms for present, perfect and future."),
    (26, "Indirect Statement", "Accusative + infinitive", "He says that he is coming.", "# Indirect Statement\n\nSubject in the accusative, verb in the infinitive: *dicit se venire*."),
    (27, "Comparatives and Superlatives", "Altior, altissimus", "Taller, tallest.", "# Degrees of Adjectives\n\nComparative **-ior**, superlative **-issimus**."),
    (28, "Present Subjunctive", "Vowel change", "The mood of the unreal.", "# Present Subjunctive\n\n1st: a -> e (*amem*); 2nd: e -> ea (*moneam*)."),
    (29, "Imperfect Subjunctive", "Infinitive + ending", "An easy past subjunctive.", "# Imperfect Subjunctive\n\nFull infinitive + m, s, t: *amarem, amares*."),
    (30, "Purpose Clauses (ut/ne)", "Purpose", "In order that...", "# Purpose Clauses\n\n*Venit ut videat*."),
    (31, "Result Clauses", "Ut + subjunctive", "So... that...", "# Result Clauses\n\n*Tam fessus est ut dormiat*."),
    (32, "Cum Clauses", "Cum + subjunctive", "When / since...", "# Historical Cum\n\nNarrates circumstances in the past."),
    (33, "Indirect Questions", "Quis, quid + subjunctive", "I wonder who he is.", "# Indirect Questions\n\nAlways with a subjunctive verb."),
    (34, "Gerund and Gerundive", "Verbal noun and adjective", "-ndum", "# Gerund\n\nVerbal noun: *ars amandi*."),
    (35, "Deponent Verbs", "Passive form, active meaning", "Sequor, loquor", "# Deponents\n\nLook passive, translate active: *loquor*."),
    (36, "Passive Periphrastic", "Gerundive + sum", "Obligation: Carthago delenda est.", "# Passive Periphrastic\n\n*Hoc faciendum est*."),
    (37, "Conditional Sentences", "Si...", "Real, possible and unreal.", "# Conditionals\n\n*Si hoc facit, errat*."),
    (38, "Advanced Irregular Verbs", "Fero, volo, nolo, malo", "Common verbs with odd forms.", "# Irregulars\n\n*fero, volo*."),
    (39, "The Supine", "-um, -u", "Purpose and respect.", "# Supine\n\n*Mirabile dictu*."),
    (40, "Advanced Reading", "Real literature", "An introduction to Caesar and Cicero.", "# Literature\n\nUnsimplified original texts."),
];

// (id, lesson, latin, translation, part of speech)
const BASE_VOCABULARY: &[(&str, u32, &str, &str, &str)] = &[
    ("l1-1", 1, "puella", "girl", "Noun (1st)"),
    ("l1-2", 1, "roma", "rome", "Noun (1st)"),
    ("l1-3", 1, "via", "road", "Noun (1st)"),
    ("l2-1", 2, "amare", "to love", "Verb (1st)"),
    ("l2-2", 2, "video", "to see", "Verb (2nd)"),
    ("l2-3", 2, "est", "is", "Verb (sum)"),
    ("l3-1", 3, "dominus", "master", "Noun (2nd)"),
    ("l3-2", 3, "servus", "slave", "Noun (2nd)"),
    ("l4-1", 4, "bellum", "war", "Noun (neuter)"),
    ("l4-2", 4, "donum", "gift", "Noun (neuter)"),
    ("l4-3", 4, "templum", "temple", "Noun (neuter)"),
    ("l5-1", 5, "bonus", "good", "Adjective"),
    ("l5-2", 5, "magnus", "big", "Adjective"),
    ("l5-3", 5, "parvus", "small", "Adjective"),
];

// (id, lesson, title, latin, translation, [(question, answer)])
type ReadingRow = (
    &'static str,
    u32,
    &'static str,
    &'static str,
    &'static str,
    [(&'static str, &'static str); 2],
);

const BASE_READINGS: &[ReadingRow] = &[
    (
        "r1",
        1,
        "Roma et Italia",
        "Roma in Italia est. Italia terra est. Via est longa. Puella in via est.",
        "Rome is in Italy. Italy is a land. The road is long. The girl is on the road.",
        [("Where is Rome?", "In Italy"), ("What is the road like?", "Long")],
    ),
    (
        "r2",
        2,
        "Iulia et Aemilia",
        "Iulia puella est. Aemilia femina est. Iulia Aemiliam amat. Aemilia laborat.",
        "Julia is a girl. Aemilia is a woman. Julia loves Aemilia. Aemilia works.",
        [("Who works?", "Aemilia"), ("Whom does Julia love?", "Aemilia")],
    ),
    (
        "r3",
        3,
        "Dominus et Servi",
        "Dominus in horto est. Servi laborant. Dominus servos monet.",
        "The master is in the garden. The slaves work. The master warns the slaves.",
        [("Where is the master?", "In the garden"), ("What do the slaves do?", "They work")],
    ),
    (
        "r4",
        4,
        "Bellum Romanum",
        "Bellum est malum. Romani oppida oppugnant. Templa sunt sacra.",
        "War is bad. The Romans attack the towns. The temples are sacred.",
        [("What is war like?", "Bad"), ("What is sacred?", "The temples")],
    ),
    (
        "r5",
        5,
        "Villa Magna",
        "Villa est magna et pulchra. Hortus est parvus sed bonus.",
        "The villa is big and beautiful. The garden is small but good.",
        [("What is the villa like?", "Big and beautiful"), ("What is the garden like?", "Small")],
    ),
];

fn question(text: &str, options: &[&str], correct: &str, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        question: text.to_string(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct_answer: correct.to_string(),
        explanation: explanation.to_string(),
    }
}

fn lessons() -> Vec<Lesson> {
    LESSONS
        .iter()
        .map(|(id, title, topic, description, content)| Lesson {
            id: LessonId::new(*id),
            title: (*title).to_string(),
            topic: (*topic).to_string(),
            description: (*description).to_string(),
            content: (*content).to_string(),
        })
        .collect()
}

fn flashcards() -> Vec<Flashcard> {
    let mut cards: Vec<Flashcard> = BASE_VOCABULARY
        .iter()
        .map(|(id, lesson, latin, translation, pos)| Flashcard {
            id: FlashcardId::new(*id),
            lesson_id: LessonId::new(*lesson),
            latin: (*latin).to_string(),
            translation: (*translation).to_string(),
            part_of_speech: (*pos).to_string(),
            difficulty: 1,
        })
        .collect();

    for n in 6..=LAST_LESSON {
        for (index, suffix, difficulty) in [(1, "a", 1), (2, "b", 2), (3, "c", 1)] {
            cards.push(Flashcard {
                id: FlashcardId::new(format!("l{n}-{index}")),
                lesson_id: LessonId::new(n),
                latin: format!("exemplum {n}{suffix}"),
                translation: format!("example {n}{suffix}"),
                part_of_speech: "General".to_string(),
                difficulty,
            });
        }
    }
    cards
}

fn readings() -> Vec<Reading> {
    let mut readings: Vec<Reading> = BASE_READINGS
        .iter()
        .map(|(id, lesson, title, content, translation, questions)| Reading {
            id: ReadingId::new(*id),
            lesson_id: LessonId::new(*lesson),
            title: (*title).to_string(),
            content: (*content).to_string(),
            translation: (*translation).to_string(),
            questions: questions
                .iter()
                .map(|(q, a)| ReadingQuestion {
                    question: (*q).to_string(),
                    answer: (*a).to_string(),
                })
                .collect(),
        })
        .collect();

    for n in 6..=LAST_LESSON {
        readings.push(Reading {
            id: ReadingId::new(format!("r{n}")),
            lesson_id: LessonId::new(n),
            title: format!("Lesson {n} Reading"),
            content: format!(
                "Hoc est exemplum lectionis {n}. Latine legere bonum est. Discipuli student."
            ),
            translation: format!(
                "This is an example from lesson {n}. Reading Latin is good. The students study."
            ),
            questions: vec![
                ReadingQuestion {
                    question: "What is good?".to_string(),
                    answer: "Reading Latin".to_string(),
                },
                ReadingQuestion {
                    question: "What do the students do?".to_string(),
                    answer: "They study".to_string(),
                },
            ],
        });
    }
    readings
}

fn challenges() -> Vec<Challenge> {
    let mut challenges = vec![
        Challenge {
            lesson_id: LessonId::new(1),
            title: "Master of the First Declension".to_string(),
            description: "Show that you know the cases and the basic vocabulary.".to_string(),
            questions: vec![
                question(
                    "Which case marks the subject?",
                    &["Nominative", "Accusative", "Dative", "Ablative"],
                    "Nominative",
                    "Subject = nominative.",
                ),
                question(
                    "Translate: 'Puella rosam amat'",
                    &[
                        "The girl loves the rose",
                        "The rose loves the girl",
                        "The girls love the roses",
                    ],
                    "The girl loves the rose",
                    "Puella (nominative) performs the action.",
                ),
                question(
                    "Genitive singular of 'puella'",
                    &["Puellae", "Puella", "Puellam"],
                    "Puellae",
                    "First declension genitive singular is -ae.",
                ),
            ],
        },
        Challenge {
            lesson_id: LessonId::new(2),
            title: "Master of Verbs I".to_string(),
            description: "Master the present tense and 'sum'.".to_string(),
            questions: vec![
                question(
                    "'Laboramus' means...",
                    &["We work", "I work", "They work"],
                    "We work",
                    "-mus is 'we'.",
                ),
                question(
                    "Third person plural of sum",
                    &["Sunt", "Est", "Sumus"],
                    "Sunt",
                    "They are.",
                ),
                question(
                    "First conjugation infinitive",
                    &["-are", "-ere", "-ire"],
                    "-are",
                    "E.g. amare.",
                ),
            ],
        },
    ];

    for n in 3..=LAST_LESSON {
        challenges.push(Challenge {
            lesson_id: LessonId::new(n),
            title: format!("Lesson {n} Challenge"),
            description: "Test what you learned in this lesson.".to_string(),
            questions: (1..=3)
                .map(|i| {
                    question(
                        &format!("Practice question {i}?"),
                        &["Correct", "Incorrect", "False"],
                        "Correct",
                        "Generic explanation.",
                    )
                })
                .collect(),
        });
    }
    challenges
}

pub(super) fn course() -> Curriculum {
    Curriculum {
        lessons: lessons(),
        flashcards: flashcards(),
        readings: readings(),
        challenges: challenges(),
    }
}
