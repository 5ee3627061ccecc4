//! `latin`: command-line front end for the Latin course tracker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use latin_core::model::{
    Curriculum, CurriculumDraft, Difficulty, FlashcardId, LessonId, ReadingId, ReviewRating,
};
use serde::Serialize;
use services::{AppServices, Clock, ServicesConfig};
use storage::repository::DEFAULT_PROGRESS_KEY;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "latin")]
#[command(about = "Track progress through the Latin course")]
#[command(version)]
struct Cli {
    /// SQLite database holding the progress record
    #[arg(long, env = "LATIN_DB_URL", default_value = "sqlite://latin.sqlite3")]
    db: String,

    /// Storage key of the progress record
    #[arg(long, env = "LATIN_PROGRESS_KEY", default_value = DEFAULT_PROGRESS_KEY)]
    key: String,

    /// JSON course catalog replacing the bundled one
    #[arg(long, env = "LATIN_CATALOG")]
    catalog: Option<PathBuf>,

    /// Seed for offline quizzes; defaults to the current time
    #[arg(long, env = "LATIN_QUIZ_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whole progress record
    Progress,
    /// Stage status of a lesson (current lesson by default)
    Status {
        #[arg(long)]
        lesson: Option<LessonId>,
    },
    /// Next recommended step
    Next,
    /// Course map
    Map,
    /// Flashcards of the current lesson
    Deck,
    /// Mark a lesson's grammar as read
    CompleteLesson { lesson: LessonId },
    /// Record a flashcard review
    #[command(group(ArgGroup::new("outcome").required(true).args(["success", "fail", "rating"])))]
    Review {
        word: FlashcardId,
        #[arg(long)]
        success: bool,
        #[arg(long)]
        fail: bool,
        #[arg(long, value_enum)]
        rating: Option<RatingArg>,
    },
    /// Record an exercise session
    Exercise { lesson: LessonId, score: u32 },
    /// Mark a reading as completed
    Read { reading: ReadingId },
    /// Record a passed challenge without grading
    Pass { lesson: LessonId },
    /// Grade answers to a lesson challenge, in question order
    Challenge {
        lesson: LessonId,
        answers: Vec<String>,
    },
    /// Rebuild the record from the event log
    Rebuild,
    /// Morphological analysis of a Latin sentence
    Analyze {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Generate a multiple-choice quiz
    Quiz {
        topic: String,
        #[arg(long, value_enum, default_value_t = DifficultyArg::Beginner)]
        difficulty: DifficultyArg,
    },
    /// Ask the tutor
    Tutor {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RatingArg {
    Hard,
    Good,
    Easy,
}

impl From<RatingArg> for ReviewRating {
    fn from(value: RatingArg) -> Self {
        match value {
            RatingArg::Hard => ReviewRating::Hard,
            RatingArg::Good => ReviewRating::Good,
            RatingArg::Easy => ReviewRating::Easy,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DifficultyArg {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Beginner => Difficulty::Beginner,
            DifficultyArg::Intermediate => Difficulty::Intermediate,
            DifficultyArg::Advanced => Difficulty::Advanced,
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Curriculum> {
    let Some(path) = path else {
        return Ok(Curriculum::builtin());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let draft: CurriculumDraft = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    let curriculum = draft.validate().context("invalid catalog")?;
    info!(path = %path.display(), lessons = curriculum.lessons().len(), "loaded catalog");
    Ok(curriculum)
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite://") || is_memory_url(trimmed) {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}

/// sqlx does not create missing database files by default.
fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn time_seed(clock: Clock) -> u64 {
    u64::try_from(clock.now().timestamp()).unwrap_or_default()
}

async fn run(cli: Cli) -> Result<()> {
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;

    let clock = Clock::default();
    let config = ServicesConfig {
        progress_key: cli.key,
        curriculum: Arc::new(load_catalog(cli.catalog.as_deref())?),
        quiz_seed: cli.seed.unwrap_or_else(|| time_seed(clock)),
        ..ServicesConfig::from_env()
    };
    let services = AppServices::new_sqlite(&db_url, clock, config)
        .await
        .with_context(|| format!("failed to open {db_url}"))?;
    let tracker = services.tracker();
    let analysis = services.analysis();

    match cli.command {
        Command::Progress => print_json(&tracker.get_progress().await?)?,
        Command::Status { lesson } => {
            let lesson = match lesson {
                Some(lesson) => lesson,
                None => tracker.get_progress().await?.current_lesson(),
            };
            print_json(&tracker.lesson_status(lesson).await?)?;
        }
        Command::Next => {
            let recommendations = tracker.recommendations().await?;
            if recommendations.is_empty() {
                println!("Lesson complete. Nothing left to do here.");
            }
            for rec in recommendations {
                println!("{}", rec.message);
            }
        }
        Command::Map => print_json(&tracker.lesson_map().await?)?,
        Command::Deck => print_json(&tracker.study_deck().await?)?,
        Command::CompleteLesson { lesson } => {
            print_json(&tracker.complete_lesson(lesson).await?)?;
        }
        Command::Review {
            word,
            success,
            fail: _,
            rating,
        } => {
            let progress = match rating {
                Some(rating) => tracker.review_flashcard(word, rating.into()).await?,
                None => tracker.update_vocab_mastery(word, success).await?,
            };
            print_json(&progress)?;
        }
        Command::Exercise { lesson, score } => {
            print_json(&tracker.increment_exercise_count(lesson, score).await?)?;
        }
        Command::Read { reading } => print_json(&tracker.complete_reading(reading).await?)?,
        Command::Pass { lesson } => print_json(&tracker.pass_challenge(lesson).await?)?,
        Command::Challenge { lesson, answers } => {
            let attempt = tracker.attempt_challenge(lesson, answers.as_slice()).await?;
            println!(
                "{}/{} correct: {}",
                attempt.grade.correct,
                attempt.grade.total,
                if attempt.passed() { "passed" } else { "not passed" }
            );
            print_json(&attempt.progress)?;
        }
        Command::Rebuild => print_json(&tracker.rebuild_from_events().await?)?,
        Command::Analyze { text } => print_json(&analysis.analyze_text(&text.join(" ")).await)?,
        Command::Quiz { topic, difficulty } => {
            print_json(&analysis.generate_quiz(difficulty.into(), &topic).await)?;
        }
        Command::Tutor { message } => {
            println!("{}", analysis.tutor_reply(&[], &message.join(" ")).await);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse()).await
}
