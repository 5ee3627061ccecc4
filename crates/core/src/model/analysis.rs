use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── MORPHOLOGY ────────────────────────────────────────────────────────────────
//

/// Per-token morphological and syntactic record.
///
/// `id` is the 1-based position in the sentence; `head_id` points at the
/// governing token, with `0` marking the root of the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphToken {
    pub id: u32,
    pub word: String,
    pub lemma: String,
    pub pos: String,
    pub morphology: String,
    pub dependency: String,
    pub head_id: u32,
    pub explanation: String,
    pub translation: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DependencyTreeError {
    #[error("token at position {position} has id {found}, expected {expected}")]
    NonSequentialId {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("token {id} points at missing head {head}")]
    DanglingHead { id: u32, head: u32 },

    #[error("token {0} is its own head")]
    SelfHead(u32),

    #[error("dependency cycle through token {0}")]
    Cycle(u32),

    #[error("no root token (head 0)")]
    NoRoot,
}

/// Check that `tokens` form a dependency forest rooted at `head_id = 0`.
///
/// Ids must run 1..=n in order. An empty slice is valid.
///
/// # Errors
///
/// Returns the first structural violation found.
pub fn validate_dependency_tree(tokens: &[MorphToken]) -> Result<(), DependencyTreeError> {
    if tokens.is_empty() {
        return Ok(());
    }

    let n = u32::try_from(tokens.len()).unwrap_or(u32::MAX);
    for (position, token) in tokens.iter().enumerate() {
        let expected = u32::try_from(position + 1).unwrap_or(u32::MAX);
        if token.id != expected {
            return Err(DependencyTreeError::NonSequentialId {
                position,
                expected,
                found: token.id,
            });
        }
        if token.head_id == token.id {
            return Err(DependencyTreeError::SelfHead(token.id));
        }
        if token.head_id > n {
            return Err(DependencyTreeError::DanglingHead {
                id: token.id,
                head: token.head_id,
            });
        }
    }

    if !tokens.iter().any(|t| t.head_id == 0) {
        return Err(DependencyTreeError::NoRoot);
    }

    // Ids are sequential, so token `k` lives at index `k - 1`.
    for token in tokens {
        let mut head = token.head_id;
        let mut steps = 0u32;
        while head != 0 {
            steps += 1;
            if steps > n {
                return Err(DependencyTreeError::Cycle(token.id));
            }
            head = tokens[(head - 1) as usize].head_id;
        }
    }

    Ok(())
}

//
// ─── QUIZ / TUTOR ──────────────────────────────────────────────────────────────
//

/// Requested difficulty for generated exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One message in a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Self-assessed recall for a flashcard review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewRating {
    Hard,
    Good,
    Easy,
}

impl ReviewRating {
    /// `Good` and `Easy` count as a successful recall.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, ReviewRating::Good | ReviewRating::Easy)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn token(id: u32, head_id: u32) -> MorphToken {
        MorphToken {
            id,
            word: format!("w{id}"),
            lemma: String::new(),
            pos: String::new(),
            morphology: String::new(),
            dependency: String::new(),
            head_id,
            explanation: String::new(),
            translation: String::new(),
        }
    }

    #[test]
    fn accepts_simple_tree() {
        // Puella rosam amat: amat is root, the nouns hang off it.
        let tokens = vec![token(1, 3), token(2, 3), token(3, 0)];
        assert_eq!(validate_dependency_tree(&tokens), Ok(()));
    }

    #[test]
    fn accepts_flat_offline_output() {
        let tokens = vec![token(1, 0), token(2, 0)];
        assert!(validate_dependency_tree(&tokens).is_ok());
        assert!(validate_dependency_tree(&[]).is_ok());
    }

    #[test]
    fn rejects_out_of_order_ids() {
        let tokens = vec![token(1, 0), token(3, 1)];
        assert_eq!(
            validate_dependency_tree(&tokens),
            Err(DependencyTreeError::NonSequentialId {
                position: 1,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn rejects_dangling_and_self_heads() {
        assert_eq!(
            validate_dependency_tree(&[token(1, 0), token(2, 9)]),
            Err(DependencyTreeError::DanglingHead { id: 2, head: 9 })
        );
        assert_eq!(
            validate_dependency_tree(&[token(1, 1)]),
            Err(DependencyTreeError::SelfHead(1))
        );
    }

    #[test]
    fn rejects_cycles_and_missing_root() {
        assert_eq!(
            validate_dependency_tree(&[token(1, 2), token(2, 1)]),
            Err(DependencyTreeError::NoRoot)
        );
        assert_eq!(
            validate_dependency_tree(&[token(1, 0), token(2, 3), token(3, 2)]),
            Err(DependencyTreeError::Cycle(2))
        );
    }

    #[test]
    fn parses_camel_case_payload() {
        let json = r#"{"id":1,"word":"Puella","lemma":"puella","pos":"Noun","morphology":"Nom Sg",
                      "dependency":"Subject","headId":0,"explanation":"","translation":"girl"}"#;
        let t: MorphToken = serde_json::from_str(json).unwrap();
        assert_eq!(t.head_id, 0);
    }

    #[test]
    fn rating_success_mapping() {
        assert!(!ReviewRating::Hard.is_success());
        assert!(ReviewRating::Good.is_success());
        assert!(ReviewRating::Easy.is_success());
    }
}
