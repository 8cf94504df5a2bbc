use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::SqlitePool;

use crate::db::queries::questions::{get_all_questions, get_questions_for_category};
use crate::db::Question;

/// The candidate set a quiz question is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPool {
    All,
    Category { id: i64, excluding: HashSet<i64> },
}

impl QuizPool {
    /// Category `0` with a type means "all categories" and does not exclude
    /// previously asked questions. A null `previous` also falls back to every question.
    pub fn select(category_id: i64, has_type: bool, previous: Option<&[i64]>) -> Self {
        match previous {
            _ if category_id == 0 && has_type => QuizPool::All,
            Some(previous) => QuizPool::Category {
                id: category_id,
                excluding: previous.iter().copied().collect(),
            },
            None => QuizPool::All,
        }
    }

    pub async fn candidates(&self, pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
        match self {
            QuizPool::All => get_all_questions(pool).await,
            QuizPool::Category { id, excluding } => {
                let mut questions = get_questions_for_category(pool, *id).await?;
                questions.retain(|q| !excluding.contains(&q.id));
                Ok(questions)
            }
        }
    }
}

/// Uniformly random pick; `None` once the pool is exhausted.
pub fn pick<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}
