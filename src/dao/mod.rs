//! The dao module contains the storage seam for questions and choices.
//!
//! Handlers only ever see `dyn Dao`, so the PostgreSQL pool and the in-memory
//! store are interchangeable.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::admin::ChangeListQuery;
use crate::models::{Choice, InsertableChoice, InsertableQuestion, Question};

pub mod memory;
pub mod postgres;

pub use memory::MemoryDao;
pub use postgres::PgDao;

pub type Result<T> = std::result::Result<T, sqlx::Error>;

#[async_trait]
pub trait Dao: Send + Sync {
    /**
     * Questions published as of `now`, newest first, at most `limit` of them
     */
    async fn published_questions(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>>;

    async fn question(&self, id: i32) -> Result<Option<Question>>;

    /**
     * Choices for the question in the order they were created
     */
    async fn choices(&self, question_id: i32) -> Result<Vec<Choice>>;

    /**
     * Insert the question along with its inline choices, all or nothing
     */
    async fn create_question(
        &self,
        question: &InsertableQuestion,
        choices: &[InsertableChoice],
    ) -> Result<(Question, Vec<Choice>)>;

    /**
     * Returns `None` when the question does not exist
     */
    async fn create_choice(&self, question_id: i32, choice: &InsertableChoice) -> Result<Option<Choice>>;

    /**
     * Delete the question and its choices, returning whether anything was removed
     */
    async fn delete_question(&self, id: i32) -> Result<bool>;

    /**
     * Admin changelist: every question regardless of publish state, newest id first
     */
    async fn change_list(&self, query: &ChangeListQuery, now: DateTime<Utc>) -> Result<Vec<Question>>;
}
