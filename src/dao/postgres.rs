use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{Dao, Result};
use crate::admin::ChangeListQuery;
use crate::models::{Choice, InsertableChoice, InsertableQuestion, Question};

const QUESTION_COLUMNS: &str = "id, question_text AS text, pub_date AS publish_time";
const CHOICE_COLUMNS: &str = "id, question_id, choice_text AS text, votes AS vote_count";

/**
 * Escape the LIKE metacharacters so a search term only ever matches literally
 */
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Clone, Debug)]
pub struct PgDao {
    pool: PgPool,
}

impl PgDao {
    /**
     * Create the sqlx connection pool for postgresql
     */
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /**
     * Apply the embedded migrations under `migrations/`
     */
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl Dao for PgDao {
    async fn published_questions(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>> {
        let sql = format!(
            "SELECT {} FROM questions WHERE pub_date <= $1 ORDER BY pub_date DESC, id DESC LIMIT $2",
            QUESTION_COLUMNS
        );
        sqlx::query_as::<_, Question>(&sql)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    async fn question(&self, id: i32) -> Result<Option<Question>> {
        let sql = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);
        sqlx::query_as::<_, Question>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn choices(&self, question_id: i32) -> Result<Vec<Choice>> {
        let sql = format!(
            "SELECT {} FROM choices WHERE question_id = $1 ORDER BY id ASC",
            CHOICE_COLUMNS
        );
        sqlx::query_as::<_, Choice>(&sql)
            .bind(question_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn create_question(
        &self,
        question: &InsertableQuestion,
        choices: &[InsertableChoice],
    ) -> Result<(Question, Vec<Choice>)> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO questions (question_text, pub_date) VALUES ($1, $2) RETURNING {}",
            QUESTION_COLUMNS
        );
        let created = sqlx::query_as::<_, Question>(&sql)
            .bind(&question.text)
            .bind(question.publish_time)
            .fetch_one(&mut tx)
            .await?;

        let sql = format!(
            "INSERT INTO choices (question_id, choice_text, votes) VALUES ($1, $2, $3) RETURNING {}",
            CHOICE_COLUMNS
        );
        let mut inserted = Vec::with_capacity(choices.len());
        for choice in choices.iter() {
            let row = sqlx::query_as::<_, Choice>(&sql)
                .bind(created.id)
                .bind(&choice.text)
                .bind(choice.vote_count)
                .fetch_one(&mut tx)
                .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        debug!("inserted: {:?} with {} choices", created, inserted.len());
        Ok((created, inserted))
    }

    async fn create_choice(&self, question_id: i32, choice: &InsertableChoice) -> Result<Option<Choice>> {
        let sql = format!(
            "INSERT INTO choices (question_id, choice_text, votes)
                SELECT $1, $2, $3 WHERE EXISTS (SELECT 1 FROM questions WHERE id = $1)
                RETURNING {}",
            CHOICE_COLUMNS
        );
        sqlx::query_as::<_, Choice>(&sql)
            .bind(question_id)
            .bind(&choice.text)
            .bind(choice.vote_count)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_question(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn change_list(&self, query: &ChangeListQuery, now: DateTime<Utc>) -> Result<Vec<Question>> {
        let (start, end) = match query.pub_date.bounds(now) {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        let sql = format!(
            "SELECT {} FROM questions
                WHERE ($1::timestamptz IS NULL OR pub_date >= $1)
                  AND ($2::timestamptz IS NULL OR pub_date < $2)
                  AND ($3::text IS NULL OR question_text ILIKE $3)
                ORDER BY id DESC",
            QUESTION_COLUMNS
        );
        sqlx::query_as::<_, Question>(&sql)
            .bind(start)
            .bind(end)
            .bind(query.search().map(like_pattern))
            .fetch_all(&self.pool)
            .await
    }
}
