use async_std::sync::RwLock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Dao, Result};
use crate::admin::{matches_search, ChangeListQuery};
use crate::models::{Choice, InsertableChoice, InsertableQuestion, Question};

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    choices: Vec<Choice>,
    next_question_id: i32,
    next_choice_id: i32,
}

impl Tables {
    fn insert_choice(&mut self, question_id: i32, choice: &InsertableChoice) -> Choice {
        self.next_choice_id += 1;
        let choice = Choice {
            id: self.next_choice_id,
            question_id,
            text: choice.text.clone(),
            vote_count: choice.vote_count,
        };
        self.choices.push(choice.clone());
        choice
    }
}

/**
 * Process-local store, used by the tests and when no DATABASE_URL is configured
 */
#[derive(Debug, Default)]
pub struct MemoryDao {
    tables: RwLock<Tables>,
}

impl MemoryDao {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Dao for MemoryDao {
    async fn published_questions(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| q.is_published(now))
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.publish_time.cmp(&a.publish_time).then(b.id.cmp(&a.id)));
        questions.truncate(limit.max(0) as usize);
        Ok(questions)
    }

    async fn question(&self, id: i32) -> Result<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn choices(&self, question_id: i32) -> Result<Vec<Choice>> {
        let tables = self.tables.read().await;
        Ok(tables
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn create_question(
        &self,
        question: &InsertableQuestion,
        choices: &[InsertableChoice],
    ) -> Result<(Question, Vec<Choice>)> {
        let mut tables = self.tables.write().await;
        tables.next_question_id += 1;
        let question = Question {
            id: tables.next_question_id,
            text: question.text.clone(),
            publish_time: question.publish_time,
        };
        tables.questions.push(question.clone());

        let choices = choices
            .iter()
            .map(|choice| tables.insert_choice(question.id, choice))
            .collect();
        Ok((question, choices))
    }

    async fn create_choice(&self, question_id: i32, choice: &InsertableChoice) -> Result<Option<Choice>> {
        let mut tables = self.tables.write().await;
        if !tables.questions.iter().any(|q| q.id == question_id) {
            return Ok(None);
        }
        Ok(Some(tables.insert_choice(question_id, choice)))
    }

    async fn delete_question(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        if tables.questions.len() == before {
            return Ok(false);
        }
        tables.choices.retain(|c| c.question_id != id);
        Ok(true)
    }

    async fn change_list(&self, query: &ChangeListQuery, now: DateTime<Utc>) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        let bounds = query.pub_date.bounds(now);
        let mut questions: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| match bounds {
                Some((start, end)) => start <= q.publish_time && q.publish_time < end,
                None => true,
            })
            .filter(|q| query.search().map_or(true, |term| matches_search(q, term)))
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(questions)
    }
}
