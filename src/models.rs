use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::visibility;

/**
 * Longest text accepted for either a question or a choice
 */
pub const MAX_TEXT_LENGTH: usize = 200;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Question {
    pub id: i32,
    #[serde(rename = "question_text")]
    pub text: String,
    #[serde(rename = "pub_date")]
    pub publish_time: DateTime<Utc>,
}

impl Question {
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        visibility::is_published(self.publish_time, now)
    }

    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        visibility::is_recent(self.publish_time, now)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct InsertableQuestion {
    #[serde(rename = "question_text")]
    pub text: String,
    #[serde(rename = "pub_date")]
    pub publish_time: DateTime<Utc>,
}

impl InsertableQuestion {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("question_text", &self.text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    #[serde(rename = "choice_text")]
    pub text: String,
    #[serde(rename = "votes")]
    pub vote_count: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InsertableChoice {
    #[serde(rename = "choice_text")]
    pub text: String,
    #[serde(rename = "votes", default)]
    pub vote_count: i32,
}

impl InsertableChoice {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("choice_text", &self.text)?;
        if self.vote_count < 0 {
            return Err(ValidationError::new("votes", "must not be negative"));
        }
        Ok(())
    }
}

fn validate_text(field: &'static str, text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::new(field, "must not be blank"))
    } else if text.chars().count() > MAX_TEXT_LENGTH {
        Err(ValidationError::new(field, "is longer than 200 characters"))
    } else {
        Ok(())
    }
}

/**
 * Raised when user-provided model data would not fit the schema
 */
#[derive(Debug, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
