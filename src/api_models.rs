use serde::{Deserialize, Serialize};

/**
 * A question with its choices, as the admin sees it
 */
#[derive(Debug, Serialize)]
pub struct Question {
    pub question: crate::models::Question,
    pub was_published_recently: bool,
    pub choices: Vec<crate::models::Choice>,
}

/**
 * User-provided details to create a Question
 */
#[derive(Debug, Deserialize)]
pub struct InsertableQuestion {
    pub question: crate::models::InsertableQuestion,
    /**
     * Inline choices created alongside the question
     */
    #[serde(default)]
    pub choices: Vec<crate::models::InsertableChoice>,
}

/**
 * The admin changelist
 */
#[derive(Debug, Serialize)]
pub struct ChangeList {
    pub count: usize,
    pub results: Vec<crate::admin::ChangeListRow>,
}

/**
 * Form posted from the detail page
 */
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub choice: Option<i32>,
}
