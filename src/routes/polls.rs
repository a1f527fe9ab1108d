use chrono::Utc;
use log::*;
use serde_json::json;
use tide::Request;

use super::{html, not_found, requested_question};
use crate::api_models::VoteForm;
use crate::models::Question;
use crate::templates::render_page;
use crate::AppState;

/**
 * How many questions the index page shows
 */
pub const LATEST_LIMIT: i64 = 5;

/**
 * Like `requested_question` but treats unpublished questions as missing
 */
async fn visible_question(req: &Request<AppState>) -> tide::Result<Question> {
    let question = requested_question(req).await?;
    if question.is_published(Utc::now()) {
        Ok(question)
    } else {
        debug!("Question {} is not published yet", question.id);
        Err(not_found())
    }
}

/**
 *  GET /polls
 */
pub async fn index(req: Request<AppState>) -> tide::Result {
    let questions = req
        .state()
        .dao
        .published_questions(Utc::now(), LATEST_LIMIT)
        .await?;
    let body = render_page(
        &req.state().templates,
        "index",
        "Polls",
        &json!({ "latest_question_list": questions }),
    )?;
    Ok(html(body))
}

/**
 *  GET /polls/:id
 */
pub async fn detail(req: Request<AppState>) -> tide::Result {
    let question = visible_question(&req).await?;
    let choices = req.state().dao.choices(question.id).await?;
    let body = render_page(
        &req.state().templates,
        "detail",
        &question.text,
        &json!({ "question": question, "choices": choices }),
    )?;
    Ok(html(body))
}

/**
 *  GET /polls/:id/results
 */
pub async fn results(req: Request<AppState>) -> tide::Result {
    let question = visible_question(&req).await?;
    let choices = req.state().dao.choices(question.id).await?;
    let body = render_page(
        &req.state().templates,
        "results",
        &question.text,
        &json!({ "question": question, "choices": choices }),
    )?;
    Ok(html(body))
}

/**
 *  POST /polls/:id/vote
 *
 * Only acknowledges the ballot, no tally is changed
 */
pub async fn vote(mut req: Request<AppState>) -> tide::Result {
    let question = visible_question(&req).await?;
    let raw = req.body_string().await?;
    let form: VoteForm = serde_qs::from_str(&raw).unwrap_or_else(|err| {
        warn!("Ignoring unreadable ballot for question {}: {}", question.id, err);
        VoteForm::default()
    });

    let mut body = format!("<p>You're voting on question {}.</p>", question.id);
    if let Some(choice_id) = form.choice {
        let choices = req.state().dao.choices(question.id).await?;
        match choices.iter().find(|c| c.id == choice_id) {
            Some(choice) => {
                info!("Ballot received for question {}: {:?}", question.id, choice);
                body.push_str(&format!(
                    "<p>You selected: {}</p>",
                    html_escape::encode_text(&choice.text)
                ));
            }
            None => warn!("Choice {} does not belong to question {}", choice_id, question.id),
        }
    }
    Ok(html(body))
}
