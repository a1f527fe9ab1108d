//! The routes module contains all the tide routes and the logic to fulfill the responses for each
//! route.
//!
//! Modules are nested for cleaner organization here
use tide::http::mime;
use tide::{Request, Response, StatusCode};

use crate::models::Question;
use crate::AppState;

pub mod admin;
pub mod polls;

/**
 * Read the numeric `:id` route parameter
 *
 * Anything that is not a number cannot name a question, so it is reported as
 * not found rather than as a bad request.
 */
pub(crate) fn question_id(req: &Request<AppState>) -> tide::Result<i32> {
    req.param::<i32>("id").map_err(|_| not_found())
}

pub(crate) fn not_found() -> tide::Error {
    tide::Error::from_str(StatusCode::NotFound, "No Question matches the given query.")
}

/**
 * Fetch the question named by the request, failing with a 404 when it does not exist
 */
pub(crate) async fn requested_question(req: &Request<AppState>) -> tide::Result<Question> {
    let id = question_id(req)?;
    match req.state().dao.question(id).await? {
        Some(question) => Ok(question),
        None => Err(not_found()),
    }
}

pub(crate) fn html(body: String) -> Response {
    Response::builder(StatusCode::Ok)
        .body(body)
        .content_type(mime::HTML)
        .build()
}
