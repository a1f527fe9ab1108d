use chrono::Utc;
use log::*;
use tide::{Body, Request, Response, StatusCode};

use super::{question_id, requested_question};
use crate::admin::{ChangeListQuery, ChangeListRow, QUESTION_ADMIN};
use crate::models::{InsertableChoice, ValidationError};
use crate::AppState;

fn bad_request(err: ValidationError) -> tide::Error {
    tide::Error::from_str(StatusCode::BadRequest, err.to_string())
}

fn json_response(status: StatusCode, body: Body) -> Response {
    Response::builder(status).body(body).build()
}

/**
 *  GET /admin
 */
pub async fn registry(_req: Request<AppState>) -> tide::Result {
    Ok(json_response(StatusCode::Ok, Body::from_json(&QUESTION_ADMIN)?))
}

/**
 *  GET /admin/polls/questions?q=&pub_date=
 */
pub async fn change_list(req: Request<AppState>) -> tide::Result {
    let query: ChangeListQuery = req
        .query()
        .map_err(|err| tide::Error::from_str(StatusCode::BadRequest, err.to_string()))?;
    debug!("Changelist query: {:?}", query);

    let now = Utc::now();
    let results: Vec<ChangeListRow> = req
        .state()
        .dao
        .change_list(&query, now)
        .await?
        .into_iter()
        .map(|question| ChangeListRow::from_question(question, now))
        .collect();

    let response = crate::api_models::ChangeList {
        count: results.len(),
        results,
    };
    Ok(json_response(StatusCode::Ok, Body::from_json(&response)?))
}

/**
 *  PUT /admin/polls/questions
 */
pub async fn create(mut req: Request<AppState>) -> tide::Result {
    let insertable = req
        .body_json::<crate::api_models::InsertableQuestion>()
        .await?;
    insertable.question.validate().map_err(bad_request)?;
    for choice in insertable.choices.iter() {
        choice.validate().map_err(bad_request)?;
    }

    let (question, choices) = req
        .state()
        .dao
        .create_question(&insertable.question, &insertable.choices)
        .await?;
    info!("Created question {} with {} choices", question.id, choices.len());

    let response = crate::api_models::Question {
        was_published_recently: question.was_published_recently(Utc::now()),
        question,
        choices,
    };
    Ok(json_response(StatusCode::Created, Body::from_json(&response)?))
}

/**
 *  GET /admin/polls/questions/:id
 */
pub async fn get(req: Request<AppState>) -> tide::Result {
    let question = requested_question(&req).await?;
    let choices = req.state().dao.choices(question.id).await?;
    let response = crate::api_models::Question {
        was_published_recently: question.was_published_recently(Utc::now()),
        question,
        choices,
    };
    Ok(json_response(StatusCode::Ok, Body::from_json(&response)?))
}

/**
 *  DELETE /admin/polls/questions/:id
 */
pub async fn delete(req: Request<AppState>) -> tide::Result {
    let id = question_id(&req)?;
    if req.state().dao.delete_question(id).await? {
        info!("Deleted question {}", id);
        Ok(Response::new(StatusCode::NoContent))
    } else {
        Err(super::not_found())
    }
}

/**
 *  PUT /admin/polls/questions/:id/choices
 */
pub async fn add_choice(mut req: Request<AppState>) -> tide::Result {
    let id = question_id(&req)?;
    let choice = req.body_json::<InsertableChoice>().await?;
    choice.validate().map_err(bad_request)?;

    match req.state().dao.create_choice(id, &choice).await? {
        Some(choice) => Ok(json_response(StatusCode::Created, Body::from_json(&choice)?)),
        None => Err(super::not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::dao::Dao;
    use serde_json::{json, Value};
    use tide::http::{Body, Method};
    use tide::StatusCode;

    async fn json_body(mut res: tide::http::Response) -> Value {
        res.body_json().await.unwrap()
    }

    #[async_std::test]
    async fn registry_lists_admin_options() {
        let (state, _) = state();
        let res = send(state, request(Method::Get, "/admin")).await;
        assert_eq!(res.status(), StatusCode::Ok);
        let body = json_body(res).await;
        assert_eq!(body["fields"], json!(["pub_date", "question_text"]));
        assert_eq!(body["search_fields"], json!(["question_text"]));
        assert_eq!(body["inlines"][0]["extra"], json!(3));
    }

    #[async_std::test]
    async fn create_with_inline_choices() {
        let (state, dao) = state();
        let mut req = request(Method::Put, "/admin/polls/questions");
        req.set_body(
            Body::from_json(&json!({
                "question": { "question_text": "Cuál es tu curso favorito?", "pub_date": "2021-09-01T10:00:00Z" },
                "choices": [
                    { "choice_text": "Curso Básico de Django" },
                    { "choice_text": "Curso de Rust", "votes": 2 },
                ]
            }))
            .unwrap(),
        );
        let res = send(state, req).await;
        assert_eq!(res.status(), StatusCode::Created);
        let body = json_body(res).await;
        assert_eq!(body["question"]["question_text"], "Cuál es tu curso favorito?");
        assert_eq!(body["was_published_recently"], false);
        assert_eq!(body["choices"][1]["votes"], 2);

        let id = body["question"]["id"].as_i64().unwrap() as i32;
        assert_eq!(dao.choices(id).await.unwrap().len(), 2);
    }

    #[async_std::test]
    async fn create_rejects_blank_text() {
        let (state, dao) = state();
        let mut req = request(Method::Put, "/admin/polls/questions");
        req.set_body(
            Body::from_json(&json!({
                "question": { "question_text": " ", "pub_date": "2021-09-01T10:00:00Z" }
            }))
            .unwrap(),
        );
        let res = send(state, req).await;
        assert_eq!(res.status(), StatusCode::BadRequest);
        assert!(dao.question(1).await.unwrap().is_none());
    }

    #[async_std::test]
    async fn create_rejects_negative_votes() {
        let (state, _) = state();
        let mut req = request(Method::Put, "/admin/polls/questions");
        req.set_body(
            Body::from_json(&json!({
                "question": { "question_text": "Valid", "pub_date": "2021-09-01T10:00:00Z" },
                "choices": [{ "choice_text": "Bad", "votes": -4 }]
            }))
            .unwrap(),
        );
        let res = send(state, req).await;
        assert_eq!(res.status(), StatusCode::BadRequest);
    }

    #[async_std::test]
    async fn admin_sees_unpublished_questions() {
        let (state, dao) = state();
        let question = create_question(&dao, "Future question", 30).await;
        let path = format!("/admin/polls/questions/{}", question.id);
        let res = send(state, request(Method::Get, &path)).await;
        assert_eq!(res.status(), StatusCode::Ok);
        let body = json_body(res).await;
        assert_eq!(body["question"]["question_text"], "Future question");
        assert_eq!(body["was_published_recently"], false);
    }

    #[async_std::test]
    async fn change_list_search_and_filter() {
        let (state, dao) = state();
        create_question(&dao, "Old curso", -400).await;
        create_question(&dao, "New curso", 0).await;
        create_question(&dao, "New other", 0).await;

        let res = send(state.clone(), request(Method::Get, "/admin/polls/questions")).await;
        let body = json_body(res).await;
        assert_eq!(body["count"], 3);
        assert_eq!(body["results"][0]["question_text"], "New other");
        assert_eq!(body["results"][0]["was_published_recently"], true);

        let res = send(
            state.clone(),
            request(Method::Get, "/admin/polls/questions?q=CURSO&pub_date=this_year"),
        )
        .await;
        let body = json_body(res).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["question_text"], "New curso");

        let res = send(state, request(Method::Get, "/admin/polls/questions?pub_date=someday")).await;
        assert_eq!(res.status(), StatusCode::BadRequest);
    }

    #[async_std::test]
    async fn delete_cascades() {
        let (state, dao) = state();
        let question = create_question(&dao, "Doomed", -1).await;
        create_choice(&dao, question.id, "Gone", 0).await;

        let path = format!("/admin/polls/questions/{}", question.id);
        let res = send(state.clone(), request(Method::Delete, &path)).await;
        assert_eq!(res.status(), StatusCode::NoContent);
        assert!(dao.choices(question.id).await.unwrap().is_empty());

        let res = send(state, request(Method::Delete, &path)).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }

    #[async_std::test]
    async fn add_inline_choice() {
        let (state, dao) = state();
        let question = create_question(&dao, "Favourite?", -1).await;

        let path = format!("/admin/polls/questions/{}/choices", question.id);
        let mut req = request(Method::Put, &path);
        req.set_body(Body::from_json(&json!({ "choice_text": "Rust" })).unwrap());
        let res = send(state.clone(), req).await;
        assert_eq!(res.status(), StatusCode::Created);
        assert_eq!(json_body(res).await["choice_text"], "Rust");

        let mut req = request(Method::Put, "/admin/polls/questions/999/choices");
        req.set_body(Body::from_json(&json!({ "choice_text": "Orphan" })).unwrap());
        let res = send(state, req).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }
}
