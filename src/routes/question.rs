use std::collections::HashMap;

use warp::{http::StatusCode, Filter, Rejection, Reply};

use crate::{
    error::{self, Error},
    routes::{cors, decode, with_service},
    service::question::{Listing, ListingStatus, QuestionService},
    store::QuestionRepository,
    types::{
        question::{NewQuestion, QuestionId, QuestionUpdate},
        response::Response,
    },
};

#[derive(Debug)]
struct Sample {
    category: String,
    count: u32,
}

fn extract_sample(params: HashMap<String, String>) -> Result<Sample, Error> {
    let category = match params.get("category") {
        Some(c) => c.to_string(),
        None => return Err(Error::MissingParameters),
    };
    let count = match params.get("noOfQuestions") {
        Some(n) => n.parse::<u32>().map_err(Error::ParseError)?,
        None => return Err(Error::MissingParameters),
    };
    Ok(Sample { category, count })
}

fn listing_reply(listing: Listing) -> impl Reply {
    let status = match listing.status {
        ListingStatus::Complete => StatusCode::OK,
        ListingStatus::Degraded => StatusCode::BAD_REQUEST,
    };
    warp::reply::with_status(warp::reply::json(&listing.questions), status)
}

pub async fn get_all_questions<R: QuestionRepository>(
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    Ok(listing_reply(service.list_all().await))
}

pub async fn get_by_category<R: QuestionRepository>(
    category: String,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    Ok(listing_reply(service.list_by_category(&decode(category)).await))
}

pub async fn get_by_difficulty<R: QuestionRepository>(
    level: String,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    Ok(listing_reply(service.list_by_difficulty(&decode(level)).await))
}

pub async fn get_by_category_and_difficulty<R: QuestionRepository>(
    category: String,
    level: String,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    let listing = service
        .list_by_category_and_difficulty(&decode(category), &decode(level))
        .await;
    Ok(listing_reply(listing))
}

pub async fn add_question<R: QuestionRepository>(
    request: NewQuestion,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    service.add(request).await?;
    Ok(warp::reply::with_status("Question added", StatusCode::OK))
}

pub async fn delete_question<R: QuestionRepository>(
    id: i32,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    service.delete(QuestionId(id)).await?;
    Ok(warp::reply::with_status("Question deleted", StatusCode::OK))
}

pub async fn update_question<R: QuestionRepository>(
    id: i32,
    patch: QuestionUpdate,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    service.update(QuestionId(id), patch).await?;
    Ok(warp::reply::with_status("Question updated", StatusCode::OK))
}

pub async fn generate<R: QuestionRepository>(
    params: HashMap<String, String>,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    let sample = extract_sample(params)?;
    let ids = service.random_sample(&sample.category, sample.count).await?;
    Ok(warp::reply::json(&ids))
}

pub async fn get_questions<R: QuestionRepository>(
    ids: Vec<QuestionId>,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    let wrappers = service.resolve(&ids).await?;
    Ok(warp::reply::json(&wrappers))
}

pub async fn get_score<R: QuestionRepository>(
    responses: Vec<Response>,
    service: QuestionService<R>,
) -> Result<impl Reply, Rejection> {
    let right = service.score(&responses).await?;
    Ok(warp::reply::json(&right))
}

/// Every question-service route under `api/v1`, with CORS and error recovery.
pub fn filters<R: QuestionRepository>(
    service: QuestionService<R>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let service = with_service(service);

    let all = warp::path!("api" / "v1" / "allQuestions")
        .and(warp::get())
        .and(service.clone())
        .and_then(get_all_questions::<R>);

    let by_category = warp::path!("api" / "v1" / "category" / String)
        .and(warp::get())
        .and(service.clone())
        .and_then(get_by_category::<R>);

    let by_difficulty = warp::path!("api" / "v1" / "difficultyLevel" / String)
        .and(warp::get())
        .and(service.clone())
        .and_then(get_by_difficulty::<R>);

    let by_both = warp::path!("api" / "v1" / "category" / String / "difficultyLevel" / String)
        .and(warp::get())
        .and(service.clone())
        .and_then(get_by_category_and_difficulty::<R>);

    let add = warp::path!("api" / "v1" / "addNewQuestion")
        .and(warp::post())
        .and(warp::body::json())
        .and(service.clone())
        .and_then(add_question::<R>);

    let delete = warp::path!("api" / "v1" / "deleteQuestion" / i32)
        .and(warp::delete())
        .and(service.clone())
        .and_then(delete_question::<R>);

    let update = warp::path!("api" / "v1" / "updateQuestion" / i32)
        .and(warp::put())
        .and(warp::body::json())
        .and(service.clone())
        .and_then(update_question::<R>);

    let sample = warp::path!("api" / "v1" / "generate")
        .and(warp::get())
        .and(warp::query())
        .and(service.clone())
        .and_then(generate::<R>);

    let resolve = warp::path!("api" / "v1" / "getQuestions")
        .and(warp::post())
        .and(warp::body::json())
        .and(service.clone())
        .and_then(get_questions::<R>);

    let score = warp::path!("api" / "v1" / "getScore")
        .and(warp::post())
        .and(warp::body::json())
        .and(service)
        .and_then(get_score::<R>);

    all.or(by_category)
        .or(by_difficulty)
        .or(by_both)
        .or(add)
        .or(delete)
        .or(update)
        .or(sample)
        .or(resolve)
        .or(score)
        .with(cors())
        .recover(error::return_error)
}
