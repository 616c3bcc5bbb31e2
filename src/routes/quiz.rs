use warp::{http::StatusCode, Filter, Rejection, Reply};

use crate::{
    client::QuestionClient,
    error,
    routes::{cors, with_service},
    service::quiz::QuizService,
    types::{
        quiz::{QuizId, QuizRequest},
        response::Response,
    },
};

pub async fn create_quiz<C: QuestionClient>(
    request: QuizRequest,
    service: QuizService<C>,
) -> Result<impl Reply, Rejection> {
    let quiz = service.create_quiz(request).await?;
    Ok(warp::reply::with_status(
        warp::reply::with_header(
            "success",
            "location",
            format!("/quiz/get/{}", quiz.id.0),
        ),
        StatusCode::CREATED,
    ))
}

pub async fn get_quiz<C: QuestionClient>(
    id: i32,
    service: QuizService<C>,
) -> Result<impl Reply, Rejection> {
    let wrappers = service.get_quiz_questions(QuizId(id)).await?;
    Ok(warp::reply::json(&wrappers))
}

pub async fn submit_quiz<C: QuestionClient>(
    id: i32,
    responses: Vec<Response>,
    service: QuizService<C>,
) -> Result<impl Reply, Rejection> {
    let right = service.calculate_results(QuizId(id), responses).await?;
    Ok(warp::reply::json(&right))
}

pub fn filters<C: QuestionClient>(
    service: QuizService<C>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let service = with_service(service);

    let create = warp::path("quiz")
        .and(warp::path("create"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(service.clone())
        .and_then(create_quiz::<C>);

    let get = warp::path("quiz")
        .and(warp::path("get"))
        .and(warp::path::param::<i32>())
        .and(warp::path::end())
        .and(warp::get())
        .and(service.clone())
        .and_then(get_quiz::<C>);

    let submit = warp::path("quiz")
        .and(warp::path("submit"))
        .and(warp::path::param::<i32>())
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(service)
        .and_then(submit_quiz::<C>);

    create
        .or(get)
        .or(submit)
        .with(cors())
        .recover(error::return_error)
}
