use warp::{
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{MethodNotAllowed, Reject},
    Rejection, Reply,
};

use crate::types::{question::QuestionId, quiz::QuizId};

#[derive(Debug)]
pub enum Error {
    ParseError(std::num::ParseIntError),
    MissingParameters,
    DuplicateQuestion,
    QuestionNotFound(QuestionId),
    NoChanges,
    DanglingQuestion(QuestionId),
    QuizNotFound(QuizId),
    ResponseNotInQuiz(QuestionId),
    StoreFailure(String),
    Seed(std::io::Error),
    SeedFormat(serde_json::Error),
    SeedIdOverflow(QuestionId),
    Upstream(reqwest::Error),
    UpstreamStatus(u16, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::ParseError(ref err) => write!(f, "Cannot parse parameter: {}", err),
            Error::MissingParameters => write!(f, "Missing parameter"),
            Error::DuplicateQuestion => write!(f, "Question already exists"),
            Error::QuestionNotFound(ref id) => write!(f, "Question not found with ID: {}", id.0),
            Error::NoChanges => write!(f, "No changes found"),
            Error::DanglingQuestion(ref id) => {
                write!(f, "Question {} is referenced but does not exist", id.0)
            }
            Error::QuizNotFound(ref id) => write!(f, "Quiz with id {} not found", id.0),
            Error::ResponseNotInQuiz(ref id) => {
                write!(f, "Question {} is not part of this quiz", id.0)
            }
            Error::StoreFailure(ref reason) => write!(f, "Store failure: {}", reason),
            Error::Seed(ref err) => write!(f, "Cannot read seed file: {}", err),
            Error::SeedFormat(ref err) => write!(f, "Cannot parse seed file: {}", err),
            Error::SeedIdOverflow(ref id) => {
                write!(f, "Seed id {} leaves no id for new questions", id.0)
            }
            Error::Upstream(ref err) => write!(f, "Question service unreachable: {}", err),
            Error::UpstreamStatus(status, ref body) => {
                write!(f, "Question service answered {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream(err)
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match *self {
            Error::ParseError(_)
            | Error::MissingParameters
            | Error::NoChanges
            | Error::ResponseNotInQuiz(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateQuestion => StatusCode::CONFLICT,
            Error::QuestionNotFound(_) | Error::QuizNotFound(_) => StatusCode::NOT_FOUND,
            Error::DanglingQuestion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::StoreFailure(_)
            | Error::Seed(_)
            | Error::SeedFormat(_)
            | Error::SeedIdOverflow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::UpstreamStatus(status, _) => {
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        log::warn!("request failed: {}", error);
        // upstream bodies are relayed as-is
        let body = match *error {
            Error::UpstreamStatus(_, ref body) => body.clone(),
            _ => error.to_string(),
        };
        Ok(warp::reply::with_status(body, error.status()))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::FORBIDDEN,
        ))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
    } else if let Some(error) = r.find::<MethodNotAllowed>() {
        // routes match on path first, so this only fires for a known path
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::METHOD_NOT_ALLOWED,
        ))
    } else {
        Ok(warp::reply::with_status(
            "Route not found".to_string(),
            StatusCode::NOT_FOUND,
        ))
    }
}
