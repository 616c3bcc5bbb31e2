use std::convert::Infallible;

use warp::{http::Method, Filter};

pub mod question;
pub mod quiz;

fn with_service<S>(service: S) -> impl Filter<Extract = (S,), Error = Infallible> + Clone
where
    S: Clone + Send,
{
    warp::any().map(move || service.clone())
}

/// Path segments arrive percent-encoded; an undecodable one is kept raw.
fn decode(segment: String) -> String {
    urlencoding::decode(&segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.clone())
}

fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(&[Method::PUT, Method::DELETE, Method::GET, Method::POST])
}

pub fn access_log(name: &'static str) -> warp::log::Log<impl Fn(warp::log::Info<'_>) + Copy + Send> {
    warp::log::custom(move |info| {
        log::info!(
            target: name,
            "{} {} {} in {:?}",
            info.method(),
            info.path(),
            info.status(),
            info.elapsed(),
        );
    })
}
