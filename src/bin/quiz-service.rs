use anyhow::Context;
use warp::Filter;

use quiz_platform::{
    client::HttpQuestionClient, config::Config, logging, routes, service::quiz::QuizService,
    store::QuizStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load("setup").context("cannot load configuration")?;
    logging::init(&config.log_config);

    let settings = config.quiz_service;
    let addr = settings.addr().context("invalid quiz service address")?;
    let client = HttpQuestionClient::new(settings.question_service_url.as_str());

    let routes = routes::quiz::filters(QuizService::new(QuizStore::new(), client))
        .with(routes::access_log("quiz_service"));

    log::info!(
        "quiz service listening on {}, questions from {}",
        addr,
        settings.question_service_url
    );
    warp::serve(routes).run(addr).await;

    Ok(())
}
