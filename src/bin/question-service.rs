use anyhow::Context;
use warp::Filter;

use quiz_platform::{config::Config, logging, routes, service::question::QuestionService, store::Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load("setup").context("cannot load configuration")?;
    logging::init(&config.log_config);

    let settings = config.question_service;
    let store = match settings.seed_file {
        Some(ref path) => Store::from_seed(path).with_context(|| format!("cannot seed from {}", path))?,
        None => Store::new(),
    };
    let addr = settings.addr().context("invalid question service address")?;

    let routes = routes::question::filters(QuestionService::new(store))
        .with(routes::access_log("question_service"));

    log::info!("question service listening on {}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
