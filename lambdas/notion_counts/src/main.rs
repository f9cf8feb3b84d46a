use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, RequestExt, Response};
use counts_core::{Config, CountsService};

async fn function_handler(service: &CountsService, event: Request) -> Result<Response<Body>, Error> {
    let params = event.query_string_parameters();
    let key = params.first("key");

    let res = service.handle(event.method(), key).await;

    Ok(res.map(Body::from))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    if config.credentials().is_none() {
        tracing::warn!("NOTION_TOKEN or DATABASE_ID is not set, every request will fail");
    }

    let service = CountsService::new(config);
    let service = &service;

    run(service_fn(move |event: Request| async move {
        function_handler(service, event).await
    }))
    .await
}
