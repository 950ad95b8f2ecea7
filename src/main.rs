use std::sync::Arc;

use actix_web::{get, post, web, App, HttpResponse, HttpServer};
use api::client::reqwest_source_client::ReqwestSourceClient;
use batch::batch_worker::{self, BatchLoaderHandle};
use futures_util::stream;
use log::info;
use message::{LoadRequest, OutboundMessage};
use settings::Settings;
use tokio_util::sync::CancellationToken;

mod api;
mod batch;
mod message;
mod request;
mod settings;

fn encode_line(message: &OutboundMessage) -> Result<web::Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');

    Ok(web::Bytes::from(line))
}

/// Streams the outbound messages of one load as newline-delimited JSON.
#[post("/load")]
async fn load(
    batch_loader: web::Data<BatchLoaderHandle>,
    req: web::Json<LoadRequest>,
) -> HttpResponse {
    let receiver = batch_loader.load(req.into_inner()).await;

    let body = stream::unfold(receiver, |mut receiver| async move {
        let message = receiver.recv().await?;

        if message.is_terminal() {
            info!("Load finished, closing stream. [key = {}]", message.key());
        }

        Some((encode_line(&message), receiver))
    });

    HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(body)
}

#[get("/health")]
async fn health() -> &'static str {
    "ok"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let settings = Settings::new()?;
    let target_port = settings.api.target_port;
    let source_client = Arc::new(ReqwestSourceClient::new(
        settings.source.base_url.as_deref(),
    )?);

    let cancellation_token = CancellationToken::new();
    let batch_loader = batch_worker::start(
        source_client,
        &settings.loader,
        cancellation_token.clone(),
    )?;
    let batch_loader_data = web::Data::new(batch_loader);

    HttpServer::new(move || {
        App::new()
            .app_data(batch_loader_data.clone())
            .service(load)
            .service(health)
    })
    .bind(("0.0.0.0", target_port))?
    .run()
    .await?;

    info!("Server stopped, shutting down batch loader.");
    cancellation_token.cancel();

    Ok(())
}
