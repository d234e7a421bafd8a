use std::sync::Arc;

use actix_web::{web, App, HttpServer};

use pasos_core::{
    config::Config,
    engine::Engine,
    messaging::{
        port::MessagingPort,
        throttled::{ThrottleConfig, ThrottledMessenger},
    },
    ports::RecordSource,
};
use pasos_scraper::ScraperClient;
use pasos_whatsapp::{handlers::AppState, webhook, WhatsAppMessenger};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    pasos_core::logging::init("pasos")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!(bind = %cfg.bind_addr, scraper = %cfg.scraper_url, "starting pasos bot");

    let source: Arc<dyn RecordSource> = Arc::new(ScraperClient::new(
        cfg.scraper_url.clone(),
        cfg.fetch_timeout,
    )?);

    // Wrap the raw Cloud API messenger with a throttling decorator so
    // multi-chunk replies do not trip per-pair rate limits.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(WhatsAppMessenger::new(
        &cfg.graph_api_base,
        &cfg.phone_id,
        cfg.whatsapp_token.clone(),
        cfg.send_timeout,
    )?);
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let engine = Arc::new(Engine::from_config(&cfg));

    let state = web::Data::new(AppState {
        cfg: cfg.clone(),
        engine,
        source,
        messenger,
    });

    let bind_addr = cfg.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(webhook::configure)
    })
    .bind(bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
