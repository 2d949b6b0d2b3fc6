use std::sync::Arc;

use actix::Actor;
use actix_web::{web, App, HttpServer};
use tracing::info;

use backend::config::AppConfig;
use backend::domain::WordList;
use backend::state::AppState;
use backend::store::redis::RedisGameStore;
use backend::store::GameStore;
use backend::ws::hub::GameHub;
use backend::{routes, telemetry, AppError};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::from_env().map_err(to_io)?;
    let words = match &config.wordlist_path {
        Some(path) => WordList::load(path),
        None => WordList::embedded(),
    }
    .map_err(to_io)?;

    let store: Arc<dyn GameStore> = Arc::new(
        RedisGameStore::connect(&config.redis_url)
            .await
            .map_err(to_io)?,
    );
    let hub = GameHub::new(store.clone()).start();
    let app_state = web::Data::new(AppState::new(
        store,
        hub,
        Arc::new(words),
        config.player_limit,
    ));

    info!(host = %config.host, port = config.port, "starting server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn to_io(err: AppError) -> std::io::Error {
    std::io::Error::other(err.to_string())
}
