//! quire HTTP server.
//!
//! Reads configuration from the environment (and `.env`), opens the vault
//! and serves the note API until interrupted.

use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use quire::config::Config;
use quire::controllers::{self, AppState};
use quire::vault::Vault;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("quire v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::other(e)
    })?;

    let vault = Vault::ensure_exists(&config.vault_root).map_err(|e| {
        log::error!("Cannot open vault: {}", e);
        io::Error::other(e)
    })?;
    log::info!("Using vault root: {}", vault.root().display());
    log::info!(
        "Note cache: ttl={}ms capacity={} touch_on_read={}",
        config.cache_ttl.as_millis(),
        config.cache_capacity,
        config.touch_on_read
    );

    let state = web::Data::new(AppState::new(vault, &config));

    log::info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controllers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("Shutdown complete");
    Ok(())
}
