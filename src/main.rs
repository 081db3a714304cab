use actix_web::{App, HttpServer, web};
use log::{info, warn};
use std::path::Path;

use image_sorter::api;
use image_sorter::app_state::AppState;
use image_sorter::config::AppConfig;

fn init_logging(config: &AppConfig) {
    if let Err(e) = log4rs::init_file(&config.logging.config_file, Default::default()) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        warn!("Could not load {} ({}), logging to stderr", config.logging.config_file, e);
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config_path = AppConfig::config_path();
    let config = AppConfig::load_from(&config_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    init_logging(&config);

    // Loading ran before any logger existed; report where the settings came from
    if Path::new(&config_path).exists() {
        info!("Loaded configuration from {}", config_path);
    } else {
        warn!("Config file {} not found, using defaults", config_path);
    }
    let config = config.with_env_overrides();

    let state = AppState::from_config(config.clone());
    info!("Starting server on {}:{}", config.server.host, config.server.port);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
