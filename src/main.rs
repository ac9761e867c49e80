use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::{error, info};
use std::sync::Arc;

use chess_analysis_client::config::{AppConfig, Args};
use chess_analysis_client::models::AppState;
use chess_analysis_client::routes::configure_routes;
use chess_analysis_client::service::HttpAnalysisService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match AppConfig::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let analysis = HttpAnalysisService::new(&config.analysis_url, config.timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    info!("Analysis service at {}", analysis.endpoint());
    info!("Starting chess client at http://{}", config.bind);

    let bind = config.bind;
    let static_dir = config.static_dir.clone();
    let app_state = web::Data::new(AppState {
        config,
        analysis: Arc::new(analysis),
    });

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(app_state.clone())
            .configure(move |cfg| configure_routes(cfg, &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
