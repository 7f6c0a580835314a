use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cinerino_pos_api::config::{LoggingSettings, Settings};
use cinerino_pos_api::routes::AppState;
use cinerino_pos_api::services::{CinerinoClient, CinerinoCredentials};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Cinerino POS API...");

    let timeout = Duration::from_secs(settings.cinerino.timeout_secs.unwrap_or(30));
    let credentials = CinerinoCredentials {
        endpoint: settings.cinerino.endpoint,
        auth_endpoint: settings.cinerino.auth_endpoint,
        project_id: settings.cinerino.project_id,
        client_id: settings.cinerino.client_id,
        client_secret: settings.cinerino.client_secret,
    };

    let cinerino = CinerinoClient::new(credentials, timeout).map_err(|e| {
        error!("Failed to create Cinerino client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Cinerino client initialized (timeout: {:?})", timeout);

    let app_state = AppState {
        client_id: cinerino.client_id().to_string(),
        events: Arc::new(cinerino),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(cinerino_pos_api::configure_app)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
