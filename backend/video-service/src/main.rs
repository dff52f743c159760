use actix_web::{web, App, HttpResponse, HttpServer};
use s3_utils::S3Client;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_service::config::Config;
use video_service::db::{PgUserRepository, PgVideoRepository};
use video_service::handlers;
use video_service::middleware::BearerAuth;
use video_service::services::{FfmpegToolkit, S3ObjectStore, StagingArea, VideoLifecycle};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    tracing::info!("Starting video-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            io::Error::new(io::ErrorKind::Other, e)
        })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            io::Error::new(io::ErrorKind::Other, e)
        })?;
    tracing::info!("Database migrations applied");

    let s3 = S3Client::with_config(config.s3.clone()).await;
    if let Err(e) = s3.health_check().await {
        tracing::warn!("S3 bucket {} not reachable at startup: {}", config.s3.bucket, e);
    }

    let staging = StagingArea::new(config.staging.dir.clone())?;
    tracing::info!("Staging directory: {}", staging.root().display());

    let toolkit = Arc::new(FfmpegToolkit::new(&config.media));
    let users = Arc::new(PgUserRepository::new(db_pool.clone()));
    let lifecycle = web::Data::new(VideoLifecycle::new(
        Arc::new(PgVideoRepository::new(db_pool.clone())),
        Arc::new(S3ObjectStore::new(s3.operations())),
        toolkit.clone(),
        toolkit,
        staging,
        config.limits.clone(),
    ));

    let bind_address = config.bind_address();
    tracing::info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(lifecycle.clone())
            .route("/health", web::get().to(health))
            .configure(handlers::configure(BearerAuth::new(users.clone())))
    })
    .bind(bind_address)?
    .run()
    .await
}
