use axum::{
    extract::DefaultBodyLimit,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod handlers;

use config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app = app(&config);

    let addr = config.bind_addr();
    log::info!("🚀 Image Converter Server running on http://{}", addr);
    log::info!("📦 Max upload size: {} MB", config.max_image_size_mb);
    log::info!("📖 API endpoints:");
    log::info!("   POST /convert - Convert between formats");
    log::info!("   POST /square-crop - Crop to centered square");
    log::info!("   POST /fit-to-square - Pad to square on white");
    log::info!("   POST /invert - Invert colors");
    log::info!("   POST /apply-filter - Blur or grayscale");
    log::info!("   POST /profile-picture - 400x400 avatar");
    log::info!("   GET  /health - Health check");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn app(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/convert", post(handlers::convert))
        .route("/square-crop", post(handlers::square_crop))
        .route("/fit-to-square", post(handlers::fit_to_square))
        .route("/invert", post(handlers::invert))
        .route("/apply-filter", post(handlers::apply_filter))
        .route("/profile-picture", post(handlers::profile_picture))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    concat!(
        "Image Converter Server v",
        env!("CARGO_PKG_VERSION"),
        "\n\nAPI Endpoints:\n  POST /convert\n  POST /square-crop\n  POST /fit-to-square\n  POST /invert\n  POST /apply-filter\n  POST /profile-picture\n  GET  /health\n"
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
