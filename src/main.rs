//! First UV Pro API entry point.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header::HeaderValue, Method};
use tokio::signal;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use first_uv_pro::api::{create_routes, request_trace_layer, AppState};
use first_uv_pro::config::{close_db, init_db, LogFormat, APP_CONFIG};
use first_uv_pro::error::panic_response;

// High-performance memory allocator for non-MSVC targets
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Entry point for the First UV Pro API.
#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing();

    // Initialize Sentry
    let _guard = if APP_CONFIG.sentry_dsn.is_empty() {
        tracing::warn!("Sentry DSN not configured, error tracking disabled");
        None
    } else {
        Some(sentry::init((
            APP_CONFIG.sentry_dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: APP_CONFIG.sentry_traces_sample_rate,
                sample_rate: 1.0, // Capture all errors
                ..Default::default()
            },
        )))
    };

    if APP_CONFIG.reload {
        tracing::warn!("UVICORN_RELOAD is set but hot reload is not supported, ignoring");
    }

    let db = init_db();
    let state = AppState::new(db.clone());

    // Configure CORS based on environment
    let cors = build_cors_layer();

    // Configure rate limiting with SmartIpKeyExtractor for better IP detection
    let Some(governor_config) = GovernorConfigBuilder::default()
        .per_second(APP_CONFIG.rate_limit_per_second)
        .burst_size(APP_CONFIG.rate_limit_burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
    else {
        tracing::error!(
            rate_limit_per_second = APP_CONFIG.rate_limit_per_second,
            rate_limit_burst = APP_CONFIG.rate_limit_burst_size,
            "Invalid rate limiter configuration"
        );
        std::process::exit(1);
    };

    // Create router with middleware
    // Layer order (bottom to top execution): Panic -> CORS -> Compression -> Trace -> Rate Limit
    let app = create_routes(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(
            CompressionLayer::new()
                .br(true)
                .gzip(true)
                .zstd(true)
                .quality(tower_http::compression::CompressionLevel::Default),
        )
        .layer(request_trace_layer())
        .layer(GovernorLayer::new(governor_config));

    tracing::info!(
        host = %APP_CONFIG.host,
        port = APP_CONFIG.port,
        log_level = %APP_CONFIG.log_level,
        rate_limit_per_second = APP_CONFIG.rate_limit_per_second,
        rate_limit_burst = APP_CONFIG.rate_limit_burst_size,
        "Starting server"
    );

    // Create TCP listener
    let listener =
        match tokio::net::TcpListener::bind((APP_CONFIG.host.as_str(), APP_CONFIG.port)).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(
                    host = %APP_CONFIG.host,
                    port = APP_CONFIG.port,
                    "Failed to bind to address: {}",
                    e
                );
                std::process::exit(1);
            }
        };

    // Run server with graceful shutdown and ConnectInfo for rate limiting
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!("Server error: {}", e);
    }

    // Cleanup
    tracing::info!("Shutting down...");

    close_db(&db).await;

    // Flush Sentry events before exit
    if let Some(client) = sentry::Hub::current().client() {
        client.flush(Some(Duration::from_secs(2)));
    }

    tracing::info!("Shutdown complete");
}

/// Installs the global subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| APP_CONFIG.default_log_filter().into());
    let json = APP_CONFIG.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(sentry::integrations::tracing::layer())
        .init();
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer() -> CorsLayer {
    let cors_origins = &APP_CONFIG.cors_origins;

    if cors_origins == "*" {
        if APP_CONFIG.is_production {
            tracing::warn!(
                "CORS is configured to allow all origins - not recommended for production"
            );
        }
        return allow_any_origin();
    }

    let origins: Vec<HeaderValue> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, allowing all");
        allow_any_origin()
    } else {
        tracing::info!(origins = ?origins, "CORS configured with specific origins");
        CorsLayer::new()
            .allow_methods(ALLOWED_METHODS)
            .allow_origin(origins)
            .allow_headers(tower_http::cors::Any)
    }
}

fn allow_any_origin() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_origin(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Handles shutdown signals for graceful termination.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        },
    }
}
