//! Cotacoes Server
//!
//! HTTP service that stores and retrieves freight-quote records backed
//! by Postgres, with bearer/session authentication and an optional
//! Redis read-through cache.

mod error;
mod gate;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use cotacoes_core::ports::{QuoteCache, RecordStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use services::{AuthService, BootstrapRegistry, QuoteService, SessionRegistry};
use storage::{PostgresStore, RedisCache};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub quotes: Arc<QuoteService>,
    pub auth: Arc<AuthService>,
    pub bootstrap: Arc<BootstrapRegistry>,
    pub sessions: Arc<SessionRegistry>,
    pub boot_secret: String,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Cotacoes Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = load_config().context("Failed to load configuration")?;
    info!("Config loaded: bind={}", config.bind_address);

    // Persistence gateway: mandatory, a connection failure is fatal.
    let store = Arc::new(
        PostgresStore::connect(&config.database_url)
            .await
            .context("Failed to initialize database")?,
    );

    // Cache backend: optional, any failure degrades to cache-disabled.
    let cache: Option<Arc<dyn QuoteCache>> = match &config.redis_url {
        Some(url) => match RedisCache::connect(url).await {
            Ok(cache) => Some(Arc::new(cache)),
            Err(e) => {
                warn!("Cache disabled, Redis unavailable: {}", e);
                None
            }
        },
        None => {
            info!("REDIS_URL not set, cache disabled");
            None
        }
    };

    info!("Initializing services...");
    let bootstrap = Arc::new(BootstrapRegistry::new());
    bootstrap.clone().start_sweep_task();
    let sessions = Arc::new(SessionRegistry::new());
    sessions.clone().start_sweep_task();
    let auth = Arc::new(AuthService::new(config.jwt_secret, config.static_token));
    let quotes = Arc::new(QuoteService::new(
        store.clone() as Arc<dyn RecordStore>,
        cache,
    ));
    info!("Services initialized");

    let state = AppState {
        store,
        quotes,
        auth,
        bootstrap,
        sessions,
        boot_secret: config.boot_secret,
    };

    info!("Building HTTP router...");
    let app = build_router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::meta::root))
        .route("/health", get(handlers::meta::health))
        .route(
            "/api/auth/generate-token",
            post(handlers::auth::generate_token),
        )
        .route(
            "/api/cotacoes",
            get(handlers::cotacoes::list)
                .head(handlers::cotacoes::probe)
                .post(handlers::cotacoes::create),
        )
        .route(
            "/api/cotacoes/:id",
            get(handlers::cotacoes::get)
                .put(handlers::cotacoes::update)
                .delete(handlers::cotacoes::delete),
        )
        .fallback(handlers::meta::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_auth,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    database_url: String,
    redis_url: Option<String>,
    jwt_secret: String,
    static_token: String,
    boot_secret: String,
}

fn load_config() -> Result<Config> {
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set (persistence gateway)")?;
    let jwt_secret =
        std::env::var("JWT_SECRET").context("JWT_SECRET must be set (token signing secret)")?;
    let static_token =
        std::env::var("API_TOKEN").context("API_TOKEN must be set (static fallback token)")?;
    let boot_secret =
        std::env::var("BOOT_SECRET").context("BOOT_SECRET must be set (bootstrap issuance)")?;

    let redis_url = std::env::var("REDIS_URL").ok();
    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    Ok(Config {
        bind_address,
        database_url,
        redis_url,
        jwt_secret,
        static_token,
        boot_secret,
    })
}
