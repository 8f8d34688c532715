use actix_cors::Cors;
use anyhow::Context;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, EnvFilter};

use album_delivery::{
    constants::START_TIME,
    db::postgres::{init_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let builder = fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().context("invalid configuration")?;

    once_cell::sync::Lazy::force(&START_TIME);
    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = init_pool(&config.database_url)
        .await
        .context("database pool could not be created")?
        .clone();

    run_migrations(&pool)
        .await
        .context("database migrations failed")?;

    let app_state = web::Data::new(AppState::new(&config, pool)?);

    if let Some(admin) = config.admin_account() {
        app_state
            .auth_handler
            .ensure_admin(admin)
            .await
            .map_err(|e| anyhow::anyhow!("admin bootstrap failed: {}", e))?;
    }
    let cors_origins = config.cors_origins();
    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        name = %config.name,
        version = env!("CARGO_PKG_VERSION"),
        addr = %server_addr,
        "Starting server"
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(AuthMiddleware)
            .wrap(build_cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("could not bind {}", server_addr))?
    .run();

    tokio::select! {
        res = server => res.context("server stopped with an error")?,
        _ = shutdown_signal() => tracing::info!("Shutdown signal received"),
    }

    Ok(())
}
