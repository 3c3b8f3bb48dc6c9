#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for street-level crime summaries.
//!
//! Exposes the UK Police street-crime data as a small JSON API: a health
//! endpoint and a crimes endpoint that validates the caller's query,
//! fetches one month of incidents near a point, and returns them grouped
//! by category. Upstream failures are logged in full and reported to the
//! caller with generic messages.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use street_crimes_client::CrimeDataClient;

/// Shared application state.
pub struct AppState {
    /// Client for the UK Police street-crime API.
    pub crime_client: Arc<CrimeDataClient>,
}

/// Starts the street crimes API server.
///
/// Binds to `BIND_ADDR`/`PORT` from the environment (defaulting to
/// `127.0.0.1:8080`) and serves the JSON API. This is a regular async
/// function; the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an error if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let state = web::Data::new(AppState {
        crime_client: Arc::new(CrimeDataClient::new()),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/crimes", web::get().to(handlers::crimes)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
