mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chantier_backend=debug,actix_web=info")),
        )
        .init();

    let config = ServerConfig::from_env().map_err(io::Error::other)?;

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    db::sync_schema(&db).await.map_err(io::Error::other)?;
    tracing::info!("Database connected, schema ready");

    tracing::info!(host = %config.host, port = config.port, "Starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(db.clone()))
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
