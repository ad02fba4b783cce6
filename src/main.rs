#[macro_use]
extern crate diesel;

mod appointments;
mod auth;
mod availability;
mod config;
mod database;
mod error;
mod models;
mod protocol;
mod schema;
mod state;
mod utils;

#[cfg(test)]
mod testing;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, state::AppState};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // auth
        .service(
            web::scope("/api/auth")
                .app_data(utils::json_config())
                .configure(auth::config),
        )
        // professor availability
        .service(
            web::scope("/api/availability")
                .app_data(utils::json_config())
                .app_data(utils::query_config())
                .configure(availability::config),
        )
        // student bookings
        .service(
            web::scope("/api/appointments")
                .app_data(utils::json_config())
                .configure(appointments::config),
        );
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(&config)?;

    let bind = (config.host.clone(), config.port);
    tracing::info!(host = %bind.0, port = bind.1, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .data(state.clone())
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
