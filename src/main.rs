mod config;
mod databases;
mod errors;
mod routes;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;

use crate::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    let pool = databases::setup_backend().await?;

    // The media mount 404s instead of failing to start when the dir is fresh.
    std::fs::create_dir_all(config.photos_dir())
        .with_context(|| format!("Failed to create media directory {:?}", config.photos_dir()))?;

    log::info!(
        "Listening on {}:{} (media base {})",
        config.host,
        config.port,
        config.public_base_url
    );

    let bind_addr = (config.host.clone(), config.port);
    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .configure(routes::chat::board::init)
            .configure(routes::photos::gallery::init)
            .service(actix_files::Files::new(
                "/media/photos",
                app_config.photos_dir(),
            ))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
