mod config;
mod handlers;
mod logging;
mod models;
mod services;

use actix_web::{
    middleware::{Logger, NormalizePath, TrailingSlash},
    web, App, HttpServer,
};
use log::info;
use logging::init_logging;
use services::{
    aggregator::{Probes, StatusAggregator},
    backgrounds::ImageLibrary,
};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = config::Config::from_file("config").map_err(io::Error::other)?;
    init_logging(&config).map_err(io::Error::other)?;

    let images_dir = config.resolve_images_dir();
    info!("Images directory resolved to: {}", images_dir.display());
    let library = web::Data::new(ImageLibrary::new(&images_dir));

    let aggregator = web::Data::new(StatusAggregator::new(&config, Probes::system(&config)));
    let server_ip = aggregator.internal_ip().await;
    info!("Dashboard available at http://{}:{}", server_ip, config.server_port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .app_data(aggregator.clone())
            .app_data(library.clone())
            .configure(handlers::routes)
    })
    .bind((config.server_address.as_str(), config.server_port))?
    .run()
    .await
}
