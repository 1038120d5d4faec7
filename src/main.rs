use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

mod bounds;
mod config;
mod coverage;
mod error;
mod geocode;
mod prepare;
mod service;
mod table;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the coverage endpoint
    Serve { port: Option<u16> },
    /// Convert a raw Lambert-93 tower export into the runtime dataset
    Prepare { input: PathBuf, output: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            let path = match cli.config.as_deref() {
                Some(x) => x,
                None => Path::new("config.toml"),
            };
            let config = config::load(path)?;

            let table = Arc::new(table::TowerTable::load(&config.dataset_path)?);
            log::info!(
                "loaded {} towers across {} operators",
                table.towers().len(),
                table.operators().len()
            );

            let resolver = web::Data::new(coverage::Resolver::new(table, config.networks)?);
            let geocoder = web::Data::new(geocode::Geocoder::new(&config.geocoder)?);

            let port = port.unwrap_or(config.http_port);
            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .app_data(resolver.clone())
                    .app_data(geocoder.clone())
                    .service(service::coverage)
            })
            .bind(("0.0.0.0", port))?
            .run()
            .await?;
        }

        Command::Prepare { input, output } => prepare::run(&input, &output)?,
    };

    Ok(())
}
