use anyhow::Context;
use clap::Parser;
use std::io::Read;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faview::{
    Config,
    config::{Command, FetchArgs, SequencesArgs, ServeArgs},
    formats::open_source,
    handlers::{AppState, create_router},
    locations, render, resolver,
    session::Viewer,
    storage::FileOpener,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing; logs go to stderr so fetch output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opener = FileOpener::new(config.http_timeout())?;

    match config.command {
        Command::Serve(args) => serve(args, opener).await,
        Command::Fetch(args) => fetch(args, opener).await,
        Command::Sequences(args) => sequences(args, opener).await,
    }
}

async fn serve(args: ServeArgs, opener: FileOpener) -> anyhow::Result<()> {
    let viewer = Arc::new(Viewer::with_opener(opener.clone()));
    viewer.set_locations(&args.locations);
    if let Err(e) = viewer.set_url(&args.url) {
        tracing::warn!("Initial URL rejected: {}", e);
    } else {
        // The first cycle runs in the background so the server comes up at once
        let viewer = Arc::clone(&viewer);
        tokio::spawn(async move { viewer.refresh().await });
    }

    let state = AppState { viewer, opener };
    let app = create_router(state);

    let app = if args.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let addr = args.bind_addr();
    tracing::info!("Starting faview on {}", addr);
    tracing::info!("Initial FASTA URL: {}", args.url);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn fetch(args: FetchArgs, opener: FileOpener) -> anyhow::Result<()> {
    let text = if args.regions.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read regions from stdin")?;
        text.trim_end_matches('\n').to_string()
    } else {
        args.regions.join("\n")
    };

    let source = open_source(&opener, &args.url)?;
    let regions = resolver::resolve(source, locations::parse(&text)).await?;
    print!("{}", render::fasta_records(&regions));

    Ok(())
}

async fn sequences(args: SequencesArgs, opener: FileOpener) -> anyhow::Result<()> {
    let source = open_source(&opener, &args.url)?;
    let sizes = source.sequence_sizes().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sizes)?);
    } else {
        for size in sizes {
            println!("{}\t{}", size.name, size.length);
        }
    }

    Ok(())
}
