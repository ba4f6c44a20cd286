use std::path::Path;
use std::sync::Arc;

use calforge_app::app::api::routes;
use calforge_app::config::ConfigHandler;
use calforge_app::output::write_calendar;
use calforge_app::source::load_calendar;
use calforge_core::config::load_config;
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting calforge calendar feed");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    if let Some(output) = &config.calendar.output {
        let calendar = load_calendar(Path::new(&config.calendar.source)).await?;
        write_calendar(Path::new(output), &calendar).await?;
        tracing::info!(output = %output, "Calendar document written");
    }

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: Arc::new(config.clone()),
        })
        .push(routes(&config));

    tracing::info!("Serving {} on {bind_addr}", config.calendar.file_name());

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
