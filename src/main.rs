use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;
mod store;

use store::MovieStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, honouring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let store = MovieStore::in_memory()?;
    if cfg.database.seed {
        let seeded = store.seed_defaults()?;
        logger::log_debug(&format!("Seeded {seeded} movies"));
    }
    let movies = store.count()?;

    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(config::AppState::new(&cfg, store));

    logger::log_server_start(&addr, &cfg, movies);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    server::start_server_loop(
        listener,
        state,
        server::ServerLoopConfig {
            shutdown_signal: shutdown,
            grace_period: Duration::from_secs(cfg.performance.shutdown_grace_period),
        },
    )
    .await?;

    Ok(())
}
