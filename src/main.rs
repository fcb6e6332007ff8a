use std::sync::Arc;

use minisite::config::{AppState, Config};
use minisite::logger;
use minisite::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Size the runtime from the workers setting, default to CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Templates and the article fallback load before the listener binds;
    // traffic is never accepted against a partially loaded site.
    let state = Arc::new(AppState::new(cfg)?);

    let addr = state.config.socket_addr()?;
    let listener = server::bind_listener(addr)?;

    logger::log_server_start(&addr, &state.config);

    server::run(listener, state).await;
    Ok(())
}
