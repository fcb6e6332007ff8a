// Server module entry point
// Listener setup and the accept loop

mod connection;
mod listener;

pub use listener::bind_listener;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept connections until the process exits.
///
/// `state` is fully constructed before this is called, so every spawned
/// task observes the complete template store. Accept errors are logged and
/// the loop continues.
pub async fn run(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                if state.config.logging.access_log {
                    logger::log_connection_accepted(&peer_addr);
                }
                connection::spawn_connection(stream, Arc::clone(&state), peer_addr);
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
