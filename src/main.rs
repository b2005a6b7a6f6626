use std::sync::Arc;

use bootstrap_account_sets::accounts::{Account, Engine};
use bootstrap_account_sets::config::{load_engine_config, load_listener_addr, load_listener_cleanup_interval};
use bootstrap_account_sets::net::TcpListenerService;

#[tokio::main]
async fn main() {
    env_logger::init();

    let engine = Arc::new(Engine::new(load_engine_config()));
    let listener = TcpListenerService::new(load_listener_cleanup_interval());
    let addr = load_listener_addr();

    let cleanup_handle = {
        let listener = listener.clone();
        tokio::spawn(async move {
            listener.run_cleanup_loop().await;
        })
    };

    let accept_engine = engine.clone();
    let accept_handle = {
        let listener = listener.clone();
        tokio::spawn(async move {
            let on_signal = move |handle: Arc<bootstrap_account_sets::net::ConnectionHandle>| {
                // A real node would derive the account from the handshake;
                // here the connection id stands in as a placeholder seed.
                let mut bytes = [0u8; 32];
                bytes[..8].copy_from_slice(&handle.id.to_be_bytes());
                accept_engine.priority_up(Account(bytes));
            };
            if let Err(e) = listener.run_accept_loop(&addr, on_signal).await {
                log::error!("listener stopped: {e}");
            }
        })
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("shutdown signal received");
            listener.shutdown();
        }
    }

    let _ = accept_handle.await;
    let _ = cleanup_handle.await;

    log::info!("final account-set info: {}", engine.info().to_json_pretty());
}
