//! Process plumbing shared by the binaries: `.env` loading, logging and
//! Ctrl-C → cancellation.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Load `.env` and install the stderr logger (`RUST_LOG`, default `info`).
pub fn init_logging() {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Cancel `token` on the first Ctrl-C.
pub fn spawn_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => log::info!("⚠️  Received CTRL+C, shutting down..."),
                    Err(err) => log::error!("❌ Failed to listen for CTRL+C: {}", err),
                }
                token.cancel();
            }
        }
    })
}
