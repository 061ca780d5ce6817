#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tracing::warn;

/// Resolves on the first Ctrl-C, or SIGTERM on unix.
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(err) = result {
                    warn!("Failed to listen for Ctrl-C: {}", err);
                    std::future::pending::<()>().await;
                }
            }
            () = async {
                if let Some(signal) = term_signal.as_mut() {
                    signal.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {}
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
