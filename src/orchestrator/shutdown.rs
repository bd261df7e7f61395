//! Shutdown triggers for the watch loop

use std::io::BufRead;

use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Resolves when the user presses Enter
///
/// Stdin is read on a plain thread so a pending read never holds up runtime
/// shutdown. If stdin is closed or unreadable this never resolves.
pub async fn enter_pressed() {
    let (tx, rx) = oneshot::channel();
    let spawned = std::thread::Builder::new()
        .name("koanwatch-stdin".to_string())
        .spawn(move || {
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) => debug!("enter_pressed: stdin closed"),
                Ok(_) => {
                    let _ = tx.send(());
                }
                Err(e) => warn!(error = %e, "Failed to read stdin"),
            }
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Failed to spawn stdin reader");
        return std::future::pending().await;
    }

    if rx.await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Resolves on Enter or Ctrl-C, whichever comes first
pub async fn exit_requested() {
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = enter_pressed() => debug!("exit_requested: enter pressed"),
        _ = interrupted => debug!("exit_requested: interrupted"),
    }
}
