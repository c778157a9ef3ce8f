//! OS signal handling
//!
//! On Unix SIGINT, SIGTERM and SIGQUIT are handled, with
//! [`tokio::signal::ctrl_c`] awaited as a fallback. Elsewhere only ctrl-c.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::debug;

use super::Inbound;

/// Waits for a termination signal
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// How interrupt forwarding ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// A second signal arrived; the runner should be killed
    HardKill,
    /// The interface queue was closed before the first signal could be delivered
    QueueClosed,
}

/// Forward the first signal to the interface; return on the second
pub async fn forward_interrupts(tx: mpsc::Sender<Inbound>) -> std::io::Result<InterruptOutcome> {
    relay_interrupts(tx, wait_for_shutdown_signal).await
}

async fn relay_interrupts<F, Fut>(
    tx: mpsc::Sender<Inbound>,
    mut next_signal: F,
) -> std::io::Result<InterruptOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    next_signal().await?;
    debug!("Interrupt received, notifying interface");
    if tx.send(Inbound::Interrupt).await.is_err() {
        return Ok(InterruptOutcome::QueueClosed);
    }

    next_signal().await?;
    Ok(InterruptOutcome::HardKill)
}
