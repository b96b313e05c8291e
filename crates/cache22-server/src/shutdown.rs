use tokio::sync::watch;

/// Create a connected stop signal and token.
pub fn stop_channel() -> (StopSignal, StopToken) {
    let (tx, rx) = watch::channel(false);
    (StopSignal { tx }, StopToken { rx })
}

/// Tells the acceptor to stop taking new connections.
///
/// Connections already accepted keep running until their clients leave.
#[derive(Debug)]
pub struct StopSignal {
    tx: watch::Sender<bool>,
}

impl StopSignal {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Held by the acceptor loop.
#[derive(Clone, Debug)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

impl StopToken {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`StopSignal::stop`] has been called. If the signal is
    /// dropped without stopping, this never resolves.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
