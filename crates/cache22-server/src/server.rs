use std::io::ErrorKind;
use std::net::SocketAddr;

use cache22_protocol::Session;
use cache22_store::{Namespace, NamespaceHandle};
use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::connection::serve_connection;
use crate::error::{ServerError, ServerResult};
use crate::shutdown::StopToken;

/// Cache22 TCP server.
pub struct Cache22Server {
    config: ServerConfig,
    namespace: Namespace,
}

impl Cache22Server {
    /// A server over an empty namespace.
    pub fn new(config: ServerConfig) -> Self {
        let namespace = config.empty_namespace();
        Self { config, namespace }
    }

    /// A server whose connections start from `namespace`.
    pub fn with_namespace(config: ServerConfig, namespace: Namespace) -> Self {
        Self { config, namespace }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Create the listening socket.
    pub async fn bind(self) -> ServerResult<Listening> {
        let addr = self.config.bind_addr;
        let bind_err = move |source: std::io::Error| ServerError::Bind { addr, source };

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_err)?;
        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let listener = socket.listen(self.config.backlog).map_err(bind_err)?;
        let local_addr = listener.local_addr()?;

        info!(
            addr = %local_addr,
            isolation = %self.config.isolation,
            lookup = %self.config.lookup,
            "Cache22 server listening"
        );
        Ok(Listening {
            listener,
            local_addr,
            master: self.config.handle_for(self.namespace),
        })
    }
}

/// A bound server, ready to accept.
pub struct Listening {
    listener: TcpListener,
    local_addr: SocketAddr,
    master: NamespaceHandle,
}

impl Listening {
    /// The bound address; useful when the configured port was 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `stop` fires, spawning one task per client.
    ///
    /// Returns `Ok(())` when stopped and `ServerError::Accept` when `accept`
    /// fails with anything but an interruption. Spawned connections are not
    /// waited for.
    pub async fn serve(self, mut stop: StopToken) -> ServerResult<()> {
        let Listening {
            listener, master, ..
        } = self;

        loop {
            tokio::select! {
                biased;

                _ = stop.stopped() => {
                    info!("stop requested, no longer accepting connections");
                    return Ok(());
                }

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let session = Session::new(master.attach());
                        tokio::spawn(serve_connection(stream, peer, session));
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => {
                        debug!("accept interrupted, retrying");
                    }
                    Err(e) => {
                        error!(error = %e, "accept failed");
                        return Err(ServerError::Accept(e));
                    }
                },
            }
        }
    }
}
