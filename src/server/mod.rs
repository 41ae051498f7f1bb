//! JSON HTTP surface for the study service.

pub mod error;
pub mod health;
pub mod router;
pub mod shutdown;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::server::router::build_router;
use crate::server::shutdown::ShutdownManager;
use crate::service::StudyService;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("try_bind() must be called before run()")]
    NotBound,

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub struct StudyServer {
    pub addr: SocketAddr,
    /// The bound listener, kept alive between try_bind() and run().
    listener: Option<TcpListener>,
    router: Router,
    shutdown: Arc<ShutdownManager>,
}

impl StudyServer {
    pub fn new(service: Arc<StudyService>, addr: SocketAddr) -> Self {
        Self {
            addr,
            listener: None,
            router: build_router(service),
            shutdown: Arc::new(ShutdownManager::new()),
        }
    }

    /// Bind to the configured address and return the actual one
    /// (port 0 picks a free port).
    pub async fn try_bind(&mut self) -> Result<SocketAddr, ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let actual_addr = listener.local_addr()?;

        self.addr = actual_addr;
        self.listener = Some(listener);
        tracing::info!("Server bound to {}", actual_addr);
        Ok(actual_addr)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Serve until a shutdown signal arrives.
    ///
    /// Consumes self to take ownership of the pre-bound listener.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.listener.ok_or(ServerError::NotBound)?;

        tracing::info!("Starting study server on {}", self.addr);

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait_for_shutdown().await })
            .into_future()
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
