//! API Server

use super::{handlers::AppState, router::AuthApi};
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::session::SessionStore;
use crate::Result;
use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

/// HTTP server exposing login, logout and healthcheck
pub struct AuthServer {
    bind_addr: SocketAddr,
    app_state: AppState,
    write_timeout: Duration,
}

impl AuthServer {
    /// Create a new server
    pub fn new(bind_addr: SocketAddr, app_state: AppState, write_timeout: Duration) -> Self {
        Self {
            bind_addr,
            app_state,
            write_timeout,
        }
    }

    /// Create a server wired from configuration
    pub fn from_config(config: &Config) -> Self {
        let credentials = CredentialStore::from_config(&config.auth.users);
        let sessions = SessionStore::from_config(&config.session);

        Self::new(
            config.server.bind_addr,
            AppState::new(credentials, sessions),
            config.server.write_timeout,
        )
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind server to {}", self.bind_addr))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        let app = self.router();

        info!("Server listening on {}", local_addr);

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!("Server error: {}", e);
            return Err(e.into());
        }

        info!("Server on {} stopped", local_addr);
        Ok(())
    }

    /// Build the router served by this server
    pub fn router(&self) -> Router {
        AuthApi::create_router(self.app_state.clone(), self.write_timeout)
    }
}
