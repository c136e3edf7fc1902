use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::time::timeout;

use crate::{
    config::AppConfig,
    http,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    triage::TriageService,
};

/// The classification service in its ready state. Constructing it loads the
/// artifacts; a failed load never yields a value, so nothing can be served
/// from a missing model.
pub struct TriageApp {
    service: Arc<TriageService>,
    bind_addr: SocketAddr,
    shutdown: Shutdown,
}

impl TriageApp {
    pub fn initialize(
        config: &AppConfig,
        paths: &ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let service = TriageService::load(paths.artifacts.clone())
            .context("failed to load model artifacts; run `email-triage train` first")?;
        Ok(Self {
            service: Arc::new(service),
            bind_addr: config.server.bind_addr,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let TriageApp {
            service,
            bind_addr,
            shutdown,
        } = self;

        tracing::info!(target: "service", addr = %bind_addr, "email triage service starting");

        let mut server = tokio::spawn(http::serve(service, bind_addr, shutdown.subscribe()));
        let mut shutdown_listener = shutdown.subscribe();

        tokio::select! {
            _ = shutdown_listener.notified() => {
                tracing::info!(target: "service", "stop signal received; draining connections");
            }
            res = &mut server => {
                return flatten(res);
            }
        }

        let drain_timeout = Duration::from_secs(5);
        match timeout(drain_timeout, &mut server).await {
            Ok(res) => flatten(res)?,
            Err(_) => {
                tracing::warn!(
                    target: "service",
                    "connections did not drain within {:?}; forcing exit",
                    drain_timeout
                );
                server.abort();
            }
        }

        tracing::info!(target: "service", "email triage service stopped");
        Ok(())
    }
}

fn flatten(res: Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(inner) => inner,
        Err(err) if err.is_panic() => anyhow::bail!("http server task panicked"),
        Err(err) => Err(err.into()),
    }
}
