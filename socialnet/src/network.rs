//! Running instance of the social network
//!
//! [`SocialNetwork`] owns everything a host server keeps alive for the
//! lifetime of the plugin: the engine, the log writer and the expiry sweeper.

use crate::Result;
use crate::config::{ConfigBuilder, SocialConfig};
use crate::ports::Ports;
use crate::workflow::RelationshipEngine;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Debug)]
pub struct SocialNetwork {
    engine: Arc<RelationshipEngine>,
    config: SocialConfig,
    sweeper: Option<JoinHandle<()>>,
    _log_guard: Option<WorkerGuard>,
}

impl SocialNetwork {
    /// Initialize logging, open the store and start the expiry sweeper when
    /// requests expire.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(config: SocialConfig, ports: Ports) -> Result<Self> {
        let log_guard = crate::logging::init(&config.effective_logging())?;

        let engine = Arc::new(crate::init(&config, ports).await?);

        let sweeper = config.requests.ttl().map(|_| {
            info!(
                "Sweeping expired requests every {:?}",
                config.requests.sweep_interval
            );
            engine
                .clone()
                .spawn_expiry_sweeper(config.requests.sweep_interval)
        });

        info!("socialnet {} started", crate::VERSION);
        Ok(Self {
            engine,
            config,
            sweeper,
            _log_guard: log_guard,
        })
    }

    /// In-memory network with detached ports
    pub async fn for_testing() -> Result<Self> {
        Self::start(ConfigBuilder::testing().build()?, Ports::detached()).await
    }

    pub fn engine(&self) -> &Arc<RelationshipEngine> {
        &self.engine
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// Whether the background expiry sweep is running
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the sweeper. Records are already persisted by every transition.
    pub async fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
            let _ = sweeper.await;
        }
        info!("socialnet stopped");
    }
}

impl Drop for SocialNetwork {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_for_testing_has_no_sweeper() {
        let network = SocialNetwork::for_testing().await.unwrap();
        assert!(!network.is_sweeping());

        let engine = network.engine();
        let steve = engine.join("Steve").await.unwrap().id;
        let alex = engine.join("Alex").await.unwrap().id;
        engine
            .send_request(&steve, &alex, GroupKind::Friend)
            .await
            .unwrap();
        engine
            .accept_request(&alex, &steve, GroupKind::Friend)
            .await
            .unwrap();

        assert_eq!(
            engine.members(&steve, GroupKind::Friend).await.unwrap(),
            vec![alex]
        );
        network.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_runs_when_requests_expire() {
        let config = ConfigBuilder::testing()
            .with_request_timeout(Duration::from_secs(30))
            .with_sweep_interval(Duration::from_secs(5))
            .build()
            .unwrap();
        let network = SocialNetwork::start(config, Ports::detached()).await.unwrap();

        assert!(network.is_sweeping());
        network.shutdown().await;
    }
}
