use super::game_scene::GameScene;
use super::vessel_service::{Connector, ServiceError, VesselService};
use crate::{error, info, log, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, Semaphore, watch};
use tokio_util::sync::CancellationToken;

/// Connection retry and pool settings of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
    pub liveness_interval: Duration,
    pub max_in_flight: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval: Duration::from_secs(1),
            liveness_interval: Duration::from_secs(5),
            max_in_flight: 4,
        }
    }
}

/// Owns the single live handle to the vehicle-control service.
///
/// The supervisor is the only writer of the `connected` flag; everybody else
/// observes it through [`subscribe`](Supervisor::subscribe). Every call made
/// through [`execute_with_reconnect`](Supervisor::execute_with_reconnect)
/// holds one of `max_in_flight` permits.
pub struct Supervisor {
    connector: Arc<dyn Connector>,
    connection_name: String,
    policy: RetryPolicy,
    handle: RwLock<Option<Arc<dyn VesselService>>>,
    connected: watch::Sender<bool>,
    reconnect_lock: Mutex<()>,
    permits: Semaphore,
}

impl Supervisor {
    pub fn new(connector: Arc<dyn Connector>, connection_name: &str, policy: RetryPolicy) -> Self {
        let (connected, _) = watch::channel(false);
        Self {
            connector,
            connection_name: connection_name.to_string(),
            policy,
            handle: RwLock::new(None),
            connected,
            reconnect_lock: Mutex::new(()),
            permits: Semaphore::new(policy.max_in_flight.max(1)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> { self.connected.subscribe() }

    pub fn is_connected(&self) -> bool { *self.connected.borrow() }

    /// The currently open handle, if any.
    pub async fn handle(&self) -> Option<Arc<dyn VesselService>> { self.handle.read().await.clone() }

    /// Closes any open handle, then opens a new one under `name`.
    pub async fn connect(&self, name: &str) -> Result<Arc<dyn VesselService>, ServiceError> {
        let _guard = self.reconnect_lock.lock().await;
        self.connect_locked(name).await
    }

    /// [`connect`](Supervisor::connect) with the configured connection name.
    pub async fn reconnect(&self) -> Result<Arc<dyn VesselService>, ServiceError> {
        self.connect(&self.connection_name).await
    }

    /// Reconnects unless another task already opened a live handle other than
    /// `stale`. Without a `stale` handle any live handle is reused.
    async fn reconnect_from(
        &self,
        stale: Option<&Arc<dyn VesselService>>,
    ) -> Result<Arc<dyn VesselService>, ServiceError> {
        let _guard = self.reconnect_lock.lock().await;
        if let Some(current) = self.handle.read().await.as_ref() {
            let replaced = stale.is_none_or(|stale| !Arc::ptr_eq(stale, current));
            if replaced && self.is_connected() {
                return Ok(Arc::clone(current));
            }
        }
        self.connect_locked(&self.connection_name).await
    }

    async fn connect_locked(&self, name: &str) -> Result<Arc<dyn VesselService>, ServiceError> {
        let previous = self.handle.write().await.take();
        self.connected.send_replace(false);
        if let Some(previous) = previous {
            if let Err(e) = previous.close().await {
                warn!("Closing previous connection failed: {e}");
            }
        }

        let attempts = self.policy.attempts.max(1);
        for attempt in 1..=attempts {
            match self.connector.connect(name).await {
                Ok(handle) => {
                    *self.handle.write().await = Some(Arc::clone(&handle));
                    self.connected.send_replace(true);
                    info!("Connected to vehicle-control service as '{name}'");
                    return Ok(handle);
                }
                Err(e) => {
                    warn!("Connection attempt {attempt}/{attempts} failed: {e}");
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }
        error!("Giving up on the vehicle-control service after {attempts} attempts");
        Err(ServiceError::ConnectionExhausted)
    }

    /// One liveness step: pings an open handle, reconnects a dead or missing one.
    pub async fn check_liveness(&self) -> Result<(), ServiceError> {
        let current = self.handle().await;
        match current {
            Some(handle) if self.is_connected() => {
                if let Err(e) = handle.ping().await {
                    warn!("Liveness check failed: {e}");
                    self.connected.send_replace(false);
                    self.reconnect_from(Some(&handle)).await?;
                }
                Ok(())
            }
            stale => {
                log!("Not connected, reconnecting");
                self.reconnect_from(stale.as_ref()).await.map(|_| ())
            }
        }
    }

    /// Runs [`check_liveness`](Supervisor::check_liveness) on the liveness
    /// interval until `token` is cancelled.
    pub async fn run_liveness_monitor(&self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.policy.liveness_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.check_liveness().await {
                        error!("Liveness monitor could not restore the connection: {e}");
                    }
                }
            }
        }
        log!("Liveness monitor stopped");
    }

    /// Runs `op` against the live handle.
    ///
    /// Returns `Ok(None)` without running `op` when the game is not in the
    /// flight scene. A transient failure triggers one reconnect and exactly
    /// one retry, whose result is returned as is.
    pub async fn execute_with_reconnect<T, F, Fut>(&self, op: F) -> Result<Option<T>, ServiceError>
    where
        F: Fn(Arc<dyn VesselService>) -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let _permit = self.permits.acquire().await.map_err(|_| ServiceError::NotConnected)?;
        let handle = match self.handle().await {
            Some(handle) if self.is_connected() => handle,
            stale => self.reconnect_from(stale.as_ref()).await?,
        };
        match Self::in_flight_scene(&handle, &op).await {
            Err(e) if e.is_transient() => {
                warn!("Call failed with {e}, reconnecting for one retry");
                self.connected.send_replace(false);
                let fresh = self.reconnect_from(Some(&handle)).await?;
                Self::in_flight_scene(&fresh, &op).await
            }
            other => other,
        }
    }

    async fn in_flight_scene<T, F, Fut>(
        handle: &Arc<dyn VesselService>,
        op: &F,
    ) -> Result<Option<T>, ServiceError>
    where
        F: Fn(Arc<dyn VesselService>) -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let scene = handle.scene().await?;
        if scene != GameScene::Flight {
            warn!("Game is in scene '{scene}', not in flight; skipping call");
            return Ok(None);
        }
        op(Arc::clone(handle)).await.map(Some)
    }

    /// Closes the handle for good.
    pub async fn shutdown(&self) {
        let _guard = self.reconnect_lock.lock().await;
        let previous = self.handle.write().await.take();
        self.connected.send_replace(false);
        if let Some(previous) = previous {
            if let Err(e) = previous.close().await {
                warn!("Closing connection on shutdown failed: {e}");
            }
        }
    }
}
