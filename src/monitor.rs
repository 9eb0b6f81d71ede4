use crate::{
    models::{ServiceEndpoint, ServiceStatus, StatusSnapshot},
    probe::HealthProbe,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    sync::{watch, Mutex},
    task::{JoinHandle, JoinSet},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Owner of the service status mapping.
///
/// The monitor is the only writer; everyone else reads through
/// [`HealthMonitor::snapshot`] or a watch receiver from
/// [`HealthMonitor::subscribe`]. Probe cycles are serialised: a scheduled
/// tick that finds a cycle in flight is skipped, a manual re-probe waits for
/// it and then runs its own.
#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    probe: Arc<dyn HealthProbe>,
    config: MonitorConfig,
    sender: watch::Sender<StatusSnapshot>,
    cycle_lock: Mutex<()>,
    cancel: CancellationToken,
    started: AtomicBool,
}

impl HealthMonitor {
    pub fn new(
        probe: Arc<dyn HealthProbe>,
        services: Vec<ServiceEndpoint>,
        config: MonitorConfig,
    ) -> Self {
        let (sender, _) = watch::channel(StatusSnapshot::new(services));
        let inner = MonitorInner {
            probe,
            config,
            sender,
            cycle_lock: Mutex::new(()),
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.inner.sender.subscribe()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.sender.borrow().clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Probe every service now, outside the schedule.
    ///
    /// Returns the published snapshot, or the current one unchanged when the
    /// monitor has been shut down.
    pub async fn probe_all(&self) -> StatusSnapshot {
        if self.is_shut_down() {
            return self.snapshot();
        }
        let _guard = self.inner.cycle_lock.lock().await;
        self.run_cycle().await
    }

    /// Spawn the periodic schedule. The first cycle runs immediately.
    ///
    /// A monitor owns at most one schedule; starting it again returns a
    /// handle without a task.
    pub fn start(self) -> MonitorHandle {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            warn!("health monitor already started, not spawning a second schedule");
            return MonitorHandle {
                monitor: self,
                task: None,
            };
        }

        let monitor = self.clone();
        let task = tokio::spawn(async move {
            monitor.run().await;
        });
        MonitorHandle {
            monitor: self,
            task: Some(task),
        }
    }

    async fn run(self) {
        let config = self.inner.config;
        let period = if config.poll_interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            config.poll_interval
        };
        let service_count = self.snapshot().services.len();
        info!(
            services = service_count,
            poll_interval_secs = period.as_secs(),
            probe_timeout_ms = config.probe_timeout.as_millis() as u64,
            "health monitor started"
        );

        let cancel = self.inner.cancel.clone();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.scheduled_cycle() => {}
            }
        }

        info!("health monitor stopped");
    }

    async fn scheduled_cycle(&self) {
        match self.inner.cycle_lock.try_lock() {
            Ok(_guard) => {
                self.run_cycle().await;
            }
            Err(_) => debug!("previous health cycle still in flight, skipping tick"),
        }
    }

    // Callers hold the cycle lock.
    async fn run_cycle(&self) -> StatusSnapshot {
        let previous = self.snapshot();
        let timeout = self.inner.config.probe_timeout;

        let mut probes = JoinSet::new();
        for (index, endpoint) in previous.services.iter().cloned().enumerate() {
            let probe = Arc::clone(&self.inner.probe);
            probes.spawn(async move {
                let status = probe_endpoint(probe.as_ref(), &endpoint, timeout).await;
                (index, status)
            });
        }

        // A probe task that dies still counts as a failed probe.
        let mut services = previous.services.clone();
        for endpoint in services.iter_mut() {
            endpoint.status = ServiceStatus::Offline;
        }
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((index, status)) => services[index].status = status,
                Err(err) => warn!(error = %err, "health probe task failed"),
            }
        }

        if self.is_shut_down() {
            debug!("health monitor shut down, discarding probe results");
            return previous;
        }

        log_transitions(&previous.services, &services);
        let next = StatusSnapshot {
            services,
            cycle: previous.cycle + 1,
            checked_at: Some(local_timestamp()),
        };
        self.inner.sender.send_replace(next.clone());
        next
    }
}

/// Running schedule of a [`HealthMonitor`].
///
/// Dropping the handle that owns the schedule cancels it; `shutdown` also
/// waits for the loop to exit.
pub struct MonitorHandle {
    monitor: HealthMonitor,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn monitor(&self) -> &HealthMonitor {
        &self.monitor
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.monitor.subscribe()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.monitor.snapshot()
    }

    pub async fn refresh(&self) -> StatusSnapshot {
        self.monitor.probe_all().await
    }

    pub async fn shutdown(mut self) {
        self.monitor.inner.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "health monitor task ended abnormally");
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.monitor.inner.cancel.cancel();
        }
    }
}

async fn probe_endpoint(
    probe: &dyn HealthProbe,
    endpoint: &ServiceEndpoint,
    timeout: Duration,
) -> ServiceStatus {
    match tokio::time::timeout(timeout, probe.check(endpoint)).await {
        Ok(Ok(())) => ServiceStatus::Online,
        Ok(Err(err)) => {
            debug!(
                service = %endpoint.name,
                url = %endpoint.health_url(),
                error = %err,
                "health probe failed"
            );
            ServiceStatus::Offline
        }
        Err(_) => {
            debug!(
                service = %endpoint.name,
                url = %endpoint.health_url(),
                timeout_ms = timeout.as_millis() as u64,
                "health probe timed out"
            );
            ServiceStatus::Offline
        }
    }
}

fn log_transitions(previous: &[ServiceEndpoint], current: &[ServiceEndpoint]) {
    for (before, after) in previous.iter().zip(current.iter()) {
        if before.status != after.status {
            info!(
                service = %after.name,
                from = %before.status,
                to = %after.status,
                "service status changed"
            );
        }
    }
}

fn local_timestamp() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
        .ok()
        .and_then(|format| now.format(&format).ok())
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceName;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::{sleep, Instant};

    #[derive(Clone, Copy)]
    enum Behavior {
        Up,
        Down,
        Hang,
        Slow(Duration),
    }

    struct MockProbe {
        behaviors: HashMap<ServiceName, Behavior>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl HealthProbe for MockProbe {
        async fn check(&self, endpoint: &ServiceEndpoint) -> Result<(), String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviors.get(&endpoint.name).copied().unwrap_or(Behavior::Up) {
                Behavior::Up => Ok(()),
                Behavior::Down => Err("connection refused".to_string()),
                Behavior::Hang => {
                    sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
                Behavior::Slow(delay) => {
                    sleep(delay).await;
                    Ok(())
                }
            }
        }
    }

    fn endpoints() -> Vec<ServiceEndpoint> {
        ServiceName::ALL
            .into_iter()
            .map(|name| ServiceEndpoint::new(name, name.default_base_url()))
            .collect()
    }

    fn monitor_with(behaviors: &[(ServiceName, Behavior)]) -> (HealthMonitor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = MockProbe {
            behaviors: behaviors.iter().copied().collect(),
            calls: Arc::clone(&calls),
        };
        let monitor = HealthMonitor::new(Arc::new(probe), endpoints(), MonitorConfig::default());
        (monitor, calls)
    }

    #[tokio::test]
    async fn first_cycle_leaves_no_unknown_status() {
        let (monitor, _) = monitor_with(&[(ServiceName::Editor, Behavior::Down)]);
        assert!(monitor
            .snapshot()
            .services
            .iter()
            .all(|endpoint| endpoint.status == ServiceStatus::Unknown));

        let snapshot = monitor.probe_all().await;

        assert_eq!(snapshot.cycle, 1);
        assert!(snapshot.checked_at.is_some());
        assert!(snapshot
            .services
            .iter()
            .all(|endpoint| endpoint.status != ServiceStatus::Unknown));
        assert_eq!(monitor.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn failing_probe_only_affects_its_service() {
        let (monitor, _) = monitor_with(&[(ServiceName::Visual, Behavior::Down)]);

        let snapshot = monitor.probe_all().await;

        assert_eq!(snapshot.status(ServiceName::Visual), ServiceStatus::Offline);
        assert_eq!(snapshot.status(ServiceName::Scenario), ServiceStatus::Online);
        assert_eq!(snapshot.status(ServiceName::Audio), ServiceStatus::Online);
        assert_eq!(snapshot.status(ServiceName::Editor), ServiceStatus::Online);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_probe_is_cut_off_at_the_deadline() {
        let (monitor, _) = monitor_with(&[(ServiceName::Audio, Behavior::Hang)]);
        let started = Instant::now();

        let snapshot = monitor.probe_all().await;

        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_PROBE_TIMEOUT);
        assert!(elapsed < Duration::from_secs(60));
        assert_eq!(snapshot.status(ServiceName::Audio), ServiceStatus::Offline);
        assert_eq!(snapshot.online_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn readers_never_see_a_partial_cycle() {
        let (monitor, _) = monitor_with(&[(
            ServiceName::Scenario,
            Behavior::Slow(Duration::from_secs(2)),
        )]);
        let mut receiver = monitor.subscribe();

        let cycle = {
            let monitor = monitor.clone();
            tokio::spawn(async move { monitor.probe_all().await })
        };

        sleep(Duration::from_secs(1)).await;
        let midway = monitor.snapshot();
        assert_eq!(midway.cycle, 0);
        assert!(midway
            .services
            .iter()
            .all(|endpoint| endpoint.status == ServiceStatus::Unknown));

        receiver.changed().await.expect("monitor dropped");
        let published = receiver.borrow().clone();
        assert_eq!(published.cycle, 1);
        assert_eq!(published.online_count(), 4);

        let finished = cycle.await.expect("cycle task");
        assert_eq!(finished, published);
    }

    #[tokio::test(start_paused = true)]
    async fn no_cycles_fire_after_shutdown() {
        let (monitor, calls) = monitor_with(&[]);
        let handle = monitor.clone().start();
        let mut receiver = handle.subscribe();

        receiver.changed().await.expect("first cycle");
        handle.shutdown().await;
        let calls_at_shutdown = calls.load(Ordering::SeqCst);
        assert_eq!(calls_at_shutdown, 4);

        sleep(DEFAULT_POLL_INTERVAL * 3).await;
        let after = monitor.probe_all().await;

        assert_eq!(calls.load(Ordering::SeqCst), calls_at_shutdown);
        assert_eq!(after.cycle, 1);
        assert!(monitor.is_shut_down());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_schedule() {
        let (monitor, calls) = monitor_with(&[]);
        let handle = monitor.clone().start();
        let mut receiver = handle.subscribe();

        receiver.changed().await.expect("first cycle");
        let calls_at_drop = calls.load(Ordering::SeqCst);
        drop(handle);

        sleep(DEFAULT_POLL_INTERVAL * 3).await;

        assert_eq!(calls_at_drop, 4);
        assert_eq!(calls.load(Ordering::SeqCst), calls_at_drop);
        assert!(monitor.is_shut_down());
        assert_eq!(monitor.snapshot().cycle, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refresh_does_not_add_a_second_schedule() {
        let (monitor, calls) = monitor_with(&[]);
        let started = Instant::now();
        let handle = monitor.start();

        let refreshed = handle.refresh().await;
        assert!(refreshed.cycle >= 1);
        assert_eq!(refreshed.online_count(), 4);
        assert!(started.elapsed() < DEFAULT_POLL_INTERVAL);

        sleep(Duration::from_secs(1)).await;
        let before_tick = calls.load(Ordering::SeqCst);
        sleep(DEFAULT_POLL_INTERVAL).await;

        assert_eq!(calls.load(Ordering::SeqCst), before_tick + 4);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn starting_twice_keeps_a_single_schedule() {
        let (monitor, calls) = monitor_with(&[]);
        let first = monitor.clone().start();
        let second = monitor.start();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        drop(second);
        sleep(DEFAULT_POLL_INTERVAL).await;
        assert_eq!(calls.load(Ordering::SeqCst), 8);
        assert!(!first.monitor().is_shut_down());
        first.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn results_arriving_after_shutdown_are_discarded() {
        let (monitor, _) = monitor_with(&[(
            ServiceName::Scenario,
            Behavior::Slow(Duration::from_secs(10)),
        )]);
        let handle = monitor.clone().start();
        let manual = {
            let monitor = monitor.clone();
            tokio::spawn(async move { monitor.probe_all().await })
        };

        sleep(Duration::from_secs(1)).await;
        handle.shutdown().await;

        let late = manual.await.expect("manual cycle");
        assert_eq!(late.cycle, 0);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.cycle, 0);
        assert!(snapshot
            .services
            .iter()
            .all(|endpoint| endpoint.status == ServiceStatus::Unknown));
    }
}
