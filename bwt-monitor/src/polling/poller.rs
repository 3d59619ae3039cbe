//! Poll loop and task management
//!
//! One [`MonitorTask`] owns one background loop polling one softener.
//! The loop drives the whole monitor: fetch under a deadline, publish the
//! snapshot, emit change events, then recompute the adaptive interval
//! from the flow rate just observed.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bwt_api::{ApiError, BwtClient, CurrentData};
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::event::MonitorEvent;
use crate::polling::interval::next_poll_interval;
use crate::polling::source::StatusSource;
use crate::sensor::SensorSnapshot;

/// A running monitor for one softener
pub struct MonitorTask {
    task_handle: JoinHandle<()>,
    shutdown_signal: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
    readings: watch::Receiver<Option<SensorSnapshot>>,
    poll_count: Arc<AtomicU64>,
    error_streak: Arc<AtomicU32>,
    started_at: SystemTime,
}

impl MonitorTask {
    /// Build a client from the configuration and start a monitor
    ///
    /// Returns the task handle and the receiving end of its event channel.
    /// Must be called from within a tokio runtime.
    pub fn connect(
        config: MonitorConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<MonitorEvent>), MonitorError> {
        let client = BwtClient::new(&config.host, &config.access_code)
            .with_port(config.port)
            .with_fetch_timeout(config.fetch_timeout);

        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        let task = Self::start(Arc::new(client), config, event_sender)?;

        Ok((task, event_receiver))
    }

    /// Start a monitor over an arbitrary status source
    pub fn start(
        source: Arc<dyn StatusSource>,
        config: MonitorConfig,
        event_sender: mpsc::UnboundedSender<MonitorEvent>,
    ) -> Result<Self, MonitorError> {
        config.validate()?;

        let (watch_sender, watch_receiver) = watch::channel(None);
        let shutdown_signal = Arc::new(AtomicBool::new(false));
        let shutdown_notify = Arc::new(Notify::new());
        let poll_count = Arc::new(AtomicU64::new(0));
        let error_streak = Arc::new(AtomicU32::new(0));

        let task_handle = tokio::spawn(Self::poll_loop(
            source,
            config,
            watch_sender,
            event_sender,
            Arc::clone(&shutdown_signal),
            Arc::clone(&shutdown_notify),
            Arc::clone(&poll_count),
            Arc::clone(&error_streak),
        ));

        Ok(Self {
            task_handle,
            shutdown_signal,
            shutdown_notify,
            readings: watch_receiver,
            poll_count,
            error_streak,
            started_at: SystemTime::now(),
        })
    }

    /// Main polling loop
    #[allow(clippy::too_many_arguments)]
    async fn poll_loop(
        source: Arc<dyn StatusSource>,
        config: MonitorConfig,
        readings: watch::Sender<Option<SensorSnapshot>>,
        events: mpsc::UnboundedSender<MonitorEvent>,
        shutdown_signal: Arc<AtomicBool>,
        shutdown_notify: Arc<Notify>,
        poll_count: Arc<AtomicU64>,
        error_streak: Arc<AtomicU32>,
    ) {
        info!(host = %config.host, "starting softener monitor");

        // Interval used for the just-completed poll. Everything the
        // adaptive calculation sees flows through this one value, so the
        // doubling base is always the interval that was actually used.
        let mut interval: Option<Duration> = None;
        let mut previous: Option<SensorSnapshot> = None;

        loop {
            if shutdown_signal.load(Ordering::Relaxed) {
                debug!(host = %config.host, "monitor shutting down");
                break;
            }

            poll_count.fetch_add(1, Ordering::Relaxed);

            match Self::fetch(&source, config.fetch_timeout).await {
                Ok(data) => {
                    error_streak.store(0, Ordering::Relaxed);

                    let snapshot = SensorSnapshot::evaluate(&data);
                    let changes = previous
                        .as_ref()
                        .map(|p| snapshot.diff(p))
                        .unwrap_or_default();

                    let next = if config.adaptive_polling {
                        next_poll_interval(
                            interval,
                            data.current_flow,
                            config.min_poll_interval,
                            config.max_poll_interval,
                        )
                    } else {
                        config.max_poll_interval
                    };

                    debug!(
                        host = %config.host,
                        flow_l_h = data.current_flow,
                        next_interval_ms = next.as_millis() as u64,
                        "poll complete"
                    );

                    let _ = readings.send(Some(snapshot.clone()));
                    previous = Some(snapshot);
                    interval = Some(next);

                    let updated = events.send(MonitorEvent::ReadingUpdated {
                        current_flow_l_h: data.current_flow,
                        next_interval: next,
                    });
                    if updated.is_err() {
                        // Subscriber is gone, nobody is listening anymore.
                        debug!(host = %config.host, "event channel closed, stopping monitor");
                        return;
                    }

                    for change in changes {
                        let _ = events.send(MonitorEvent::SensorChanged {
                            key: change.key,
                            previous: change.previous,
                            value: change.value,
                        });
                    }

                    Self::sleep_or_shutdown(next, &shutdown_notify).await;
                }
                Err(ApiError::WrongCode) => {
                    warn!(host = %config.host, "device rejected the login code, stopping monitor");
                    let _ = events.send(MonitorEvent::AuthenticationFailed);
                    break;
                }
                Err(e) => {
                    let streak = error_streak.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(host = %config.host, error = %e, streak, "poll failed");

                    let _ = events.send(MonitorEvent::PollFailed {
                        consecutive_errors: streak,
                        error: e.to_string(),
                    });

                    if streak >= config.max_consecutive_errors {
                        warn!(
                            host = %config.host,
                            "too many consecutive poll failures, stopping monitor"
                        );
                        break;
                    }

                    // The adaptive interval is not advanced on failures;
                    // retries run on their own capped exponential schedule.
                    let base = interval.unwrap_or(config.min_poll_interval);
                    let backoff =
                        (base * 2_u32.pow(streak.min(6))).min(config.max_poll_interval);
                    Self::sleep_or_shutdown(backoff, &shutdown_notify).await;
                }
            }
        }

        let _ = events.send(MonitorEvent::Stopped);
        info!(host = %config.host, "softener monitor stopped");
    }

    /// Fetch one reading on the blocking pool under an outer deadline
    async fn fetch(
        source: &Arc<dyn StatusSource>,
        timeout: Duration,
    ) -> bwt_api::Result<CurrentData> {
        let source = Arc::clone(source);
        let fetch = tokio::task::spawn_blocking(move || source.fetch_status());

        match tokio::time::timeout(timeout, fetch).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ApiError::Connect(format!(
                "fetch task failed: {}",
                join_error
            ))),
            Err(_) => Err(ApiError::Connect(format!(
                "no response within {:?}",
                timeout
            ))),
        }
    }

    /// Sleep for `duration`, waking early on a shutdown request
    async fn sleep_or_shutdown(duration: Duration, shutdown: &Notify) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = shutdown.notified() => {}
        }
    }

    /// Receiver for the latest sensor snapshot
    ///
    /// Holds `None` until the first successful poll.
    pub fn readings(&self) -> watch::Receiver<Option<SensorSnapshot>> {
        self.readings.clone()
    }

    /// Check if the poll loop is still running
    pub fn is_running(&self) -> bool {
        !self.task_handle.is_finished()
    }

    /// Get task statistics
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            poll_count: self.poll_count.load(Ordering::Relaxed),
            consecutive_errors: self.error_streak.load(Ordering::Relaxed),
            started_at: self.started_at,
            is_running: self.is_running(),
        }
    }

    /// Request graceful shutdown and wait for the loop to finish
    pub async fn shutdown(self) -> Result<(), MonitorError> {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        self.shutdown_notify.notify_one();

        self.task_handle
            .await
            .map_err(|e| MonitorError::Shutdown(format!("failed to await monitor task: {}", e)))
    }
}

/// Statistics for a monitor task
#[derive(Debug, Clone)]
pub struct MonitorStats {
    /// Poll attempts made so far
    pub poll_count: u64,
    /// Failures since the last successful poll
    pub consecutive_errors: u32,
    /// When the monitor was started
    pub started_at: SystemTime,
    /// Whether the poll loop is still alive
    pub is_running: bool,
}
