//! Periodic-poll snapshot publishing.
//!
//! A [`TimeBasedDataProvider`] owns one background worker thread that calls
//! its supplier on a fixed interval. Readers load the current snapshot
//! through [`ArcSwapOption`] and never block on the worker.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::RefresherConfig;
use crate::error::{BoxError, RefreshError, Result};
use crate::provider::DataProvider;

type Supplier<T> = dyn Fn() -> std::result::Result<Option<T>, BoxError> + Send + Sync;
type UpdatePredicate<T> = dyn Fn(Option<&T>, &T) -> bool + Send + Sync;

struct Shared<T> {
    name: String,
    current: ArcSwapOption<T>,
    last_updated: AtomicI64,
    supplier: Box<Supplier<T>>,
    should_update: Box<UpdatePredicate<T>>,
}

impl<T> Shared<T> {
    fn refresh(&self) -> Result<bool> {
        let next = match (self.supplier)() {
            Ok(Some(next)) => next,
            Ok(None) => {
                warn!(name = %self.name, "refresh supplier returned no value, keeping previous");
                return Ok(false);
            }
            Err(source) => {
                warn!(
                    name = %self.name,
                    error = %source,
                    "refresh supplier failed, keeping previous"
                );
                return Err(RefreshError::Supplier {
                    name: self.name.clone(),
                    source,
                });
            }
        };

        let current = self.current.load_full();
        if !(self.should_update)(current.as_deref(), &next) {
            debug!(name = %self.name, "refresh skipped by update predicate");
            return Ok(false);
        }

        self.current.store(Some(Arc::new(next)));
        let now = Utc::now().timestamp_millis();
        self.last_updated.store(now, Ordering::Release);
        debug!(name = %self.name, updated_at = now, "snapshot published");
        Ok(true)
    }
}

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Snapshot holder refreshed by a background worker.
pub struct TimeBasedDataProvider<T> {
    shared: Arc<Shared<T>>,
    /// Read fallback only; never published and never seen by `should_update`.
    initial: Option<Arc<T>>,
    interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl<T: Send + Sync + 'static> TimeBasedDataProvider<T> {
    /// Provider that publishes every value the supplier returns.
    pub fn new<F>(config: RefresherConfig, supplier: F) -> Self
    where
        F: Fn() -> std::result::Result<Option<T>, BoxError> + Send + Sync + 'static,
    {
        Self::with_predicate(config, supplier, |_: Option<&T>, _: &T| true)
    }

    /// Provider that publishes only when `should_update(old, new)` holds.
    pub fn with_predicate<F, P>(config: RefresherConfig, supplier: F, should_update: P) -> Self
    where
        F: Fn() -> std::result::Result<Option<T>, BoxError> + Send + Sync + 'static,
        P: Fn(Option<&T>, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                name: config.name,
                current: ArcSwapOption::empty(),
                last_updated: AtomicI64::new(0),
                supplier: Box::new(supplier),
                should_update: Box::new(should_update),
            }),
            initial: None,
            interval: config.interval,
            worker: Mutex::new(None),
        }
    }

    /// Value visible until the first successful refresh.
    ///
    /// The update predicate still sees no previous value for that refresh.
    pub fn with_initial(mut self, initial: T) -> Self {
        self.initial = Some(Arc::new(initial));
        self
    }

    /// Refresh now, then keep refreshing on the configured interval.
    ///
    /// Starting a running provider is a no-op.
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.is_some() {
            return Ok(());
        }

        // Failures are logged inside refresh; the schedule starts regardless.
        let _ = self.shared.refresh();

        let (stop, stopped) = mpsc::channel::<()>();
        let shared = Arc::clone(&self.shared);
        let interval = self.interval;
        let handle = thread::Builder::new()
            .name(self.shared.name.clone())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let _ = shared.refresh();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|source| RefreshError::Spawn {
                name: self.shared.name.clone(),
                source,
            })?;

        info!(
            name = %self.shared.name,
            interval_ms = interval.as_millis() as u64,
            "refresher started"
        );
        *worker = Some(Worker { stop, handle });
        Ok(())
    }
}

impl<T> TimeBasedDataProvider<T> {
    /// Run one refresh on the calling thread.
    ///
    /// Returns whether a new value was published.
    pub fn update(&self) -> Result<bool> {
        self.shared.refresh()
    }

    /// Stop the background worker and wait for it to exit.
    pub fn stop(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            let _ = worker.stop.send(());
            if worker.handle.join().is_err() {
                warn!(name = %self.shared.name, "refresher worker panicked");
            }
            info!(name = %self.shared.name, "refresher stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Epoch millis of the last published value; 0 before the first one.
    pub fn last_successfully_updated(&self) -> i64 {
        self.shared.last_updated.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

impl<T: Send + Sync> DataProvider<T> for TimeBasedDataProvider<T> {
    fn data(&self) -> Option<Arc<T>> {
        self.shared
            .current
            .load_full()
            .or_else(|| self.initial.clone())
    }
}

impl<T> Drop for TimeBasedDataProvider<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
