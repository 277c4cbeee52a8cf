//! The keep-awake worker: one thread pressing one key at a fixed interval
//!
//! The worker waits on the stop channel and the ticker at the same time, so
//! a stop request is observed immediately instead of after the next press.
//! `stop` is a rendezvous: it returns only once the worker has exited and
//! released its key handle.

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::input::InputBackend;
use crate::utils::keycode::KeyCode;

/// Called from the worker when key injection stops working
pub type FatalHandler = Arc<dyn Fn(anyhow::Error) + Send + Sync>;

/// Fatal handler that logs the error and terminates the process
pub fn exit_on_fatal() -> FatalHandler {
    Arc::new(|e: anyhow::Error| {
        error!("Fatal: {:#}", e);
        std::process::exit(1);
    })
}

/// A running keep-awake worker
pub struct PeriodicLoop {
    key: KeyCode,
    interval: Duration,
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicLoop {
    /// Spawn a worker pressing `key` every `interval`
    ///
    /// The interval is fixed for the lifetime of the worker; to change it,
    /// stop this worker and spawn a new one.
    pub fn spawn(
        backend: Arc<dyn InputBackend>,
        key: KeyCode,
        interval: Duration,
        on_fatal: FatalHandler,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = bounded(0);

        let handle = thread::Builder::new()
            .name("keep-awake".to_string())
            .spawn(move || run(backend, key, interval, stop_rx, on_fatal))
            .context("Failed to spawn keep-awake thread")?;

        info!(
            "Keep-awake loop started: pressing {} every {} seconds",
            key,
            interval.as_secs_f64()
        );

        Ok(Self {
            key,
            interval,
            stop_tx,
            handle: Some(handle),
        })
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the worker and wait until it has exited
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        // Fails only if the worker already exited on its own
        let _ = self.stop_tx.send(());

        if handle.join().is_err() {
            warn!("Keep-awake thread panicked");
        }
        info!("Keep-awake loop stopped");
    }
}

impl Drop for PeriodicLoop {
    fn drop(&mut self) {
        self.halt();
    }
}

fn run(
    backend: Arc<dyn InputBackend>,
    key: KeyCode,
    interval: Duration,
    stop_rx: Receiver<()>,
    on_fatal: FatalHandler,
) {
    let mut handle = match backend.bind(key) {
        Ok(handle) => handle,
        Err(e) => {
            on_fatal(e.context(format!("Failed to bind key {}", key)));
            return;
        }
    };

    let ticker = tick(interval);
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {
                if let Err(e) = handle.press() {
                    on_fatal(e);
                    return;
                }
                info!("Still there 👀");
            }
        }
    }

    debug!("Keep-awake worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyHandle;
    use crate::utils::keycode::resolve;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[derive(Default)]
    struct Counter {
        presses: AtomicUsize,
    }

    struct CountingBackend(Arc<Counter>);

    struct CountingKey(Arc<Counter>);

    impl InputBackend for CountingBackend {
        fn bind(&self, _key: KeyCode) -> Result<Box<dyn KeyHandle>> {
            Ok(Box::new(CountingKey(self.0.clone())))
        }
    }

    impl KeyHandle for CountingKey {
        fn press(&mut self) -> Result<()> {
            self.0.presses.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BrokenBackend;

    impl InputBackend for BrokenBackend {
        fn bind(&self, _key: KeyCode) -> Result<Box<dyn KeyHandle>> {
            anyhow::bail!("no display")
        }
    }

    fn recording_fatal() -> (FatalHandler, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: FatalHandler = Arc::new(move |e: anyhow::Error| sink.lock().push(format!("{:#}", e)));
        (handler, seen)
    }

    #[test]
    fn test_presses_on_every_tick() {
        let counter = Arc::new(Counter::default());
        let (on_fatal, _) = recording_fatal();
        let worker = PeriodicLoop::spawn(
            Arc::new(CountingBackend(counter.clone())),
            resolve("F15").unwrap(),
            Duration::from_millis(10),
            on_fatal,
        )
        .unwrap();

        thread::sleep(Duration::from_millis(120));
        worker.stop();

        // Once per tick, never in a tight loop
        let presses = counter.presses.load(Ordering::SeqCst);
        assert!((3..=13).contains(&presses), "unexpected press count {}", presses);
    }

    #[test]
    fn test_stop_is_prompt_during_long_interval() {
        let counter = Arc::new(Counter::default());
        let (on_fatal, _) = recording_fatal();
        let worker = PeriodicLoop::spawn(
            Arc::new(CountingBackend(counter.clone())),
            resolve("F15").unwrap(),
            Duration::from_secs(3600),
            on_fatal,
        )
        .unwrap();

        let started = Instant::now();
        worker.stop();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(counter.presses.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bind_failure_is_fatal() {
        let (on_fatal, seen) = recording_fatal();
        let worker = PeriodicLoop::spawn(
            Arc::new(BrokenBackend),
            resolve("F2").unwrap(),
            Duration::from_millis(10),
            on_fatal,
        )
        .unwrap();

        // Worker exits on its own; stop must not hang
        worker.stop();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("F2"));
        assert!(seen[0].contains("no display"));
    }
}
