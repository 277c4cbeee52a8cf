use anyhow::Result;
use caffeine::input::{InputBackend, KeyHandle};
use caffeine::keep_awake::{FatalHandler, PeriodicLoop};
use caffeine::utils::keycode::{resolve, KeyCode};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct Presses {
    count: AtomicUsize,
    keys: Mutex<Vec<KeyCode>>,
}

struct RecordingBackend {
    presses: Arc<Presses>,
    fail_after: Option<usize>,
}

struct RecordingKey {
    presses: Arc<Presses>,
    key: KeyCode,
    fail_after: Option<usize>,
}

impl InputBackend for RecordingBackend {
    fn bind(&self, key: KeyCode) -> Result<Box<dyn KeyHandle>> {
        Ok(Box::new(RecordingKey {
            presses: self.presses.clone(),
            key,
            fail_after: self.fail_after,
        }))
    }
}

impl KeyHandle for RecordingKey {
    fn press(&mut self) -> Result<()> {
        let done = self.presses.count.load(Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| done >= limit) {
            anyhow::bail!("input system went away");
        }
        self.presses.count.fetch_add(1, Ordering::SeqCst);
        self.presses.keys.lock().push(self.key);
        Ok(())
    }
}

fn spawn(
    fail_after: Option<usize>,
    interval: Duration,
    on_fatal: FatalHandler,
) -> (PeriodicLoop, Arc<Presses>) {
    let presses = Arc::new(Presses::default());
    let backend = RecordingBackend {
        presses: presses.clone(),
        fail_after,
    };
    let worker = PeriodicLoop::spawn(
        Arc::new(backend),
        resolve("F13").unwrap(),
        interval,
        on_fatal,
    )
    .expect("Failed to spawn worker");
    (worker, presses)
}

#[test]
fn test_presses_configured_key() {
    let (worker, presses) = spawn(None, Duration::from_millis(10), Arc::new(|_: anyhow::Error| {}));
    assert_eq!(worker.key().name(), "F13");
    assert_eq!(worker.interval(), Duration::from_millis(10));

    thread::sleep(Duration::from_millis(80));
    worker.stop();

    let keys = presses.keys.lock();
    assert!(!keys.is_empty());
    assert!(keys.iter().all(|key| key.name() == "F13"));
}

#[test]
fn test_no_presses_after_stop() {
    let (worker, presses) = spawn(None, Duration::from_millis(5), Arc::new(|_: anyhow::Error| {}));
    thread::sleep(Duration::from_millis(40));

    worker.stop();
    let after_stop = presses.count.load(Ordering::SeqCst);

    thread::sleep(Duration::from_millis(60));
    assert_eq!(presses.count.load(Ordering::SeqCst), after_stop);
}

#[test]
fn test_first_press_waits_one_interval() {
    let (worker, presses) = spawn(None, Duration::from_secs(3600), Arc::new(|_: anyhow::Error| {}));
    thread::sleep(Duration::from_millis(50));

    assert_eq!(presses.count.load(Ordering::SeqCst), 0);
    worker.stop();
}

#[test]
fn test_press_failure_reports_fatal_and_ends_worker() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let on_fatal: FatalHandler = Arc::new(move |e: anyhow::Error| sink.lock().push(e.to_string()));

    let (worker, presses) = spawn(Some(2), Duration::from_millis(5), on_fatal);
    thread::sleep(Duration::from_millis(100));
    worker.stop();

    assert_eq!(presses.count.load(Ordering::SeqCst), 2);
    assert_eq!(*errors.lock(), vec!["input system went away".to_string()]);
}

#[test]
fn test_dropping_worker_stops_it() {
    let (worker, presses) = spawn(None, Duration::from_millis(5), Arc::new(|_: anyhow::Error| {}));
    thread::sleep(Duration::from_millis(30));

    drop(worker);
    let after_drop = presses.count.load(Ordering::SeqCst);

    thread::sleep(Duration::from_millis(40));
    assert_eq!(presses.count.load(Ordering::SeqCst), after_drop);
}
