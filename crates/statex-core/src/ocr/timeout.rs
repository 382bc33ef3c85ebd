//! Per-page OCR time budget.
//!
//! At most one recognition runs on the wrapped backend at a time. A page's
//! budget starts when its own recognition starts, so time spent waiting for
//! a worker abandoned by an earlier page is not charged to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, warn};

use super::{OcrBackend, OcrResult};
use crate::error::OcrError;

/// Page budgets an abandoned worker gets to finish before the backend is
/// treated as wedged.
const ABANDONED_WORKER_GRACE: u32 = 4;

/// Whether a worker is running on the backend.
#[derive(Default)]
struct WorkerSlot {
    busy: Mutex<bool>,
    idle: Condvar,
}

/// Frees the slot when the worker ends, including by panic.
struct SlotGuard(Arc<WorkerSlot>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut busy = self.0.busy.lock().unwrap_or_else(PoisonError::into_inner);
        *busy = false;
        self.0.idle.notify_all();
    }
}

/// Runs recognition on a worker thread and gives up after `timeout`.
///
/// A timed-out worker is left to finish on its own and its result is
/// dropped. The next call waits up to `ABANDONED_WORKER_GRACE` budgets for
/// it; if it is still running the call fails with [`OcrError::Busy`], and so
/// does every call after that until the worker ends.
pub struct TimeoutOcr {
    inner: Arc<dyn OcrBackend>,
    timeout: Duration,
    slot: Arc<WorkerSlot>,
    wedged: AtomicBool,
}

impl TimeoutOcr {
    pub fn new(inner: Arc<dyn OcrBackend>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            slot: Arc::new(WorkerSlot::default()),
            wedged: AtomicBool::new(false),
        }
    }

    /// Claim the backend for a new worker.
    fn acquire(&self) -> Result<SlotGuard, OcrError> {
        let mut busy = self.slot.busy.lock().unwrap_or_else(PoisonError::into_inner);

        if *busy {
            if self.wedged.load(Ordering::Acquire) {
                return Err(OcrError::Busy);
            }
            let grace = self.timeout * ABANDONED_WORKER_GRACE;
            debug!("Waiting up to {:?} for an abandoned OCR worker", grace);
            let (guard, _) = self
                .slot
                .idle
                .wait_timeout_while(busy, grace, |busy| *busy)
                .unwrap_or_else(PoisonError::into_inner);
            busy = guard;
            if *busy {
                warn!("Abandoned OCR worker still running after {:?}", grace);
                self.wedged.store(true, Ordering::Release);
                return Err(OcrError::Busy);
            }
        }

        self.wedged.store(false, Ordering::Release);
        *busy = true;
        Ok(SlotGuard(Arc::clone(&self.slot)))
    }
}

impl OcrBackend for TimeoutOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let guard = self.acquire()?;
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let image = image.clone();

        thread::Builder::new()
            .name("statex-ocr".to_string())
            .spawn(move || {
                let result = inner.recognize(&image);
                drop(guard);
                let _ = tx.send(result);
            })
            .map_err(|e| OcrError::Recognition(format!("failed to start OCR worker: {}", e)))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let ms = self.timeout.as_millis() as u64;
                warn!("OCR exceeded {}ms budget", ms);
                Err(OcrError::Timeout(ms))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(OcrError::Recognition("OCR worker stopped without a result".to_string()))
            }
        }
    }
}
