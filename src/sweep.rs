//! Background driver for the optional periodic retention sweep.
//!
//! The base specification only ever runs retention at `initialize`
//! ("Retention sweep cadence: only initialize triggers a sweep; a long-
//! running process never evicts"). [SweepHandle] is the additive answer to
//! that open question: a plain timer thread, signalled to stop via an
//! `AtomicBool` and joined on shutdown — simpler than the teacher's
//! gen-server `Thread<Q, R, T>` (`util::thread`) since this driver never
//! needs to carry a request/response payload, only a stop signal.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

/// Handle to a spawned periodic-sweep thread. Dropping it (or calling
/// [SweepHandle::stop]) signals the thread to exit and joins it.
pub struct SweepHandle {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SweepHandle {
    pub fn spawn<F>(interval: Duration, mut sweep_once: F) -> SweepHandle
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_thread = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            const TICK: Duration = Duration::from_millis(10);
            while !stop_thread.load(Ordering::Relaxed) {
                let mut waited = Duration::ZERO;
                while waited < interval {
                    if stop_thread.load(Ordering::Relaxed) {
                        return;
                    }
                    let step = TICK.min(interval - waited);
                    thread::sleep(step);
                    waited += step;
                }
                sweep_once();
            }
        });
        SweepHandle {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the thread to stop and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "sweep_test.rs"]
mod sweep_test;
