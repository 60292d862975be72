//! Background thread that paces frames in real time.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::debug;

/// Periodic pulse source forwarding elapsed time to the owning loop.
///
/// The thread only measures time; every pulse is handled by the receiver, so
/// the game state stays on a single thread.
#[derive(Debug)]
pub(crate) struct Pacer {
    pulses: Receiver<Duration>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Pacer {
    /// Starts a thread sending the time elapsed since its last pulse every `interval`.
    pub(crate) fn start(interval: Duration) -> Self {
        let (sender, pulses) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let worker = thread::spawn(move || {
            let mut last = Instant::now();
            while !flag.load(Ordering::Acquire) {
                thread::sleep(interval);
                let now = Instant::now();
                if sender.send(now - last).is_err() {
                    break;
                }
                last = now;
            }
        });
        debug!(?interval, "pacer started");

        Self {
            pulses,
            stop,
            worker: Some(worker),
        }
    }

    /// Waits up to `timeout` for the next pulse.
    pub(crate) fn next_pulse(&self, timeout: Duration) -> Option<Duration> {
        match self.pulses.recv_timeout(timeout) {
            Ok(elapsed) => Some(elapsed),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stops the thread and drops every pulse still queued.
    pub(crate) fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("pacer thread panicked");
            }
            while self.pulses.try_recv().is_ok() {}
            debug!("pacer stopped");
        }
    }
}

impl Drop for Pacer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_report_elapsed_time() {
        let mut pacer = Pacer::start(Duration::from_millis(5));

        let elapsed = pacer
            .next_pulse(Duration::from_secs(1))
            .expect("a pulse within a second");
        assert!(elapsed >= Duration::from_millis(5));

        pacer.stop();
    }

    #[test]
    fn nothing_arrives_after_stop() {
        let mut pacer = Pacer::start(Duration::from_millis(1));
        let _ = pacer.next_pulse(Duration::from_secs(1));

        pacer.stop();

        assert_eq!(pacer.next_pulse(Duration::from_millis(20)), None);
        pacer.stop();
    }
}
