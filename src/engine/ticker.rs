//! Tick loop: Dedicated thread that runs one render tick per frame interval.
//!
//! The thread owns the terminal while it runs and hands it back when it
//! exits, together with the reason it stopped.

use super::config::{frame_interval, RenderConfig};
use super::frame::Frame;
use super::lock_frame;
use crate::error::{RenderError, Result};
use crate::terminal::Terminal;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{error, info};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// What the tick thread returns: the terminal, and how the loop ended.
type Exit<T> = (T, Result<()>);

/// State shared between the engine handle and its tick thread.
#[derive(Clone)]
pub(crate) struct Shared {
    /// Content and snapshot.
    pub frame: Arc<Mutex<Frame>>,
    /// Cleared to request the loop to stop.
    pub running: Arc<AtomicBool>,
    /// Ticks per second, re-read after every tick.
    pub frame_rate: Arc<AtomicU32>,
}

/// Handle to a running tick thread.
pub(crate) struct TickLoop<T> {
    /// Handle to the tick thread.
    handle: Option<JoinHandle<Exit<T>>>,
    /// Cuts the current sleep short.
    wake_tx: Sender<()>,
}

impl<T: Terminal + Send + 'static> TickLoop<T> {
    /// Spawn the tick thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the render thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(mut terminal: T, shared: Shared, config: RenderConfig) -> Self {
        // One pending wakeup is enough, further ones would be redundant.
        let (wake_tx, wake_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("tickscreen-render".to_string())
            .spawn(move || {
                let result = Self::run_loop(&mut terminal, &shared, &config, &wake_rx);
                (terminal, result)
            })
            .expect("Failed to spawn render thread");

        Self {
            handle: Some(handle),
            wake_tx,
        }
    }

    /// Interrupt the current sleep so a cleared running flag is seen now.
    pub fn wake(&self) {
        let _ = self.wake_tx.try_send(());
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the thread to exit.
    ///
    /// Returns the terminal (unless the thread panicked) and the loop's
    /// exit status.
    pub fn join(mut self) -> (Option<T>, Result<()>) {
        let Some(handle) = self.handle.take() else {
            return (None, Ok(()));
        };
        match handle.join() {
            Ok((terminal, result)) => (Some(terminal), result),
            Err(_) => (None, Err(RenderError::ThreadPanicked)),
        }
    }

    /// Main tick loop.
    fn run_loop(
        terminal: &mut T,
        shared: &Shared,
        config: &RenderConfig,
        wake_rx: &Receiver<()>,
    ) -> Result<()> {
        info!("render loop started");

        loop {
            if !shared.running.load(Ordering::Acquire) {
                break;
            }

            let tick_start = Instant::now();
            let outcome = lock_frame(&shared.frame).tick(terminal, config);
            if let Err(e) = outcome {
                error!("render loop stopping: {e}");
                shared.running.store(false, Ordering::Release);
                return Err(RenderError::Terminal(e));
            }

            // Sleep until the next tick boundary, or until woken.
            let interval = frame_interval(shared.frame_rate.load(Ordering::Relaxed));
            match wake_rx.recv_deadline(tick_start + interval) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!("render loop stopped");
        Ok(())
    }
}
