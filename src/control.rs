//! External stop / pause / resume handle for running matches.
//!
//! A [`MatchControl`] is handed to whatever needs to steer a match (an HTTP endpoint, a
//! UI thread, an arena). Clones share the same state. The match loop only looks at it
//! between turns, so a turn in progress always completes.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug, Default)]
struct Flags {
    stopped: bool,
    paused: bool,
}

#[derive(Debug, Default)]
struct Shared {
    flags: Mutex<Flags>,
    changed: Condvar,
}

/// Cloneable handle controlling one or more matches.
#[derive(Debug, Clone, Default)]
pub struct MatchControl {
    shared: Arc<Shared>,
}

/// What the match loop should do after waiting on a [`MatchControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    Continue,
    Stop,
}

impl MatchControl {
    /// A handle with nothing requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks matches to finish after the current turn, without a winner. Also wakes
    /// paused matches. Cannot be undone.
    pub fn stop(&self) {
        self.lock().stopped = true;
        debug!("stop requested");
        self.shared.changed.notify_all();
    }

    /// Holds matches before their next turn.
    pub fn pause(&self) {
        self.lock().paused = true;
        debug!("pause requested");
    }

    /// Releases paused matches.
    pub fn resume(&self) {
        self.lock().paused = false;
        debug!("resume requested");
        self.shared.changed.notify_all();
    }

    /// Whether [`stop`](Self::stop) was called.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Whether matches are held.
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Blocks while paused. Returns [`Resume::Stop`] once stopped.
    pub(crate) fn wait_while_paused(&self) -> Resume {
        let mut flags = self.lock();
        while flags.paused && !flags.stopped {
            flags = self
                .shared
                .changed
                .wait(flags)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if flags.stopped {
            Resume::Stop
        } else {
            Resume::Continue
        }
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.shared
            .flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn clones_share_state() {
        let control = MatchControl::new();
        let other = control.clone();
        other.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!other.is_paused());
        assert!(!other.is_stopped());
        control.stop();
        assert!(other.is_stopped());
    }

    #[test]
    fn wait_returns_immediately_when_running() {
        assert_eq!(MatchControl::new().wait_while_paused(), Resume::Continue);
    }

    #[test]
    fn resume_wakes_waiter() {
        let control = MatchControl::new();
        control.pause();
        let waiter = {
            let control = control.clone();
            thread::spawn(move || control.wait_while_paused())
        };
        thread::sleep(Duration::from_millis(20));
        control.resume();
        assert_eq!(waiter.join().unwrap(), Resume::Continue);
    }

    #[test]
    fn stop_wakes_waiter() {
        let control = MatchControl::new();
        control.pause();
        let waiter = {
            let control = control.clone();
            thread::spawn(move || control.wait_while_paused())
        };
        thread::sleep(Duration::from_millis(20));
        control.stop();
        assert_eq!(waiter.join().unwrap(), Resume::Stop);
    }
}
