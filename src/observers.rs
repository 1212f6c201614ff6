//! Observer fan-out and the two built-in observers.
//!
//! [`ObserverSet`] is what the engine talks to. It isolates every observer: an `Err`
//! or a panic is logged and the next observer still runs. A slow observer still
//! delays the match, so long work belongs behind a [`ChannelObserver`].

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;

use anyhow::anyhow;
use tracing::warn;

use crate::board::Team;
use crate::event::{MatchEvent, Phase};
use crate::game_interface::Observer;

/// Observers of one match, notified in registration order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn Observer + Send>>,
}

impl ObserverSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` after the existing ones.
    pub fn push(&mut self, observer: impl Observer + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Registers an already boxed observer.
    pub fn push_boxed(&mut self, observer: Box<dyn Observer + Send>) {
        self.observers.push(observer);
    }

    /// Number of observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True without observers.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notifies everyone. Never fails.
    pub fn notify(&mut self, event: &MatchEvent) {
        for (index, observer) in self.observers.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| observer.notify(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(observer = index, phase = %event.phase, "observer failed: {e:#}")
                }
                Err(payload) => warn!(
                    observer = index,
                    phase = %event.phase,
                    "observer panicked: {}",
                    panic_message(payload.as_ref())
                ),
            }
        }
    }
}

impl FromIterator<Box<dyn Observer + Send>> for ObserverSet {
    fn from_iter<I: IntoIterator<Item = Box<dyn Observer + Send>>>(iter: I) -> Self {
        ObserverSet {
            observers: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Forwards a copy of every event into a channel.
///
/// Sending never blocks. Once the receiver is gone every notification fails, which
/// the [`ObserverSet`] logs and ignores.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<MatchEvent>,
}

impl ChannelObserver {
    /// Wraps `sender`.
    pub fn new(sender: Sender<MatchEvent>) -> Self {
        ChannelObserver { sender }
    }
}

impl Observer for ChannelObserver {
    fn notify(&mut self, event: &MatchEvent) -> anyhow::Result<()> {
        self.sender
            .send(event.clone())
            .map_err(|_| anyhow!("event receiver disconnected"))
    }
}

/// Prints match progress to stdout with ANSI colours.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn notify(&mut self, event: &MatchEvent) -> anyhow::Result<()> {
        println!("{}", render(event));
        Ok(())
    }
}

fn colour(team: Option<Team>) -> &'static str {
    match team {
        Some(Team::Red) => "\x1b[31m",
        Some(Team::Blue) => "\x1b[34m",
        _ => "\x1b[39m",
    }
}

fn render(event: &MatchEvent) -> String {
    let team = colour(Some(event.current_team));
    let head = format!(
        "\x1b[32m[game {} | {}]\x1b[39m {team}{}\x1b[39m red {} / blue {}",
        event.match_number,
        event.phase,
        event.current_team,
        event.remaining_red,
        event.remaining_blue,
    );
    match event.phase {
        Phase::Ended => match event.winner {
            Some(winner) => format!(
                "{head}: {}{winner} wins\x1b[39m ({})",
                colour(Some(winner)),
                event.last_action
            ),
            None => format!("{head}: {}", event.last_action),
        },
        // red for errors
        Phase::Aborted => format!("{head}: \x1b[31m{}\x1b[39m", event.last_action),
        _ => format!("{head}: {}", event.last_action),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::board::fixed_board;
    use crate::game::GameState;

    fn event(phase: Phase) -> MatchEvent {
        MatchEvent::capture(1, phase, &GameState::from_board(fixed_board()), "something")
    }

    struct Failing;

    impl Observer for Failing {
        fn notify(&mut self, _event: &MatchEvent) -> anyhow::Result<()> {
            Err(anyhow!("socket closed"))
        }
    }

    struct Panicking;

    impl Observer for Panicking {
        fn notify(&mut self, _event: &MatchEvent) -> anyhow::Result<()> {
            panic!("observer bug")
        }
    }

    #[test]
    fn failures_do_not_stop_later_observers() {
        let seen = Arc::new(Mutex::new(vec![]));
        let mut set = ObserverSet::new();
        set.push(Failing);
        set.push(Panicking);
        {
            let seen = seen.clone();
            set.push(move |e: &MatchEvent| seen.lock().unwrap().push(e.phase));
        }
        assert_eq!(set.len(), 3);

        set.notify(&event(Phase::Starting));
        set.notify(&event(Phase::Thinking));
        assert_eq!(*seen.lock().unwrap(), vec![Phase::Starting, Phase::Thinking]);
    }

    #[test]
    fn observers_are_notified_in_registration_order() {
        let log = Arc::new(Mutex::new(vec![]));
        let mut set = ObserverSet::new();
        for name in ["first", "second"] {
            let log = log.clone();
            set.push(move |e: &MatchEvent| log.lock().unwrap().push((name, e.phase)));
        }
        set.push(Failing);
        {
            let log = log.clone();
            set.push(move |e: &MatchEvent| log.lock().unwrap().push(("third", e.phase)));
        }

        set.notify(&event(Phase::Starting));
        set.notify(&event(Phase::Ended));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("first", Phase::Starting),
                ("second", Phase::Starting),
                ("third", Phase::Starting),
                ("first", Phase::Ended),
                ("second", Phase::Ended),
                ("third", Phase::Ended),
            ]
        );
    }

    #[test]
    fn channel_observer_forwards_and_reports_disconnect() {
        let (tx, rx) = mpsc::channel();
        let mut observer = ChannelObserver::new(tx);
        observer.notify(&event(Phase::Guessing)).unwrap();
        assert_eq!(rx.recv().unwrap().phase, Phase::Guessing);

        drop(rx);
        assert!(observer.notify(&event(Phase::Ended)).is_err());
    }

    #[test]
    fn render_mentions_winner() {
        let mut e = event(Phase::Ended);
        e.winner = Some(Team::Blue);
        let line = render(&e);
        assert!(line.contains("ENDED"));
        assert!(line.contains("blue wins"));
    }
}
