//! Progress notifications emitted by a [`crate::SyncSession`].
//!
//! A session emits exactly one [`SyncEvent::Start`], then one
//! [`SyncEvent::Process`] per generated target, then exactly one terminal
//! event: [`SyncEvent::Success`] or [`SyncEvent::Errored`].

use std::{fmt, sync::mpsc::Sender};

/// A single human-readable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Start(String),
    Process(String),
    Errored(String),
    Success(String),
}

impl SyncEvent {
    pub fn message(&self) -> &str {
        match self {
            SyncEvent::Start(msg)
            | SyncEvent::Process(msg)
            | SyncEvent::Errored(msg)
            | SyncEvent::Success(msg) => msg,
        }
    }

    /// True for the event that ends a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncEvent::Errored(_) | SyncEvent::Success(_))
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncEvent::Start(_) => "start",
            SyncEvent::Process(_) => "process",
            SyncEvent::Errored(_) => "error",
            SyncEvent::Success(_) => "success",
        };
        write!(f, "{}: {}", label, self.message())
    }
}

/// Receiver of session notifications.
pub trait SyncListener {
    fn notify(&mut self, event: SyncEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SyncListener for NoopListener {
    fn notify(&mut self, _event: SyncEvent) {}
}

/// Forwards events over a channel, typically to a UI thread.
///
/// Events sent after the receiver hung up are dropped.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<SyncEvent>,
}

impl ChannelListener {
    pub fn new(sender: Sender<SyncEvent>) -> Self {
        Self { sender }
    }
}

impl SyncListener for ChannelListener {
    fn notify(&mut self, event: SyncEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("event receiver disconnected");
        }
    }
}

impl<F> SyncListener for F
where
    F: FnMut(SyncEvent),
{
    fn notify(&mut self, event: SyncEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_terminal_events() {
        assert!(SyncEvent::Success("ok".into()).is_terminal());
        assert!(SyncEvent::Errored("boom".into()).is_terminal());
        assert!(!SyncEvent::Start("go".into()).is_terminal());
        assert!(!SyncEvent::Process("values-fr".into()).is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SyncEvent::Process("res/values-fr/strings.xml".into()).to_string(),
            "process: res/values-fr/strings.xml"
        );
    }

    #[test]
    fn test_channel_listener_forwards_and_survives_hangup() {
        let (tx, rx) = mpsc::channel();
        let mut listener = ChannelListener::new(tx);
        listener.notify(SyncEvent::Start("a".into()));
        assert_eq!(rx.recv().unwrap(), SyncEvent::Start("a".into()));

        drop(rx);
        listener.notify(SyncEvent::Success("b".into()));
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: SyncEvent| seen.push(event.message().to_string());
            listener.notify(SyncEvent::Start("x".into()));
        }
        assert_eq!(seen, vec!["x".to_string()]);
    }
}
