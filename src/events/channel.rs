//! Event channel built on crossbeam-channel.
//!
//! Lets the cleaner report progress to a rendering thread without
//! depending on how it is displayed.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Producer half, held by the pipeline and group processor
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event, dropping it if nobody is listening
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Consumer half, held by the presentation layer
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, or `None` once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for connected sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Create an unbounded channel
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose events go nowhere, for runs without a UI
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GroupEvent, RunEvent};
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Group(GroupEvent::AlbumsSynchronized {
                index: 1,
                additions: 4,
            }));
        });

        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Group(GroupEvent::AlbumsSynchronized { additions, .. }) => {
                assert_eq!(additions, 4);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Run(RunEvent::GroupsListed { total: 0 }));
    }

    #[test]
    fn receiver_ends_when_sender_dropped() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Run(RunEvent::GroupsListed { total: 2 }));
        drop(sender);

        assert_eq!(receiver.iter().count(), 1);
        assert!(receiver.recv().is_none());
    }
}
