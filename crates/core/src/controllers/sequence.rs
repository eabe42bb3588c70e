use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Tag handed to a reload when it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Orders concurrent reloads of one view so that only the most recently started one renders.
///
/// A completion whose ticket is no longer the latest is dropped without touching the view.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
    gate: Mutex<()>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Runs `render` if `ticket` is still the latest. Returns whether it ran.
    ///
    /// The check and the render happen under one lock, so a newer reload can never be overwritten
    /// by an older one that passed its check first.
    pub fn commit(&self, ticket: Ticket, render: impl FnOnce()) -> bool {
        let _gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        if !self.is_current(ticket) {
            return false;
        }
        render();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_commits() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(first < second);

        let mut rendered = Vec::new();
        assert!(!seq.commit(first, || rendered.push(1)));
        assert!(seq.commit(second, || rendered.push(2)));
        assert_eq!(rendered, vec![2]);
    }

    #[test]
    fn a_ticket_can_commit_more_than_once_until_superseded() {
        let seq = RequestSequencer::new();
        let ticket = seq.issue();
        assert!(seq.commit(ticket, || {}));
        assert!(seq.commit(ticket, || {}));
        seq.issue();
        assert!(!seq.commit(ticket, || {}));
    }
}
