/// Fire-and-forget boss-name fetch.
///
/// Boss names come from an external service behind the
/// `BossNameService` trait. `request()` spawns a worker thread that
/// pushes the result into a channel; the simulation polls with
/// `try_recv` at spawn time and never blocks a frame on it. A request
/// that has not answered by then loses: the boss gets the fallback
/// name and a late result is dropped with its receiver on the next
/// request.

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Source of boss display names. Implementations may do slow I/O;
/// they run on a throwaway worker thread.
pub trait BossNameService: Send + Sync + 'static {
    /// Produce a name for the `sequence`-th boss (0-based).
    /// `None` means the source had nothing to offer.
    fn generate(&self, sequence: u32) -> Option<String>;
}

pub struct BossNameFetcher {
    service: Option<Arc<dyn BossNameService>>,
    pending: Option<Receiver<String>>,
}

impl BossNameFetcher {
    pub fn new(service: Option<Arc<dyn BossNameService>>) -> Self {
        BossNameFetcher { service, pending: None }
    }

    /// Kick off a fetch for the next boss. Replaces (and thereby
    /// discards) any still-pending request.
    pub fn request(&mut self, sequence: u32) {
        let Some(service) = self.service.clone() else {
            return;
        };
        let (tx, rx) = channel();
        self.pending = Some(rx);
        thread::spawn(move || {
            if let Some(name) = service.generate(sequence) {
                // receiver may already be gone; that's fine
                let _ = tx.send(name);
            }
        });
    }

    /// Non-blocking: the fetched name if it arrived in time.
    pub fn poll(&mut self) -> Option<String> {
        let name = self.pending.as_ref()?.try_recv().ok()?;
        self.pending = None;
        Some(name)
    }

    /// Deterministic name used when no fetched name is available.
    pub fn fallback(sequence: u32) -> String {
        format!("NEON-REX-MK{}", sequence + 1)
    }
}
